//! Output types: requested/effective delivery modes and the render result.
//!
//! [`resolve_mode`] is the only place `auto` is interpreted. It is pure:
//! storage configuration arrives as a flag, never read from the environment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Delivery mode requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Object storage when configured, else local when a filename was
    /// given, else inline base64.
    #[default]
    Auto,
    Base64,
    S3,
    Local,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "base64" => Ok(Self::Base64),
            "s3" => Ok(Self::S3),
            "local" => Ok(Self::Local),
            other => Err(format!(
                "unknown output mode '{other}' (expected auto, base64, s3 or local)"
            )),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Base64 => "base64",
            Self::S3 => "s3",
            Self::Local => "local",
        })
    }
}

/// A concrete delivery channel. `auto` never survives resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveMode {
    Base64,
    S3,
    Local,
}

impl fmt::Display for EffectiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Base64 => "base64",
            Self::S3 => "s3",
            Self::Local => "local",
        })
    }
}

/// Pick the delivery channel.
///
/// An explicit mode is passed through even when its prerequisites are
/// missing; that becomes a delivery error, not a silent substitution.
pub fn resolve_mode(
    requested: OutputMode,
    has_filename: bool,
    storage_configured: bool,
) -> EffectiveMode {
    match requested {
        OutputMode::Base64 => EffectiveMode::Base64,
        OutputMode::S3 => EffectiveMode::S3,
        OutputMode::Local => EffectiveMode::Local,
        OutputMode::Auto if storage_configured => EffectiveMode::S3,
        OutputMode::Auto if has_filename => EffectiveMode::Local,
        OutputMode::Auto => EffectiveMode::Base64,
    }
}

/// What the payload of a [`RenderResult`] contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Base64-encoded PNG bytes.
    Image,
    /// A URL or an absolute filesystem path.
    Text,
}

/// The single result of a render request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    pub content_kind: ContentKind,
    pub payload: String,
}

impl RenderResult {
    pub fn image(base64: String) -> Self {
        Self {
            content_kind: ContentKind::Image,
            payload: base64,
        }
    }

    pub fn text(text: String) -> Self {
        Self {
            content_kind: ContentKind::Text,
            payload: text,
        }
    }

    /// `image/png` for inline images.
    pub fn mime_type(&self) -> Option<&'static str> {
        match self.content_kind {
            ContentKind::Image => Some("image/png"),
            ContentKind::Text => None,
        }
    }
}
