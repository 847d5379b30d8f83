//! Error types for the summary-card library.
//!
//! Every fallible public operation returns `Result<T, CardError>`. There is
//! no partial-success type: a card deck renders to exactly one image or the
//! request fails as a whole, and no automatic retry happens at this layer.
//!
//! Variants are grouped the way a request can fail:
//!
//! * **Input**: the request never became a valid [`crate::CardDeck`].
//! * **Rendering**: the rendering surface could not be launched, loaded,
//!   measured or captured. [`CardError::is_render_failure`] folds all of
//!   these (and timeouts) into the single "render failed" condition.
//! * **Delivery**: the chosen channel could not accept the image.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The step of the rendering protocol that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    /// Spawning the browser process or opening a page.
    Launch,
    /// Loading the composed document and waiting for it to settle.
    Load,
    /// Applying the device-metrics override.
    Viewport,
    /// Reading the rendered content height.
    Measure,
    /// Taking the screenshot, or the screenshot was not a PNG.
    Capture,
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Launch => "launch",
            Self::Load => "load",
            Self::Viewport => "viewport",
            Self::Measure => "measure",
            Self::Capture => "capture",
        })
    }
}

/// All fatal errors returned by the summary-card library.
#[derive(Debug, Error)]
pub enum CardError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Request file was not found at the given path.
    #[error("Request file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the request file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The request is not valid JSON or an item has the wrong shape.
    #[error("Invalid card request: {reason}")]
    InvalidRequest { reason: String },

    /// A caller-supplied filename would escape the output directory.
    #[error("Invalid filename '{name}': must be a relative path without '..' components")]
    InvalidFilename { name: String },

    // ── Rendering errors ──────────────────────────────────────────────────
    /// A step of the render protocol failed. The surface was torn down.
    #[error("Render failed during {stage}: {detail}")]
    RenderFailed { stage: RenderStage, detail: String },

    /// The whole render exceeded the configured deadline.
    #[error("Render timed out after {secs}s\nIncrease --render-timeout or check the browser.")]
    RenderTimeout { secs: u64 },

    // ── Delivery errors ───────────────────────────────────────────────────
    /// `s3` output was requested without credentials and a bucket.
    #[error(
        "Object storage is not configured.\n\
Set AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY and S3_BUCKET_NAME, or choose another output mode."
    )]
    StorageNotConfigured,

    /// The PUT to object storage failed.
    #[error("Upload of '{key}' failed: {detail}")]
    UploadFailed { key: String, detail: String },

    /// Could not create the output directory or write the image file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CardError {
    /// Shorthand for a [`CardError::RenderFailed`] at `stage`.
    pub fn render(stage: RenderStage, detail: impl fmt::Display) -> Self {
        Self::RenderFailed {
            stage,
            detail: detail.to_string(),
        }
    }

    /// True for every failure of the rendering engine, timeouts included.
    pub fn is_render_failure(&self) -> bool {
        matches!(self, Self::RenderFailed { .. } | Self::RenderTimeout { .. })
    }

    /// The failing render step, if this is a [`CardError::RenderFailed`].
    pub fn render_stage(&self) -> Option<RenderStage> {
        match self {
            Self::RenderFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
