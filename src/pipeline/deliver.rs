//! Delivery channels: inline base64, object storage, local file.
//!
//! [`Delivery`] is built once from [`CardConfig`] and shared by every
//! request. Naming is common to `s3` and `local`: the caller's filename, with
//! `.png` appended when it has no extension, or `card-<uuid>.png`.
//!
//! Local writes are not serialised. Two concurrent requests naming the same
//! file race and the last writer wins; generated names never collide.

use crate::config::CardConfig;
use crate::error::CardError;
use crate::output::{EffectiveMode, RenderResult};
use crate::pipeline::encode::encode_base64;
use crate::storage::ObjectStoreSink;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// The three sinks plus the configuration they need.
#[derive(Debug, Clone)]
pub struct Delivery {
    output_dir: PathBuf,
    object_store: Option<ObjectStoreSink>,
}

impl Delivery {
    /// Build from configuration; constructs the S3 client when configured.
    pub fn from_config(config: &CardConfig) -> Result<Self, CardError> {
        Ok(Self {
            output_dir: config.output_dir.clone(),
            object_store: ObjectStoreSink::from_settings(&config.storage)?,
        })
    }

    pub fn new(output_dir: impl Into<PathBuf>, object_store: Option<ObjectStoreSink>) -> Self {
        Self {
            output_dir: output_dir.into(),
            object_store,
        }
    }

    /// Whether `auto` may resolve to `s3`.
    pub fn storage_configured(&self) -> bool {
        self.object_store.is_some()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Hand `png` to the channel for `mode`.
    pub async fn deliver(
        &self,
        png: Vec<u8>,
        mode: EffectiveMode,
        filename: Option<&str>,
    ) -> Result<RenderResult, CardError> {
        debug!(%mode, bytes = png.len(), "Delivering card");
        match mode {
            EffectiveMode::Base64 => Ok(RenderResult::image(encode_base64(&png))),
            EffectiveMode::S3 => {
                let sink = self
                    .object_store
                    .as_ref()
                    .ok_or(CardError::StorageNotConfigured)?;
                let key = resolve_object_name(filename)?;
                let url = sink.upload(&key, png).await?;
                Ok(RenderResult::text(url))
            }
            EffectiveMode::Local => {
                let path = self.write_local(&png, filename).await?;
                Ok(RenderResult::text(path.display().to_string()))
            }
        }
    }

    async fn write_local(&self, png: &[u8], filename: Option<&str>) -> Result<PathBuf, CardError> {
        let name = resolve_object_name(filename)?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| CardError::OutputWriteFailed {
                path: self.output_dir.clone(),
                source: e,
            })?;

        let target = self.output_dir.join(&name);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CardError::OutputWriteFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        tokio::fs::write(&target, png)
            .await
            .map_err(|e| CardError::OutputWriteFailed {
                path: target.clone(),
                source: e,
            })?;

        let absolute = std::path::absolute(&target).map_err(|e| CardError::OutputWriteFailed {
            path: target.clone(),
            source: e,
        })?;
        info!("Wrote {} bytes → {}", png.len(), absolute.display());
        Ok(absolute)
    }
}

/// The object key / file name for an upload or write.
///
/// Empty or absent names become `card-<uuid>.png`; names without an
/// extension get `.png`. Absolute paths and `..` components are rejected.
pub fn resolve_object_name(filename: Option<&str>) -> Result<String, CardError> {
    let Some(name) = filename.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(format!("card-{}.png", Uuid::new_v4()));
    };

    let path = Path::new(name);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || name.ends_with('/') || name.ends_with('\\') {
        return Err(CardError::InvalidFilename {
            name: name.to_string(),
        });
    }

    if path.extension().is_some() {
        Ok(name.to_string())
    } else {
        Ok(format!("{name}.png"))
    }
}
