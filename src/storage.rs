//! Object-storage sink for rendered cards (AWS S3, MinIO, R2, LocalStack).
//!
//! The client is built once from [`StorageSettings`] and shared read-only by
//! every request. Uploads are a single `PUT` with `Content-Type: image/png`.
//!
//! Public readability is a bucket-policy concern: `object_store` signs only
//! the headers it knows and has no canned-ACL option, so no per-object ACL
//! is sent.

use crate::config::StorageSettings;
use crate::error::CardError;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Uploads PNG bytes and reports their public URL.
#[derive(Clone)]
pub struct ObjectStoreSink {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
    endpoint: Option<String>,
}

impl fmt::Debug for ObjectStoreSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreSink")
            .field("store", &self.store.to_string())
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl ObjectStoreSink {
    /// Build an S3 client, or `Ok(None)` when storage is not configured.
    pub fn from_settings(settings: &StorageSettings) -> Result<Option<Self>, CardError> {
        if !settings.is_configured() {
            return Ok(None);
        }
        let (Some(bucket), Some(key), Some(secret)) = (
            settings.bucket.as_deref(),
            settings.access_key_id.as_deref(),
            settings.secret_access_key.as_deref(),
        ) else {
            return Ok(None);
        };

        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(bucket)
            .with_region(&settings.region)
            .with_access_key_id(key)
            .with_secret_access_key(secret);

        if let Some(endpoint) = settings.endpoint.as_deref() {
            builder = builder
                .with_endpoint(endpoint)
                .with_virtual_hosted_style_request(false)
                .with_allow_http(true);
        }

        let store = builder
            .build()
            .map_err(|e| CardError::InvalidConfig(format!("S3 client: {e}")))?;

        debug!(bucket, region = %settings.region, "Object storage configured");
        Ok(Some(Self {
            store: Arc::new(store),
            bucket: bucket.to_string(),
            region: settings.region.clone(),
            endpoint: settings.endpoint.clone(),
        }))
    }

    /// Wrap an arbitrary store; URLs are still derived from `settings`.
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        settings: &StorageSettings,
    ) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            region: settings.region.clone(),
            endpoint: settings.endpoint.clone(),
        }
    }

    /// PUT `bytes` at `key` and return the object's public URL.
    pub async fn upload(&self, key: &str, bytes: Vec<u8>) -> Result<String, CardError> {
        let path = ObjectPath::parse(key).map_err(|e| CardError::UploadFailed {
            key: key.to_string(),
            detail: e.to_string(),
        })?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, "image/png".into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let size = bytes.len();
        self.store
            .put_opts(&path, PutPayload::from(bytes), opts)
            .await
            .map_err(|e| CardError::UploadFailed {
                key: key.to_string(),
                detail: e.to_string(),
            })?;

        let url = self.public_url(key);
        info!("Uploaded {size} bytes → {url}");
        Ok(url)
    }

    /// `<endpoint>/<bucket>/<key>` with a custom endpoint, else the
    /// regional virtual-hosted AWS URL.
    pub fn public_url(&self, key: &str) -> String {
        match self.endpoint.as_deref() {
            Some(endpoint) => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
            }
            None => format!("https://{}.s3.{}.amazonaws.com/{}", self.bucket, self.region, key),
        }
    }
}
