//! Configuration types for card rendering and delivery.
//!
//! Everything the pipeline needs from its environment lives in
//! [`CardConfig`]: viewport geometry, the render deadline, the Chrome
//! executable, the local output directory and the object-storage settings.
//! It is built once at startup and passed by reference into the rendering
//! engine and the delivery channels; none of them reads environment
//! variables on its own.

use crate::error::CardError;
use std::fmt;
use std::path::PathBuf;

/// Configuration for rendering and delivering a card deck.
///
/// Built via [`CardConfig::builder()`], [`CardConfig::from_env()`] or
/// [`CardConfig::default()`].
///
/// # Example
/// ```rust
/// use summary_card::CardConfig;
///
/// let config = CardConfig::builder()
///     .output_dir("/tmp/cards")
///     .render_timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.viewport_width, 500);
/// ```
#[derive(Clone)]
pub struct CardConfig {
    /// Viewport width in CSS pixels. Default: 500.
    ///
    /// The produced PNG is `viewport_width × device_scale_factor` pixels wide.
    pub viewport_width: u32,

    /// Viewport height used for the first layout pass. Default: 800.
    pub provisional_height: u32,

    /// Pixel density of the capture. Default: 2.0.
    pub device_scale_factor: f64,

    /// Added to the measured container height before the final resize. Default: 40.
    ///
    /// Not applied when the container is absent and the whole-document
    /// height is used instead.
    pub height_margin: u32,

    /// Largest accepted content height in CSS pixels, margin included.
    /// Taller content fails the render at the measure stage instead of
    /// being cropped. Default: 16000.
    pub max_viewport_height: u32,

    /// Deadline for one render from document load to capture, in seconds.
    /// Browser launch is bounded by chromiumoxide's own launch timeout.
    /// `0` disables the deadline. Default: 60.
    pub render_timeout_secs: u64,

    /// Number of Chrome processes allowed to render at the same time. Default: 4.
    pub max_concurrent_renders: usize,

    /// Chrome / Chromium executable. If None, `chrome-locate` searches for one.
    pub chrome_executable: Option<PathBuf>,

    /// Directory for `local` output. Default: `./output`.
    pub output_dir: PathBuf,

    /// Object-storage credentials and location for `s3` output.
    pub storage: StorageSettings,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            viewport_width: 500,
            provisional_height: 800,
            device_scale_factor: 2.0,
            height_margin: 40,
            max_viewport_height: 16_000,
            render_timeout_secs: 60,
            max_concurrent_renders: 4,
            chrome_executable: None,
            output_dir: PathBuf::from("./output"),
            storage: StorageSettings::default(),
        }
    }
}

impl fmt::Debug for CardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardConfig")
            .field("viewport_width", &self.viewport_width)
            .field("provisional_height", &self.provisional_height)
            .field("device_scale_factor", &self.device_scale_factor)
            .field("height_margin", &self.height_margin)
            .field("max_viewport_height", &self.max_viewport_height)
            .field("render_timeout_secs", &self.render_timeout_secs)
            .field("max_concurrent_renders", &self.max_concurrent_renders)
            .field("chrome_executable", &self.chrome_executable)
            .field("output_dir", &self.output_dir)
            .field("storage", &self.storage)
            .finish()
    }
}

impl CardConfig {
    /// Create a new builder for `CardConfig`.
    pub fn builder() -> CardConfigBuilder {
        CardConfigBuilder {
            config: Self::default(),
        }
    }

    /// Read configuration from the process environment.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `AWS_ACCESS_KEY_ID` | `storage.access_key_id` |
    /// | `AWS_SECRET_ACCESS_KEY` | `storage.secret_access_key` |
    /// | `AWS_REGION` | `storage.region` |
    /// | `S3_BUCKET_NAME` | `storage.bucket` |
    /// | `S3_ENDPOINT` | `storage.endpoint` |
    /// | `OUTPUT_DIR` | `output_dir` |
    /// | `CHROME_EXECUTABLE_PATH`, `PUPPETEER_EXECUTABLE_PATH` | `chrome_executable` |
    /// | `CARD_RENDER_TIMEOUT_SECS` | `render_timeout_secs` |
    pub fn from_env() -> Result<Self, CardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`CardConfig::from_env`] but reads through `lookup`.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut builder = Self::builder().storage(StorageSettings {
            access_key_id: get("AWS_ACCESS_KEY_ID"),
            secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
            region: get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            bucket: get("S3_BUCKET_NAME"),
            endpoint: get("S3_ENDPOINT"),
        });

        if let Some(dir) = get("OUTPUT_DIR") {
            builder = builder.output_dir(dir);
        }
        if let Some(exe) =
            get("CHROME_EXECUTABLE_PATH").or_else(|| get("PUPPETEER_EXECUTABLE_PATH"))
        {
            builder = builder.chrome_executable(exe);
        }
        if let Some(raw) = get("CARD_RENDER_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                CardError::InvalidConfig(format!(
                    "CARD_RENDER_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            builder = builder.render_timeout_secs(secs);
        }

        builder.build()
    }
}

/// Builder for [`CardConfig`].
#[derive(Debug)]
pub struct CardConfigBuilder {
    config: CardConfig,
}

impl CardConfigBuilder {
    pub fn viewport_width(mut self, px: u32) -> Self {
        self.config.viewport_width = px.clamp(100, 4000);
        self
    }

    pub fn provisional_height(mut self, px: u32) -> Self {
        self.config.provisional_height = px.max(1);
        self
    }

    pub fn device_scale_factor(mut self, scale: f64) -> Self {
        self.config.device_scale_factor = scale.clamp(0.5, 4.0);
        self
    }

    pub fn height_margin(mut self, px: u32) -> Self {
        self.config.height_margin = px;
        self
    }

    pub fn max_viewport_height(mut self, px: u32) -> Self {
        self.config.max_viewport_height = px.max(1);
        self
    }

    pub fn render_timeout_secs(mut self, secs: u64) -> Self {
        self.config.render_timeout_secs = secs;
        self
    }

    pub fn max_concurrent_renders(mut self, n: usize) -> Self {
        self.config.max_concurrent_renders = n.max(1);
        self
    }

    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.chrome_executable = Some(path.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn storage(mut self, storage: StorageSettings) -> Self {
        self.config.storage = storage;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CardConfig, CardError> {
        let c = &self.config;
        if !c.device_scale_factor.is_finite() || c.device_scale_factor <= 0.0 {
            return Err(CardError::InvalidConfig(format!(
                "Device scale factor must be positive, got {}",
                c.device_scale_factor
            )));
        }
        if c.provisional_height > c.max_viewport_height {
            return Err(CardError::InvalidConfig(format!(
                "Provisional height {} exceeds max viewport height {}",
                c.provisional_height, c.max_viewport_height
            )));
        }
        if c.max_concurrent_renders == 0 {
            return Err(CardError::InvalidConfig(
                "Concurrent renders must be ≥ 1".into(),
            ));
        }
        if c.output_dir.as_os_str().is_empty() {
            return Err(CardError::InvalidConfig("Output directory must not be empty".into()));
        }
        Ok(self.config)
    }
}

// ── Storage ──────────────────────────────────────────────────────────────

/// Region used when `AWS_REGION` is unset.
pub const DEFAULT_REGION: &str = "us-east-1";

/// S3-compatible object-storage settings.
#[derive(Clone)]
pub struct StorageSettings {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Default: `us-east-1`.
    pub region: String,
    pub bucket: Option<String>,
    /// Custom endpoint (MinIO, R2, LocalStack). Switches to path-style URLs.
    pub endpoint: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            region: DEFAULT_REGION.to_string(),
            bucket: None,
            endpoint: None,
        }
    }
}

impl StorageSettings {
    /// True when access key, secret and bucket are all present and non-empty.
    pub fn is_configured(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        set(&self.access_key_id) && set(&self.secret_access_key) && set(&self.bucket)
    }
}

impl fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageSettings")
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_match_mobile_card_geometry() {
        let c = CardConfig::default();
        assert_eq!(c.viewport_width, 500);
        assert_eq!(c.provisional_height, 800);
        assert_eq!(c.device_scale_factor, 2.0);
        assert_eq!(c.height_margin, 40);
        assert_eq!(c.storage.region, "us-east-1");
        assert!(!c.storage.is_configured());
    }

    #[test]
    fn builder_clamps_and_validates() {
        let c = CardConfig::builder()
            .viewport_width(10)
            .max_concurrent_renders(0)
            .build()
            .unwrap();
        assert_eq!(c.viewport_width, 100);
        assert_eq!(c.max_concurrent_renders, 1);

        let err = CardConfig::builder()
            .max_viewport_height(100)
            .build()
            .unwrap_err();
        assert!(matches!(err, CardError::InvalidConfig(_)));
    }

    #[test]
    fn storage_requires_key_secret_and_bucket() {
        let mut s = StorageSettings {
            access_key_id: Some("AK".into()),
            secret_access_key: Some("SK".into()),
            bucket: Some("cards".into()),
            ..Default::default()
        };
        assert!(s.is_configured());
        s.bucket = Some(String::new());
        assert!(!s.is_configured());
        s.bucket = None;
        assert!(!s.is_configured());
    }

    #[test]
    fn from_lookup_reads_environment_names() {
        let c = CardConfig::from_lookup(lookup(&[
            ("AWS_ACCESS_KEY_ID", "AK"),
            ("AWS_SECRET_ACCESS_KEY", "SK"),
            ("S3_BUCKET_NAME", "cards"),
            ("S3_ENDPOINT", "http://localhost:9000"),
            ("OUTPUT_DIR", "/srv/cards"),
            ("PUPPETEER_EXECUTABLE_PATH", "/opt/chrome"),
            ("CARD_RENDER_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();
        assert!(c.storage.is_configured());
        assert_eq!(c.storage.region, "us-east-1");
        assert_eq!(c.storage.endpoint.as_deref(), Some("http://localhost:9000"));
        assert_eq!(c.output_dir, PathBuf::from("/srv/cards"));
        assert_eq!(c.chrome_executable, Some(PathBuf::from("/opt/chrome")));
        assert_eq!(c.render_timeout_secs, 15);
    }

    #[test]
    fn from_lookup_treats_empty_as_unset() {
        let c = CardConfig::from_lookup(lookup(&[
            ("AWS_ACCESS_KEY_ID", "AK"),
            ("AWS_SECRET_ACCESS_KEY", ""),
            ("S3_BUCKET_NAME", "cards"),
            ("OUTPUT_DIR", ""),
        ]))
        .unwrap();
        assert!(!c.storage.is_configured());
        assert_eq!(c.output_dir, PathBuf::from("./output"));
    }

    #[test]
    fn chrome_env_takes_precedence_over_puppeteer() {
        let c = CardConfig::from_lookup(lookup(&[
            ("CHROME_EXECUTABLE_PATH", "/a/chrome"),
            ("PUPPETEER_EXECUTABLE_PATH", "/b/chrome"),
        ]))
        .unwrap();
        assert_eq!(c.chrome_executable, Some(PathBuf::from("/a/chrome")));
    }

    #[test]
    fn bad_timeout_is_invalid_config() {
        let err = CardConfig::from_lookup(lookup(&[("CARD_RENDER_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn debug_redacts_secret() {
        let c = CardConfig::builder()
            .storage(StorageSettings {
                secret_access_key: Some("hunter2".into()),
                ..Default::default()
            })
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }
}
