//! # summary-card
//!
//! Render a "summary card deck" (a title, a description and a list of typed
//! cards) to a single PNG through headless Chrome, then return it inline as
//! base64, upload it to S3-compatible storage, or write it to disk.
//!
//! ## Pipeline Overview
//!
//! ```text
//! CardDeck
//!  │
//!  ├─ 1. Compose  deck → layout tree (slot per card type, themed containers)
//!  ├─ 2. Render   fresh Chrome per call: load, measure, resize, capture @2×
//!  ├─ 3. Resolve  auto → s3 | local | base64
//!  └─ 4. Deliver  base64 text, object URL, or absolute file path
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use summary_card::{parse_request, CardConfig, CardGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Storage from AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY / S3_BUCKET_NAME
//!     let config = CardConfig::from_env()?;
//!     let generator = CardGenerator::new(config)?;
//!
//!     let request = parse_request(r#"{
//!         "pageTitle": "Launch Week",
//!         "pageDescription": "What shipped",
//!         "items": [{"type": "data", "title": "Signups", "category": "Stats", "dataValue": "12k"}],
//!         "output_mode": "local",
//!         "filename": "launch"
//!     }"#)?;
//!     let result = generator.generate(&request).await?;
//!     println!("{}", result.payload); // /abs/path/output/launch.png
//!     Ok(())
//! }
//! ```
//!
//! ## Card Types
//!
//! | `type`    | Slot         | Content |
//! |-----------|--------------|---------|
//! | `default` | small        | badge, subtitle?, headline, description? |
//! | `data`    | small        | badge, subtitle?, highlighted value, description? |
//! | `list`    | large        | badge, subtitle?, headline, bullets |
//! | `full`    | full width   | as `default` |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `summary-card` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! summary-card = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod deck;
pub mod document;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod storage;
pub mod stylesheet;
pub mod surface;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CardConfig, CardConfigBuilder, StorageSettings};
pub use deck::{CardBody, CardDeck, CardItem, CardRequest, DeckStyle, ItemKind, Theme};
pub use document::ComposedDocument;
pub use error::{CardError, RenderStage};
pub use generate::{generate_sync, CardGenerator};
pub use output::{resolve_mode, ContentKind, EffectiveMode, OutputMode, RenderResult};
pub use pipeline::compose::compose;
pub use pipeline::input::{load_request, parse_request};
pub use surface::{ChromeLauncher, RenderSurface, SurfaceLauncher};
