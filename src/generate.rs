//! Card generation entry points.
//!
//! [`CardGenerator`] owns everything that outlives a single request: the
//! configuration, the surface launcher, the delivery channels (including the
//! shared S3 client) and a semaphore bounding how many browsers render at
//! once. Each call still composes its own document and launches its own
//! surface, so concurrent requests share no mutable state.
//!
//! ```text
//! CardDeck ──▶ compose ──▶ render ──▶ resolve_mode ──▶ deliver ──▶ RenderResult
//!             (pure)      (Chrome)   (pure)           (base64 / s3 / local)
//! ```

use crate::config::CardConfig;
use crate::deck::{CardDeck, CardRequest};
use crate::error::CardError;
use crate::output::{resolve_mode, OutputMode, RenderResult};
use crate::pipeline::{compose, deliver::Delivery, render};
use crate::surface::{ChromeLauncher, SurfaceLauncher};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info};

/// Renders card decks and delivers the images.
///
/// # Example
/// ```rust,no_run
/// use summary_card::{CardBody, CardConfig, CardDeck, CardGenerator, CardItem, OutputMode};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let generator = CardGenerator::new(CardConfig::from_env()?)?;
/// let deck = CardDeck::new("Q3 Review", "Highlights").item(CardItem::new(
///     "Revenue",
///     "Stats",
///     CardBody::Data { data_value: Some("+42%".into()), description: None },
/// ));
/// let result = generator.generate_deck(&deck, OutputMode::Base64, None).await?;
/// println!("{} base64 chars", result.payload.len());
/// # Ok(())
/// # }
/// ```
pub struct CardGenerator {
    config: CardConfig,
    launcher: Arc<dyn SurfaceLauncher>,
    delivery: Delivery,
    permits: Arc<Semaphore>,
}

impl CardGenerator {
    /// Headless Chrome surfaces, delivery channels from `config`.
    pub fn new(config: CardConfig) -> Result<Self, CardError> {
        let launcher = Arc::new(ChromeLauncher::new(&config));
        Self::with_launcher(config, launcher)
    }

    /// Use any surface launcher (fakes in tests, pooled browsers, …).
    pub fn with_launcher(
        config: CardConfig,
        launcher: Arc<dyn SurfaceLauncher>,
    ) -> Result<Self, CardError> {
        let delivery = Delivery::from_config(&config)?;
        Ok(Self::with_parts(config, launcher, delivery))
    }

    /// Fully explicit construction.
    pub fn with_parts(
        config: CardConfig,
        launcher: Arc<dyn SurfaceLauncher>,
        delivery: Delivery,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent_renders.max(1)));
        Self {
            config,
            launcher,
            delivery,
            permits,
        }
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn delivery(&self) -> &Delivery {
        &self.delivery
    }

    /// Compose and render `deck` to PNG bytes without delivering them.
    pub async fn render_png(&self, deck: &CardDeck) -> Result<Vec<u8>, CardError> {
        let doc = compose::compose(deck);

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| CardError::Internal(format!("render semaphore closed: {e}")))?;
        debug!(
            available = self.permits.available_permits(),
            "Acquired render slot"
        );

        render::render_document(&doc, self.launcher.as_ref(), &self.config).await
    }

    /// Render a request and deliver it through its requested channel.
    pub async fn generate(&self, request: &CardRequest) -> Result<RenderResult, CardError> {
        self.generate_deck(&request.deck, request.output_mode, request.filename())
            .await
    }

    /// Render `deck` and deliver it through `mode`.
    pub async fn generate_deck(
        &self,
        deck: &CardDeck,
        mode: OutputMode,
        filename: Option<&str>,
    ) -> Result<RenderResult, CardError> {
        let start = Instant::now();
        let filename = filename.filter(|f| !f.is_empty());
        info!(
            "Generating card deck '{}' ({} item(s), mode {mode})",
            deck.page_title,
            deck.items.len()
        );

        let png = self.render_png(deck).await?;

        let effective = resolve_mode(mode, filename.is_some(), self.delivery.storage_configured());
        debug!(requested = %mode, effective = %effective, "Resolved output mode");

        let result = self.delivery.deliver(png, effective, filename).await?;
        info!("Card delivered via {effective} in {:?}", start.elapsed());
        Ok(result)
    }
}

/// Synchronous wrapper around [`CardGenerator::generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    request: &CardRequest,
    config: &CardConfig,
) -> Result<RenderResult, CardError> {
    let generator = CardGenerator::new(config.clone())?;
    tokio::runtime::Runtime::new()
        .map_err(|e| CardError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(generator.generate(request))
}
