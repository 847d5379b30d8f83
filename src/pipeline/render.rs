//! Rendering engine: drive a surface from document to PNG bytes.
//!
//! ## Protocol
//!
//! 1. launch a fresh surface
//! 2. load the serialised document and wait for it to settle
//! 3. viewport `width × provisional_height` at `device_scale_factor`
//! 4. measure: `.container` height + `height_margin`, or the whole
//!    document height when the container is missing
//! 5. viewport `width × measured` at the same density, capture
//! 6. close the surface
//!
//! Steps 2–5 run under the configured deadline. Step 6 runs on every exit
//! path, after errors and timeouts alike; a failed close is logged and never
//! masks the render's own outcome.
//!
//! Two passes are needed because the content height depends on text and
//! list lengths that the deck model cannot predict.

use crate::config::CardConfig;
use crate::document::ComposedDocument;
use crate::error::{CardError, RenderStage};
use crate::pipeline::encode::png_dimensions;
use crate::surface::{ContentMeasure, RenderSurface, SurfaceLauncher, Viewport};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Render `doc` to PNG bytes on a freshly launched surface.
pub async fn render_document(
    doc: &ComposedDocument,
    launcher: &dyn SurfaceLauncher,
    config: &CardConfig,
) -> Result<Vec<u8>, CardError> {
    let started = Instant::now();
    let html = doc.to_html();

    let mut surface = launcher.launch().await?;
    debug!("Rendering surface launched in {:?}", started.elapsed());

    let outcome = if config.render_timeout_secs == 0 {
        drive(surface.as_mut(), &html, config).await
    } else {
        let limit = Duration::from_secs(config.render_timeout_secs);
        match tokio::time::timeout(limit, drive(surface.as_mut(), &html, config)).await {
            Ok(result) => result,
            Err(_) => Err(CardError::RenderTimeout {
                secs: config.render_timeout_secs,
            }),
        }
    };

    if let Err(e) = surface.close().await {
        warn!("Rendering surface teardown failed: {e}");
    }

    let png = outcome?;
    info!(
        "Rendered {} card(s) → {} bytes PNG in {:?}",
        doc.card_count(),
        png.len(),
        started.elapsed()
    );
    Ok(png)
}

/// Final viewport height in CSS pixels for a measurement.
///
/// Content taller than `max_viewport_height` is a measure failure: the
/// capture covers exactly the viewport, so a smaller viewport would crop it.
pub fn final_height(measure: ContentMeasure, config: &CardConfig) -> Result<u32, CardError> {
    let raw = match measure {
        ContentMeasure::Container(h) => h.saturating_add(config.height_margin),
        ContentMeasure::Document(h) => h,
    };
    if raw > config.max_viewport_height {
        return Err(CardError::render(
            RenderStage::Measure,
            format!(
                "content height {raw} px exceeds max viewport height {} px",
                config.max_viewport_height
            ),
        ));
    }
    Ok(raw.max(1))
}

async fn drive(
    surface: &mut dyn RenderSurface,
    html: &str,
    config: &CardConfig,
) -> Result<Vec<u8>, CardError> {
    surface.load_document(html).await?;

    surface
        .set_viewport(Viewport {
            width: config.viewport_width,
            height: config.provisional_height,
            scale: config.device_scale_factor,
        })
        .await?;

    let measure = surface.measure_content_height().await?;
    let height = final_height(measure, config)?;
    debug!(?measure, height, "Measured content");

    surface
        .set_viewport(Viewport {
            width: config.viewport_width,
            height,
            scale: config.device_scale_factor,
        })
        .await?;

    let png = surface.capture_image().await?;
    let (w, h) = png_dimensions(&png)
        .map_err(|e| {
            CardError::render(RenderStage::Capture, format!("capture is not a PNG: {e}"))
        })?;
    debug!("Captured {w}x{h} px");
    Ok(png)
}
