//! Rendering-surface capability.
//!
//! The rendering engine drives a surface through [`RenderSurface`] only, so
//! its sequencing (load, measure, resize, capture, teardown) can be tested
//! with a fake and the browser automation stays in [`chrome`].
//!
//! One [`SurfaceLauncher::launch`] call yields one fresh surface, owned by a
//! single render call and closed by it on every exit path.

pub mod chrome;

use crate::error::CardError;
use async_trait::async_trait;

pub use chrome::{ChromeLauncher, ChromeSurface};

/// Device-metrics override applied to the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// CSS pixels.
    pub width: u32,
    /// CSS pixels.
    pub height: u32,
    /// Device pixels per CSS pixel.
    pub scale: f64,
}

/// Result of measuring the rendered content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMeasure {
    /// `scrollHeight` of the `.container` element.
    Container(u32),
    /// No container: `scrollHeight` of the document body.
    Document(u32),
}

/// An isolated page that can lay out and rasterise one document.
#[async_trait]
pub trait RenderSurface: Send {
    /// Load the HTML and wait until pending loads have settled.
    async fn load_document(&mut self, html: &str) -> Result<(), CardError>;

    async fn set_viewport(&mut self, viewport: Viewport) -> Result<(), CardError>;

    async fn measure_content_height(&mut self) -> Result<ContentMeasure, CardError>;

    /// PNG bytes of the current viewport.
    async fn capture_image(&mut self) -> Result<Vec<u8>, CardError>;

    /// Tear down the underlying process. Called exactly once.
    async fn close(self: Box<Self>) -> Result<(), CardError>;
}

/// Creates a fresh [`RenderSurface`] per render call.
#[async_trait]
pub trait SurfaceLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn RenderSurface>, CardError>;
}
