//! Headless Chrome rendering surface over the DevTools protocol.
//!
//! Each [`ChromeLauncher::launch`] spawns its own browser process with a
//! throwaway profile directory, opens one blank page and hands back a
//! [`ChromeSurface`]. The surface owns the process: [`RenderSurface::close`]
//! closes the browser, waits for it to exit (killing it if the close
//! command fails), stops the CDP event loop and removes the profile.
//!
//! Launch flags: `--no-sandbox`, `--disable-setuid-sandbox` and
//! `--disable-dev-shm-usage`, so the browser runs in containers without
//! user-namespace privileges or a large `/dev/shm`.

use crate::config::CardConfig;
use crate::error::{CardError, RenderStage};
use crate::surface::{ContentMeasure, RenderSurface, SurfaceLauncher, Viewport};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::Deserialize;
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const LAUNCH_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
];

/// Resolves once fonts are ready and every image has loaded or failed.
const SETTLE_SCRIPT: &str = r#"(async () => {
  if (document.fonts && document.fonts.ready) { await document.fonts.ready; }
  await Promise.all(Array.from(document.images)
    .filter((img) => !img.complete)
    .map((img) => new Promise((resolve) => { img.onload = img.onerror = resolve; })));
  return true;
})()"#;

const MEASURE_SCRIPT: &str = r#"(() => {
  const container = document.querySelector('.container');
  if (container) { return { container: true, height: container.scrollHeight }; }
  return { container: false, height: document.body ? document.body.scrollHeight : 0 };
})()"#;

#[derive(Deserialize)]
struct Measured {
    container: bool,
    height: f64,
}

// ── Launcher ─────────────────────────────────────────────────────────────

/// Spawns one headless Chrome per render.
#[derive(Debug, Clone, Default)]
pub struct ChromeLauncher {
    executable: Option<PathBuf>,
}

impl ChromeLauncher {
    /// Use the executable from `config`, or search for one at launch time.
    pub fn new(config: &CardConfig) -> Self {
        Self {
            executable: config.chrome_executable.clone(),
        }
    }

    fn resolve_executable(&self) -> Result<Option<PathBuf>, CardError> {
        match chrome_locate::locate_chrome(self.executable.as_deref()) {
            Ok(path) => Ok(Some(path)),
            // An explicit path that does not exist is a hard error.
            Err(e @ chrome_locate::LocateError::MissingExecutable { .. }) => {
                Err(CardError::render(RenderStage::Launch, e))
            }
            Err(e) => {
                debug!("{e}; falling back to chromiumoxide detection");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl SurfaceLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Box<dyn RenderSurface>, CardError> {
        let launch_err = |e: &dyn std::fmt::Display| CardError::render(RenderStage::Launch, e);

        let profile = tempfile::Builder::new()
            .prefix("summary-card-chrome-")
            .tempdir()
            .map_err(|e| launch_err(&e))?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile.path())
            .args(LAUNCH_ARGS.iter().copied());
        if let Some(exe) = self.resolve_executable()? {
            debug!("Launching Chrome: {}", exe.display());
            builder = builder.chrome_executable(exe);
        }
        let config = builder.build().map_err(|e| launch_err(&e))?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| launch_err(&e))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler event error: {e}");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let surface = ChromeSurface::from_parts(browser, None, handler, profile);
                if let Err(close_err) = Box::new(surface).shutdown().await {
                    warn!("Chrome teardown after failed page open: {close_err}");
                }
                return Err(launch_err(&e));
            }
        };

        Ok(Box::new(ChromeSurface::from_parts(
            browser,
            Some(page),
            handler,
            profile,
        )))
    }
}

// ── Surface ──────────────────────────────────────────────────────────────

/// One running Chrome process with a single page.
pub struct ChromeSurface {
    browser: Browser,
    page: Option<Page>,
    handler: JoinHandle<()>,
    _profile: TempDir,
}

impl ChromeSurface {
    fn from_parts(
        browser: Browser,
        page: Option<Page>,
        handler: JoinHandle<()>,
        profile: TempDir,
    ) -> Self {
        Self {
            browser,
            page,
            handler,
            _profile: profile,
        }
    }

    fn page(&self, stage: RenderStage) -> Result<Page, CardError> {
        self.page
            .clone()
            .ok_or_else(|| CardError::render(stage, "page is not open"))
    }

    async fn evaluate<T: serde::de::DeserializeOwned>(
        page: Page,
        stage: RenderStage,
        expression: &str,
    ) -> Result<T, CardError> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(|e| CardError::render(stage, e))?;
        page.evaluate_expression(params)
            .await
            .map_err(|e| CardError::render(stage, e))?
            .into_value()
            .map_err(|e| CardError::render(stage, e))
    }

    async fn shutdown(mut self: Box<Self>) -> Result<(), CardError> {
        let closed = self.browser.close().await;
        let result = match closed {
            Ok(_) => self.browser.wait().await.map(|_| ()).map_err(|e| e.to_string()),
            Err(e) => {
                warn!("Chrome close command failed ({e}), killing process");
                match self.browser.kill().await {
                    Some(Err(kill_err)) => Err(kill_err.to_string()),
                    _ => Ok(()),
                }
            }
        };
        self.handler.abort();
        result.map_err(|e| CardError::Internal(format!("Chrome teardown failed: {e}")))
    }
}

#[async_trait]
impl RenderSurface for ChromeSurface {
    async fn load_document(&mut self, html: &str) -> Result<(), CardError> {
        let page = self.page(RenderStage::Load)?;
        page.set_content(html)
            .await
            .map_err(|e| CardError::render(RenderStage::Load, e))?;
        let _: bool = Self::evaluate(page, RenderStage::Load, SETTLE_SCRIPT).await?;
        Ok(())
    }

    async fn set_viewport(&mut self, viewport: Viewport) -> Result<(), CardError> {
        let params = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(viewport.width))
            .height(i64::from(viewport.height))
            .device_scale_factor(viewport.scale)
            .mobile(false)
            .build()
            .map_err(|e| CardError::render(RenderStage::Viewport, e))?;
        let page = self.page(RenderStage::Viewport)?;
        page.execute(params)
            .await
            .map_err(|e| CardError::render(RenderStage::Viewport, e))?;
        Ok(())
    }

    async fn measure_content_height(&mut self) -> Result<ContentMeasure, CardError> {
        let page = self.page(RenderStage::Measure)?;
        let m: Measured = Self::evaluate(page, RenderStage::Measure, MEASURE_SCRIPT).await?;
        if !m.height.is_finite() || m.height < 0.0 {
            return Err(CardError::render(
                RenderStage::Measure,
                format!("unusable content height {}", m.height),
            ));
        }
        let px = m.height.ceil() as u32;
        Ok(if m.container {
            ContentMeasure::Container(px)
        } else {
            ContentMeasure::Document(px)
        })
    }

    async fn capture_image(&mut self) -> Result<Vec<u8>, CardError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(false)
            .build();
        let page = self.page(RenderStage::Capture)?;
        page.screenshot(params)
            .await
            .map_err(|e| CardError::render(RenderStage::Capture, e))
    }

    async fn close(self: Box<Self>) -> Result<(), CardError> {
        self.shutdown().await
    }
}
