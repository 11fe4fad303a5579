//! Chromium-based renderer using chromiumoxide.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

use papertrail_shared::{FetchConfig, PapertrailError, Result};

use super::{Renderer, RendererFactory};

/// Env var that points at a Chromium executable.
const CHROMIUM_PATH_ENV: &str = "PAPERTRAIL_CHROMIUM_PATH";

/// Interval between checks for `<body>` after navigation.
const BODY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    for name in ["google-chrome", "chromium", "chromium-browser", "chrome"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Launches a headless [`ChromiumRenderer`].
pub struct ChromiumLauncher;

#[async_trait]
impl RendererFactory for ChromiumLauncher {
    async fn launch(&self, config: &FetchConfig) -> Result<Box<dyn Renderer>> {
        Ok(Box::new(ChromiumRenderer::launch(config).await?))
    }
}

/// A headless Chromium instance with a single reusable tab.
pub struct ChromiumRenderer {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumRenderer {
    /// Launch headless Chromium and open a blank tab.
    pub async fn launch(config: &FetchConfig) -> Result<Self> {
        let chrome_path = config
            .chromium_path
            .clone()
            .or_else(find_chromium)
            .ok_or_else(|| {
                PapertrailError::Browser(format!(
                    "Chromium not found; set fetch.chromium_path or {CHROMIUM_PATH_ENV}"
                ))
            })?;

        let browser_config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .build()
            .map_err(|e| PapertrailError::Browser(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| PapertrailError::Browser(format!("failed to launch Chromium: {e}")))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| PapertrailError::Browser(format!("failed to create page: {e}")))?;

        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    async fn wait_for_body(&self) {
        loop {
            if self.page.find_element("body").await.is_ok() {
                return;
            }
            tokio::time::sleep(BODY_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn render(&self, url: &str, wait: Duration) -> Result<String> {
        debug!(url, "rendering");

        tokio::time::timeout(wait, self.page.goto(url))
            .await
            .map_err(|_| {
                PapertrailError::Browser(format!("navigation timed out after {}s", wait.as_secs()))
            })?
            .map_err(|e| PapertrailError::Browser(format!("navigation failed: {e}")))?;

        tokio::time::timeout(wait, self.wait_for_body())
            .await
            .map_err(|_| {
                PapertrailError::Browser(format!(
                    "<body> not present after {}s",
                    wait.as_secs()
                ))
            })?;

        self.page
            .content()
            .await
            .map_err(|e| PapertrailError::Browser(format!("failed to read DOM: {e}")))
    }

    async fn shutdown(self: Box<Self>) -> Result<()> {
        let mut this = *self;
        let closed = this
            .browser
            .close()
            .await
            .map_err(|e| PapertrailError::Browser(format!("failed to close Chromium: {e}")));
        let _ = this.browser.wait().await;
        this.handler.abort();
        closed.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_chromium_render_and_shutdown() {
        let renderer = ChromiumRenderer::launch(&FetchConfig::default())
            .await
            .expect("failed to launch Chromium");

        let html = renderer
            .render(
                "data:text/html,<h2>Abstract</h2><p>Rendered text.</p>",
                Duration::from_secs(10),
            )
            .await
            .expect("render failed");

        assert!(html.contains("Rendered text."));

        Box::new(renderer).shutdown().await.expect("shutdown failed");
    }
}
