//! Per-run fetch session: one HTTP client plus a lazily launched browser.
//!
//! The HTTP client is reused for every request of a run (connection reuse,
//! fixed User-Agent). The browser is only launched the first time a rendered
//! fetch needs it and must be released with [`FetchSession::shutdown`].

use std::time::Duration;

use reqwest::{Client, Response};
use tracing::{debug, info, warn};
use url::Url;

use papertrail_shared::{FetchConfig, PapertrailError, Result};

use crate::renderer::{ChromiumLauncher, Renderer, RendererFactory};

/// HTTP and browser state shared by every fetch in one run.
pub struct FetchSession {
    config: FetchConfig,
    client: Client,
    factory: Box<dyn RendererFactory>,
    renderer: Option<Box<dyn Renderer>>,
    /// Set once a launch attempt failed; later rendered fetches do not retry.
    launch_failed: bool,
}

impl FetchSession {
    /// Create a session that launches Chromium when a rendered fetch is needed.
    pub fn new(config: FetchConfig) -> Result<Self> {
        Self::with_renderer_factory(config, Box::new(ChromiumLauncher))
    }

    /// Create a session with a caller-owned browser factory.
    pub fn with_renderer_factory(
        config: FetchConfig,
        factory: Box<dyn RendererFactory>,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| PapertrailError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            factory,
            renderer: None,
            launch_failed: false,
        })
    }

    /// Upper bound for waiting on a rendered page body.
    pub fn render_wait(&self) -> Duration {
        self.config.render_wait
    }

    /// Whether the browser has been launched in this session.
    pub fn browser_launched(&self) -> bool {
        self.renderer.is_some()
    }

    /// GET `url` and return the body as text. Non-2xx statuses are errors.
    pub async fn get_text(&self, url: &Url) -> Result<String> {
        let response = self.send(url).await?;
        response
            .text()
            .await
            .map_err(|e| PapertrailError::Network(format!("{url}: body read failed: {e}")))
    }

    /// GET `url` and return the raw body. Non-2xx statuses are errors.
    pub async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self.send(url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PapertrailError::Network(format!("{url}: body read failed: {e}")))?;
        Ok(bytes.to_vec())
    }

    async fn send(&self, url: &Url) -> Result<Response> {
        debug!(%url, "GET");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| PapertrailError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PapertrailError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// Return the browser, launching it on first use.
    pub async fn renderer(&mut self) -> Result<&dyn Renderer> {
        if self.renderer.is_none() {
            if self.launch_failed {
                return Err(PapertrailError::Browser(
                    "browser failed to launch earlier in this session".into(),
                ));
            }
            info!("launching headless browser");
            match self.factory.launch(&self.config).await {
                Ok(renderer) => self.renderer = Some(renderer),
                Err(e) => {
                    self.launch_failed = true;
                    return Err(e);
                }
            }
        }

        self.renderer
            .as_deref()
            .ok_or_else(|| PapertrailError::Browser("browser session unavailable".into()))
    }

    /// Release the browser if it was launched. Consumes the session.
    pub async fn shutdown(mut self) -> Result<()> {
        match self.renderer.take() {
            Some(renderer) => {
                info!("closing headless browser");
                renderer.shutdown().await
            }
            None => Ok(()),
        }
    }
}

impl Drop for FetchSession {
    fn drop(&mut self) {
        if self.renderer.is_some() {
            warn!("fetch session dropped without shutdown");
        }
    }
}
