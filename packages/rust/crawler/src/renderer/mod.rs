//! Renderer abstraction for browser-based page rendering.
//!
//! A [`RendererFactory`] is owned by the [`FetchSession`](crate::FetchSession)
//! and invoked at most once per session; the [`Renderer`] it returns is
//! released through [`Renderer::shutdown`].

mod chromium;

use std::time::Duration;

use async_trait::async_trait;

use papertrail_shared::{FetchConfig, Result};

pub use chromium::{ChromiumLauncher, ChromiumRenderer, find_chromium};

/// A running scriptable browser.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Navigate to `url`, wait up to `wait` for the page body, and return the
    /// rendered DOM as HTML.
    async fn render(&self, url: &str, wait: Duration) -> Result<String>;

    /// Close the browser and release its process.
    async fn shutdown(self: Box<Self>) -> Result<()>;
}

/// Launches a [`Renderer`] on demand.
#[async_trait]
pub trait RendererFactory: Send + Sync {
    async fn launch(&self, config: &FetchConfig) -> Result<Box<dyn Renderer>>;
}
