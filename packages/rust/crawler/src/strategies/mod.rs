//! Abstract-fetch strategies and the ordered fallback chain that runs them.
//!
//! Strategies are tried in priority order; the first one that yields
//! non-empty text wins and later strategies are never invoked. The
//! browser-backed strategy is last because it is the expensive one.

mod rendered;
mod static_html;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::session::FetchSession;

pub use rendered::{RenderedStrategy, extract_rendered};
pub use static_html::{StaticHtmlStrategy, extract_static};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// One way of retrieving an abstract from a detail page.
///
/// Implementations fail soft: every error is logged and turned into `None`.
#[async_trait]
pub trait AbstractStrategy: Send + Sync {
    /// Try to fetch the abstract at `url`.
    async fn fetch(&self, session: &mut FetchSession, url: &Url) -> Option<String>;

    /// Human-readable strategy name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Retriever
// ---------------------------------------------------------------------------

/// Runs strategies in order and returns the first non-empty abstract.
pub struct AbstractRetriever {
    strategies: Vec<Box<dyn AbstractStrategy>>,
}

impl AbstractRetriever {
    /// Static HTML first, rendered DOM second.
    pub fn new() -> Self {
        Self {
            strategies: vec![Box::new(StaticHtmlStrategy), Box::new(RenderedStrategy)],
        }
    }

    /// Build a retriever from an explicit strategy list (tried in order).
    pub fn with_strategies(strategies: Vec<Box<dyn AbstractStrategy>>) -> Self {
        Self { strategies }
    }

    /// Names of the configured strategies, in the order they are tried.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Retrieve the abstract at `url`, or `None` if every strategy came up empty.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn retrieve(&self, session: &mut FetchSession, url: &Url) -> Option<String> {
        for strategy in &self.strategies {
            match strategy.fetch(session, url).await {
                Some(text) if !text.trim().is_empty() => {
                    debug!(strategy = strategy.name(), "abstract found");
                    return Some(text);
                }
                _ => debug!(strategy = strategy.name(), "no abstract"),
            }
        }

        warn!(%url, "failed to get abstract using all methods");
        None
    }
}

impl Default for AbstractRetriever {
    fn default() -> Self {
        Self::new()
    }
}
