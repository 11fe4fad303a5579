//! Fetching, content extraction, and fallback strategies.
//!
//! This crate provides:
//! - [`FetchSession`]: per-run HTTP client plus lazily launched browser
//! - [`renderer`]: headless browser abstraction (Chromium via chromiumoxide)
//! - [`strategies`]: abstract-fetch strategies and the [`AbstractRetriever`] chain
//! - [`catalog`]: proceedings index/detail markup parsing

pub mod catalog;
pub mod renderer;
pub mod session;
pub mod strategies;

pub use catalog::{TitleEntry, find_document_href, parse_title_entries, resolve_href};
pub use renderer::{ChromiumLauncher, ChromiumRenderer, Renderer, RendererFactory};
pub use session::FetchSession;
pub use strategies::{
    AbstractRetriever, AbstractStrategy, RenderedStrategy, StaticHtmlStrategy, extract_rendered,
    extract_static,
};
