//! Plain-HTTP strategy.
//!
//! Extraction rules, first non-empty wins:
//! 1. element with id `abstract`
//! 2. element with class `abstract`
//! 3. `Abstract` followed by `:`, `.` or whitespace in the document text,
//!    captured up to the next newline

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::AbstractStrategy;
use crate::session::FetchSession;

static ID_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#abstract").expect("static selector"));
static CLASS_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".abstract").expect("static selector"));
static ABSTRACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)Abstract[:.\s]+(.*?)\n").expect("static regex"));

/// Fetches the detail page over plain HTTP and parses it statically.
pub struct StaticHtmlStrategy;

#[async_trait]
impl AbstractStrategy for StaticHtmlStrategy {
    async fn fetch(&self, session: &mut FetchSession, url: &Url) -> Option<String> {
        let body = match session.get_text(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(%url, error = %e, "static fetch failed");
                return None;
            }
        };

        extract_static(&Html::parse_document(&body))
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Apply the static extraction rules to a parsed document.
pub fn extract_static(doc: &Html) -> Option<String> {
    for (rule, sel) in [("id", &*ID_SEL), ("class", &*CLASS_SEL)] {
        if let Some(el) = doc.select(sel).next() {
            let text = el.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                debug!(rule, "abstract matched");
                return Some(text);
            }
        }
    }

    let text = doc.root_element().text().collect::<String>();
    let captured = ABSTRACT_RE
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());

    if captured.is_some() {
        debug!(rule = "regex", "abstract matched");
    }
    captured
}
