//! Browser-backed strategy for pages whose abstract is script-rendered.
//!
//! Extraction rules, first non-empty wins:
//! 1. element with id `abstract`
//! 2. the first non-empty following sibling of any element whose own text
//!    contains `Abstract`

use std::sync::LazyLock;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::AbstractStrategy;
use crate::session::FetchSession;

static ID_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#abstract").expect("static selector"));
static ALL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("*").expect("static selector"));

/// Literal marker searched for in element text.
const ABSTRACT_MARKER: &str = "Abstract";

/// Renders the detail page in the session's browser and inspects the DOM.
pub struct RenderedStrategy;

#[async_trait]
impl AbstractStrategy for RenderedStrategy {
    async fn fetch(&self, session: &mut FetchSession, url: &Url) -> Option<String> {
        let wait = session.render_wait();

        let renderer = match session.renderer().await {
            Ok(renderer) => renderer,
            Err(e) => {
                warn!(%url, error = %e, "browser unavailable");
                return None;
            }
        };

        let html = match renderer.render(url.as_str(), wait).await {
            Ok(html) => html,
            Err(e) => {
                warn!(%url, error = %e, "rendered fetch failed");
                return None;
            }
        };

        extract_rendered(&Html::parse_document(&html))
    }

    fn name(&self) -> &str {
        "rendered"
    }
}

/// Apply the rendered-DOM extraction rules to a parsed document.
pub fn extract_rendered(doc: &Html) -> Option<String> {
    if let Some(el) = doc.select(&ID_SEL).next() {
        let text = element_text(el);
        if !text.is_empty() {
            debug!(rule = "id", "abstract matched");
            return Some(text);
        }
    }

    for marker in doc.select(&ALL_SEL).filter(|el| own_text_contains(*el, ABSTRACT_MARKER)) {
        let sibling = marker
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .map(element_text)
            .find(|text| !text.is_empty());

        if let Some(text) = sibling {
            debug!(rule = "sibling", marker = marker.value().name(), "abstract matched");
            return Some(text);
        }
    }

    None
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Whether one of the element's direct text nodes contains `needle`.
fn own_text_contains(el: ElementRef<'_>, needle: &str) -> bool {
    el.children()
        .filter_map(|node| node.value().as_text())
        .any(|text| text.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Option<String> {
        extract_rendered(&Html::parse_document(html))
    }

    #[test]
    fn id_rule_first() {
        let html = r#"<html><body>
            <h2>Abstract</h2><p>Sibling text.</p>
            <section id="abstract"> Rendered by script. </section>
        </body></html>"#;
        assert_eq!(extract(html), Some("Rendered by script.".into()));
    }

    #[test]
    fn empty_id_uses_following_sibling() {
        let html = r#"<html><body>
            <div id="abstract"></div>
            <div class="wrap"><h2>Abstract</h2><span> </span><p>Real abstract.</p></div>
        </body></html>"#;
        assert_eq!(extract(html), Some("Real abstract.".into()));
    }

    #[test]
    fn missing_id_uses_following_sibling() {
        let html = r#"<html><body><b>Abstract</b><div>Only via sibling.</div></body></html>"#;
        assert_eq!(extract(html), Some("Only via sibling.".into()));
    }

    #[test]
    fn marker_in_later_text_node_matches() {
        let html = r#"<html><body><div id="abstract"> </div>
            <div><h2>Intro <b>x</b> Abstract</h2><p>After mixed heading.</p></div>
        </body></html>"#;
        assert_eq!(extract(html), Some("After mixed heading.".into()));
    }

    #[test]
    fn marker_is_case_sensitive_and_needs_sibling() {
        let html = r#"<html><body><div><h2>abstract</h2><p>lowercase marker</p></div>
            <div><h2>Abstract</h2></div></body></html>"#;
        assert_eq!(extract(html), None);
    }

    #[test]
    fn preceding_siblings_are_ignored() {
        let html = r#"<html><body><div><p>Before.</p><h2>Abstract</h2></div></body></html>"#;
        assert_eq!(extract(html), None);
    }
}
