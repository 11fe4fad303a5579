//! Proceedings markup parsing: title entries on the index page and the
//! document link on a detail page.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use papertrail_shared::{Candidate, PapertrailError, Result};

static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("dt.ptitle").expect("static selector"));
static ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("static selector"));
static HREF_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

/// Visible label of the document link on a detail page.
pub const DOCUMENT_LINK_LABEL: &str = "pdf";

/// One `dt.ptitle` entry from the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEntry {
    /// Trimmed text of the whole entry.
    pub label: String,
    /// Trimmed text of the entry's first anchor, if any.
    pub title: Option<String>,
    /// `href` of the entry's first anchor, if any.
    pub href: Option<String>,
}

impl TitleEntry {
    /// Resolve this entry into a [`Candidate`] against the site origin.
    ///
    /// Returns `Ok(None)` if the entry has no detail link.
    pub fn to_candidate(&self, origin: &Url) -> Result<Option<Candidate>> {
        let (Some(title), Some(href)) = (&self.title, &self.href) else {
            return Ok(None);
        };
        Ok(Some(Candidate {
            title: title.clone(),
            detail_url: resolve_href(origin, href)?,
        }))
    }
}

/// Parse all paper-title entries from the index page, in document order.
pub fn parse_title_entries(html: &str) -> Vec<TitleEntry> {
    let doc = Html::parse_document(html);

    doc.select(&TITLE_SEL)
        .map(|dt| {
            let anchor = dt.select(&ANCHOR_SEL).next();
            TitleEntry {
                label: dt.text().collect::<String>().trim().to_string(),
                title: anchor.map(|a| a.text().collect::<String>().trim().to_string()),
                href: anchor.and_then(|a| a.value().attr("href")).map(str::to_string),
            }
        })
        .collect()
}

/// Find the `href` of the first anchor labelled exactly `pdf`.
pub fn find_document_href(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);

    doc.select(&HREF_SEL)
        .find(|a| a.text().collect::<String>().trim() == DOCUMENT_LINK_LABEL)
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

/// Join a (usually relative) href onto the site origin.
pub fn resolve_href(origin: &Url, href: &str) -> Result<Url> {
    origin
        .join(href)
        .map_err(|e| PapertrailError::parse(format!("bad href '{href}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_href_forms() {
        let origin = Url::parse("https://openaccess.thecvf.com/").unwrap();
        assert_eq!(
            resolve_href(&origin, "/content/CVPR2024/html/A_paper.html")
                .unwrap()
                .as_str(),
            "https://openaccess.thecvf.com/content/CVPR2024/html/A_paper.html"
        );
        assert_eq!(
            resolve_href(&origin, "content/CVPR2024/papers/A_paper.pdf")
                .unwrap()
                .as_str(),
            "https://openaccess.thecvf.com/content/CVPR2024/papers/A_paper.pdf"
        );
    }

    #[test]
    fn entry_without_link_has_no_candidate() {
        let entries = parse_title_entries(
            r#"<dl><dt class="ptitle">Withdrawn Paper</dt>
               <dt class="ptitle"><a href="/x.html"> Kept </a></dt></dl>"#,
        );
        let origin = Url::parse("https://example.org/").unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "Withdrawn Paper");
        assert_eq!(entries[0].to_candidate(&origin).unwrap(), None);

        let candidate = entries[1].to_candidate(&origin).unwrap().unwrap();
        assert_eq!(candidate.title, "Kept");
        assert_eq!(candidate.detail_url.as_str(), "https://example.org/x.html");
    }

    #[test]
    fn document_href_needs_exact_label() {
        let html = r#"<dd>[<a href="/supp.pdf">supp</a>] [<a href="/p.pdf"> pdf </a>]
            [<a href="/other">pdfs</a>]</dd>"#;
        assert_eq!(find_document_href(html), Some("/p.pdf".into()));
        assert_eq!(find_document_href("<a href='/p.pdf'>PDF file</a>"), None);
    }
}
