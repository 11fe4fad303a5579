//! Single-paper download: title → detail page → `pdf` link → document file.
//!
//! Unlike the catalog walk, every HTTP failure here is returned to the
//! caller. A missing title or missing document link is `Ok(None)`.

use std::path::PathBuf;

use tracing::{info, instrument, warn};
use url::Url;

use papertrail_crawler::{FetchSession, find_document_href, parse_title_entries, resolve_href};
use papertrail_shared::{ArtifactKind, FetchConfig, PapertrailError, Result, normalize_title};
use papertrail_storage::ArtifactStore;

/// Configuration for [`download_paper`].
#[derive(Debug, Clone)]
pub struct PaperConfig {
    /// Title to look up; `_` is read as `:`.
    pub title: String,
    /// Directory documents are written to (created if missing).
    pub out_dir: PathBuf,
    /// Proceedings index page.
    pub index_url: Url,
    /// HTTP settings for the lookup.
    pub fetch: FetchConfig,
}

/// Download the paper document for `config.title` over plain HTTP.
pub async fn download_paper(config: &PaperConfig) -> Result<Option<PathBuf>> {
    let session = FetchSession::new(config.fetch.clone())?;
    download_paper_with(config, &session).await
}

/// Download the paper document using an existing session.
///
/// Returns the stored path, or `None` if the title or its document link
/// could not be found. An already stored document short-circuits before
/// any request is made.
#[instrument(skip_all, fields(title = %config.title))]
pub async fn download_paper_with(
    config: &PaperConfig,
    session: &FetchSession,
) -> Result<Option<PathBuf>> {
    let title = normalize_title(config.title.trim());
    if title.is_empty() {
        return Err(PapertrailError::validation("paper title is empty"));
    }

    let store = ArtifactStore::open(&config.out_dir, ArtifactKind::Paper)?;
    let path = store.path_for(&title);

    if store.exists(&title) {
        info!(path = %path.display(), "paper already in directory");
        return Ok(Some(path));
    }
    info!(path = %path.display(), "paper not on disk, looking it up");

    let origin = config.fetch.origin_for(&config.index_url)?;
    let index_html = session.get_text(&config.index_url).await?;

    let needle = title.to_lowercase();
    let Some(entry) = parse_title_entries(&index_html)
        .into_iter()
        .find(|entry| entry.label.to_lowercase().contains(&needle))
    else {
        warn!(%title, "paper not found");
        return Ok(None);
    };

    let Some(href) = entry.href else {
        warn!(%title, entry = %entry.label, "matched entry has no detail link");
        return Ok(None);
    };

    let detail_url = resolve_href(&origin, &href)?;
    let detail_html = session.get_text(&detail_url).await?;

    let Some(document_href) = find_document_href(&detail_html) else {
        warn!(%title, url = %detail_url, "PDF link not found");
        return Ok(None);
    };

    let document_url = resolve_href(&origin, &document_href)?;
    let bytes = session.get_bytes(&document_url).await?;
    store.save_bytes(&bytes, &path)?;

    info!(path = %path.display(), url = %document_url, "successfully downloaded");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ALPHA: &str = "/content/CVPR2024/html/Alpha_Unified_Scene_Graphs_CVPR_2024_paper.html";
    const ALPHA_PDF: &str =
        "/content/CVPR2024/papers/Alpha_Unified_Scene_Graphs_CVPR_2024_paper.pdf";
    const PDF_BYTES: &[u8] = b"%PDF-1.7\n\x00\x01binary\xff";

    fn load_fixture(name: &str) -> String {
        let path = format!("../../../fixtures/html/{name}");
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    async fn mount_html(server: &MockServer, route: &str, body: String, times: u64) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(times)
            .mount(server)
            .await;
    }

    fn config_for(server: &MockServer, title: &str) -> PaperConfig {
        PaperConfig {
            title: title.into(),
            out_dir: std::env::temp_dir().join(format!("pt-paper-{}", Uuid::now_v7())),
            index_url: Url::parse(&format!("{}/CVPR2024?day=all", server.uri())).unwrap(),
            fetch: FetchConfig::default(),
        }
    }

    fn session_for(config: &PaperConfig) -> FetchSession {
        FetchSession::new(config.fetch.clone()).unwrap()
    }

    #[tokio::test]
    async fn second_call_makes_no_requests() {
        let server = MockServer::start().await;
        mount_html(&server, "/CVPR2024", load_fixture("index.html"), 1).await;
        mount_html(&server, ALPHA, load_fixture("detail_id.html"), 1).await;
        Mock::given(method("GET"))
            .and(path(ALPHA_PDF))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(PDF_BYTES))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server, "alpha_ unified scene");
        let session = session_for(&config);

        let first = download_paper_with(&config, &session).await.unwrap().unwrap();
        assert_eq!(first, config.out_dir.join("alpha_ unified scene.pdf"));
        assert_eq!(std::fs::read(&first).unwrap(), PDF_BYTES);

        let second = download_paper_with(&config, &session).await.unwrap().unwrap();
        assert_eq!(second, first);

        let _ = std::fs::remove_dir_all(&config.out_dir);
    }

    #[tokio::test]
    async fn missing_pdf_link_writes_nothing() {
        let server = MockServer::start().await;
        let index = r#"<html><body><dl>
            <dt class="ptitle"><a href="/some.html">Some:Title Revisited</a></dt>
        </dl></body></html>"#;
        mount_html(&server, "/CVPR2024", index.into(), 1).await;
        mount_html(&server, "/some.html", load_fixture("detail_no_pdf.html"), 1).await;

        let config = config_for(&server, "Some_Title");
        let result = download_paper_with(&config, &session_for(&config)).await.unwrap();

        assert_eq!(result, None);
        assert_eq!(std::fs::read_dir(&config.out_dir).unwrap().count(), 0);

        let _ = std::fs::remove_dir_all(&config.out_dir);
    }

    #[tokio::test]
    async fn first_match_in_document_order_wins() {
        let server = MockServer::start().await;
        let index = r#"<html><body><dl>
            <dt class="ptitle"><a href="/long.html">Depth Anything: Longer Title</a></dt>
            <dt class="ptitle"><a href="/short.html">Depth Anything</a></dt>
        </dl></body></html>"#;
        mount_html(&server, "/CVPR2024", index.into(), 1).await;
        mount_html(&server, "/long.html", r#"<a href="/long.pdf">pdf</a>"#.into(), 1).await;
        mount_html(&server, "/short.html", r#"<a href="/short.pdf">pdf</a>"#.into(), 0).await;
        Mock::given(method("GET"))
            .and(path("/long.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"long".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server, "depth anything");
        let stored = download_paper_with(&config, &session_for(&config))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(std::fs::read(&stored).unwrap(), b"long");

        let _ = std::fs::remove_dir_all(&config.out_dir);
    }

    #[tokio::test]
    async fn unknown_title_is_none() {
        let server = MockServer::start().await;
        mount_html(&server, "/CVPR2024", load_fixture("index.html"), 1).await;

        let config = config_for(&server, "Nonexistent Paper");
        let result = download_paper_with(&config, &session_for(&config)).await.unwrap();

        assert_eq!(result, None);

        let _ = std::fs::remove_dir_all(&config.out_dir);
    }

    #[tokio::test]
    async fn detail_http_error_propagates() {
        let server = MockServer::start().await;
        mount_html(&server, "/CVPR2024", load_fixture("index.html"), 1).await;
        Mock::given(method("GET"))
            .and(path(ALPHA))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server, "Alpha_ Unified Scene Graphs");
        let err = download_paper_with(&config, &session_for(&config))
            .await
            .unwrap_err();

        assert!(matches!(err, PapertrailError::Http { status: 500, .. }));
        assert!(!config.out_dir.join("Alpha_ Unified Scene Graphs.pdf").exists());

        let _ = std::fs::remove_dir_all(&config.out_dir);
    }

    #[tokio::test]
    async fn empty_title_is_rejected() {
        let config = PaperConfig {
            title: "   ".into(),
            out_dir: std::env::temp_dir().join(format!("pt-paper-{}", Uuid::now_v7())),
            index_url: Url::parse("https://example.org/CVPR2024").unwrap(),
            fetch: FetchConfig::default(),
        };

        let err = download_paper_with(&config, &session_for(&config))
            .await
            .unwrap_err();
        assert!(matches!(err, PapertrailError::Validation { .. }));
    }
}
