//! Catalog walk: index page → detail pages → abstract files.
//!
//! Entries are processed strictly one at a time in document order, with a
//! fixed pause after each entry that touched the network.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};
use url::Url;

use papertrail_crawler::{AbstractRetriever, FetchSession, TitleEntry, parse_title_entries};
use papertrail_shared::{ArtifactKind, FetchConfig, PapertrailError, Result};
use papertrail_storage::ArtifactStore;

use crate::progress::ProgressReporter;

/// Configuration for [`download_abstracts`].
#[derive(Debug, Clone)]
pub struct AbstractsConfig {
    /// Stop after this many abstracts are stored.
    pub count: usize,
    /// Directory abstracts are written to (created if missing).
    pub out_dir: PathBuf,
    /// Proceedings index page.
    pub index_url: Url,
    /// HTTP/browser settings for the run.
    pub fetch: FetchConfig,
}

/// Summary of a completed catalog walk.
#[derive(Debug, Clone, Default)]
pub struct WalkSummary {
    /// Title entries found on the index page.
    pub entries_found: usize,
    /// Abstracts fetched and written in this run.
    pub saved: usize,
    /// Entries whose abstract could not be fetched or written.
    pub failed: usize,
    /// Entries without a detail link.
    pub unlinked: usize,
    /// Entries whose abstract file was already on disk.
    pub skipped_existing: usize,
    /// Total duration of the walk.
    pub elapsed: Duration,
}

impl WalkSummary {
    /// Abstracts that count toward the requested total.
    pub fn collected(&self) -> usize {
        self.saved + self.skipped_existing
    }
}

/// What happened to a single catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryOutcome {
    Saved,
    Failed,
    Unlinked,
    SkippedExisting,
}

/// Walk the catalog with a Chromium-backed session and the default strategy chain.
pub async fn download_abstracts(
    config: &AbstractsConfig,
    progress: &dyn ProgressReporter,
) -> Result<WalkSummary> {
    let session = FetchSession::new(config.fetch.clone())?;
    download_abstracts_with(config, session, &AbstractRetriever::new(), progress).await
}

/// Walk the catalog using a caller-provided session and retriever.
///
/// The session is consumed: its browser is released before this returns,
/// whether the walk succeeded or failed.
#[instrument(skip_all, fields(index_url = %config.index_url, count = config.count))]
pub async fn download_abstracts_with(
    config: &AbstractsConfig,
    mut session: FetchSession,
    retriever: &AbstractRetriever,
    progress: &dyn ProgressReporter,
) -> Result<WalkSummary> {
    let result = walk(config, &mut session, retriever, progress).await;

    if let Err(e) = session.shutdown().await {
        warn!(error = %e, "failed to close browser session");
    }

    result
}

async fn walk(
    config: &AbstractsConfig,
    session: &mut FetchSession,
    retriever: &AbstractRetriever,
    progress: &dyn ProgressReporter,
) -> Result<WalkSummary> {
    let start = Instant::now();
    let store = ArtifactStore::open(&config.out_dir, ArtifactKind::Abstract)?;
    let origin = config.fetch.origin_for(&config.index_url)?;

    progress.phase("Fetching paper index");
    let index_html = session.get_text(&config.index_url).await?;
    let entries = parse_title_entries(&index_html);

    if entries.is_empty() {
        warn!("no paper titles found; the page structure might have changed");
        return Err(PapertrailError::structure(format!(
            "no paper title entries on {}",
            config.index_url
        )));
    }

    info!(entries = entries.len(), "found paper titles");
    progress.phase("Downloading abstracts");

    let mut summary = WalkSummary {
        entries_found: entries.len(),
        ..WalkSummary::default()
    };

    for entry in &entries {
        if summary.collected() >= config.count {
            break;
        }

        let outcome = process_entry(entry, &origin, &store, session, retriever).await;
        match outcome {
            EntryOutcome::Saved => summary.saved += 1,
            EntryOutcome::Failed => summary.failed += 1,
            EntryOutcome::Unlinked => summary.unlinked += 1,
            EntryOutcome::SkippedExisting => summary.skipped_existing += 1,
        }
        progress.entry_processed(&entry.label, summary.collected(), config.count);

        if outcome != EntryOutcome::SkippedExisting {
            tokio::time::sleep(config.fetch.request_delay).await;
        }
    }

    summary.elapsed = start.elapsed();

    info!(
        saved = summary.saved,
        failed = summary.failed,
        unlinked = summary.unlinked,
        skipped_existing = summary.skipped_existing,
        duration_ms = summary.elapsed.as_millis(),
        "download complete"
    );
    progress.done(&summary);

    Ok(summary)
}

async fn process_entry(
    entry: &TitleEntry,
    origin: &Url,
    store: &ArtifactStore,
    session: &mut FetchSession,
    retriever: &AbstractRetriever,
) -> EntryOutcome {
    let candidate = match entry.to_candidate(origin) {
        Ok(Some(candidate)) => candidate,
        Ok(None) => {
            warn!(entry = %entry.label, "no link found for paper");
            return EntryOutcome::Unlinked;
        }
        Err(e) => {
            warn!(entry = %entry.label, error = %e, "unusable detail link");
            return EntryOutcome::Failed;
        }
    };

    let path = store.path_for(&candidate.title);
    if store.exists(&candidate.title) {
        info!(title = %candidate.title, path = %path.display(), "abstract already stored");
        return EntryOutcome::SkippedExisting;
    }

    info!(title = %candidate.title, "fetching abstract");

    match retriever.retrieve(session, &candidate.detail_url).await {
        Some(text) => {
            if store.save_text(&text, &path) {
                EntryOutcome::Saved
            } else {
                EntryOutcome::Failed
            }
        }
        None => {
            warn!(
                title = %candidate.title,
                url = %candidate.detail_url,
                "couldn't find abstract"
            );
            EntryOutcome::Failed
        }
    }
}
