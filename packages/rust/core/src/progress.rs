//! Progress reporting hooks for long-running downloads.

use crate::catalog::WalkSummary;

/// Progress callback for reporting download status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each catalog entry, whatever its outcome.
    fn entry_processed(&self, title: &str, saved: usize, target: usize);
    /// Called when a catalog walk completes.
    fn done(&self, summary: &WalkSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn entry_processed(&self, _title: &str, _saved: usize, _target: usize) {}
    fn done(&self, _summary: &WalkSummary) {}
}
