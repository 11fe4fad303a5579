//! Download workflows for Papertrail.
//!
//! This crate ties together fetching, extraction, and the artifact store
//! into the two end-to-end workflows: walking the catalog for abstracts
//! ([`catalog::download_abstracts`]) and fetching a single paper document
//! ([`paper::download_paper`]).

pub mod catalog;
pub mod paper;
pub mod progress;

pub use catalog::{AbstractsConfig, WalkSummary, download_abstracts, download_abstracts_with};
pub use paper::{PaperConfig, download_paper, download_paper_with};
pub use progress::{ProgressReporter, SilentProgress};
