//! Shared types, error model, and configuration for Papertrail.
//!
//! This crate is the foundation depended on by all other Papertrail crates.
//! It provides:
//! - [`PapertrailError`]: the unified error type
//! - Domain types ([`Candidate`], [`ArtifactKind`])
//! - Filename policies ([`sanitize_filename`], [`sanitize_document_filename`])
//! - Configuration ([`AppConfig`], [`FetchConfig`], config loading)

pub mod config;
pub mod error;
pub mod filename;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_INDEX_URL, DEFAULT_USER_AGENT, DefaultsConfig, FetchConfig,
    FetchPoliciesConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from, origin_url,
};
pub use error::{PapertrailError, Result};
pub use filename::{normalize_title, sanitize_document_filename, sanitize_filename};
pub use types::{ArtifactKind, Candidate};
