//! Core domain types for Papertrail.

use url::Url;

// ---------------------------------------------------------------------------
// Candidate
// ---------------------------------------------------------------------------

/// A paper entry parsed from the proceedings index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Human-readable title as displayed in the listing.
    pub title: String,
    /// Absolute URL of the paper's detail page.
    pub detail_url: Url,
}

// ---------------------------------------------------------------------------
// ArtifactKind
// ---------------------------------------------------------------------------

/// The kind of file persisted for a paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// UTF-8 abstract text, stored as `{title}.txt`.
    Abstract,
    /// Binary paper document, stored as `{title}.pdf`.
    Paper,
}

impl ArtifactKind {
    /// File extension (without the dot) for this artifact kind.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Abstract => "txt",
            Self::Paper => "pdf",
        }
    }

    /// Filename stem for a title, using the policy that belongs to this kind.
    pub fn file_stem(self, title: &str) -> String {
        match self {
            Self::Abstract => crate::filename::sanitize_filename(title),
            Self::Paper => crate::filename::sanitize_document_filename(title),
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abstract => write!(f, "abstract"),
            Self::Paper => write!(f, "paper"),
        }
    }
}
