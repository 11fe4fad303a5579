//! Filesystem artifact store.
//!
//! An [`ArtifactStore`] owns one output directory and one [`ArtifactKind`].
//! Files are keyed by sanitized title; the existence of a file is the only
//! marker that a paper was already fetched.
//!
//! **Write rules:**
//! - Text saves fail soft ([`ArtifactStore::save_text`] returns `bool`)
//! - Binary saves propagate errors ([`ArtifactStore::save_bytes`])
//! - Neither checks for an existing file; callers check [`ArtifactStore::exists`] first

use std::path::{Path, PathBuf};

use papertrail_shared::{ArtifactKind, PapertrailError, Result};
use tracing::{info, warn};

/// Output directory for one kind of artifact.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    kind: ArtifactKind,
}

impl ArtifactStore {
    /// Open the store at `root`, creating the directory if it is missing.
    pub fn open(root: impl Into<PathBuf>, kind: ArtifactKind) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| PapertrailError::io(&root, e))?;
        Ok(Self { root, kind })
    }

    /// Directory this store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Target path for a title: `{root}/{sanitized}.{ext}`.
    pub fn path_for(&self, title: &str) -> PathBuf {
        let stem = self.kind.file_stem(title);
        self.root.join(format!("{stem}.{}", self.kind.extension()))
    }

    /// Whether an artifact for `title` is already on disk.
    pub fn exists(&self, title: &str) -> bool {
        self.path_for(title).is_file()
    }

    /// Write `text` as UTF-8 to `path`, overwriting any existing file.
    ///
    /// Returns `false` (after logging the path and error) if the write fails.
    pub fn save_text(&self, text: &str, path: &Path) -> bool {
        match std::fs::write(path, text.as_bytes()) {
            Ok(()) => {
                info!(path = %path.display(), kind = %self.kind, "saved");
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to save");
                false
            }
        }
    }

    /// Write `bytes` verbatim to `path`, overwriting any existing file.
    pub fn save_bytes(&self, bytes: &[u8], path: &Path) -> Result<()> {
        std::fs::write(path, bytes).map_err(|e| PapertrailError::io(path, e))?;
        info!(path = %path.display(), bytes = bytes.len(), kind = %self.kind, "saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_root(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pt-store-{tag}-{}", Uuid::now_v7()))
    }

    #[test]
    fn open_creates_missing_directory() {
        let root = temp_root("open").join("nested");
        assert!(!root.exists());

        let store = ArtifactStore::open(&root, ArtifactKind::Abstract).unwrap();
        assert!(store.root().is_dir());

        let _ = std::fs::remove_dir_all(root.parent().unwrap());
    }

    #[test]
    fn path_for_uses_kind_policy() {
        let root = temp_root("paths");
        let abstracts = ArtifactStore::open(&root, ArtifactKind::Abstract).unwrap();
        let papers = ArtifactStore::open(&root, ArtifactKind::Paper).unwrap();

        assert_eq!(
            abstracts.path_for("A/B: C?"),
            root.join("A_B_ C_.txt")
        );
        assert_eq!(papers.path_for("A_ B (C)"), root.join("A_ B C.pdf"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn save_text_then_exists() {
        let root = temp_root("text");
        let store = ArtifactStore::open(&root, ArtifactKind::Abstract).unwrap();
        let path = store.path_for("Some Paper");

        assert!(!store.exists("Some Paper"));
        assert!(store.save_text("We propose ünïcode.", &path));
        assert!(store.exists("Some Paper"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "We propose ünïcode.");

        // Overwrites unconditionally.
        assert!(store.save_text("Second", &path));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Second");

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn save_text_reports_failure() {
        let root = temp_root("fail");
        let store = ArtifactStore::open(&root, ArtifactKind::Abstract).unwrap();
        let path = root.join("missing-dir").join("x.txt");

        assert!(!store.save_text("text", &path));
        assert!(!path.exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn save_bytes_writes_verbatim() {
        let root = temp_root("bytes");
        let store = ArtifactStore::open(&root, ArtifactKind::Paper).unwrap();
        let path = store.path_for("Doc");
        let payload = [0x25, 0x50, 0x44, 0x46, 0x00, 0xff];

        store.save_bytes(&payload, &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), payload);

        let err = store
            .save_bytes(&payload, &root.join("nope").join("x.pdf"))
            .unwrap_err();
        assert!(matches!(err, PapertrailError::Io { .. }));

        let _ = std::fs::remove_dir_all(&root);
    }
}
