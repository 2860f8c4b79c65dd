//! Receipt and icon storage.
//!
//! Where attachment bytes end up is an external concern; the engine only
//! depends on the [`AttachmentStore`] contract. [`LocalAttachmentStore`]
//! ships as the default implementation, keeping files under a local uploads
//! directory.

use std::fs;
use std::path::PathBuf;

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// What an attachment is for. Selects the folder it lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachmentKind {
    Receipt,
    WalletIcon,
}

impl AttachmentKind {
    fn folder(self) -> &'static str {
        match self {
            Self::Receipt => "transactions",
            Self::WalletIcon => "wallets",
        }
    }
}

/// Attachment input: either a reference that is already stored, or a local
/// file that still needs to be copied in. Stored references pass through
/// every store unchanged.
#[derive(Clone, Debug, PartialEq)]
pub enum AttachmentSource {
    Stored(String),
    File(PathBuf),
}

/// External storage collaborator for receipt images and wallet icons.
pub trait AttachmentStore: Send + Sync {
    /// Persists `source` and returns a stable reference to it.
    fn store(&self, source: &AttachmentSource, kind: AttachmentKind) -> ResultEngine<String>;
}

/// Stores attachments under a local directory, one subfolder per kind, with
/// generated file names so uploads never collide.
#[derive(Clone, Debug)]
pub struct LocalAttachmentStore {
    root: PathBuf,
}

impl LocalAttachmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AttachmentStore for LocalAttachmentStore {
    fn store(&self, source: &AttachmentSource, kind: AttachmentKind) -> ResultEngine<String> {
        let path = match source {
            AttachmentSource::Stored(reference) => return Ok(reference.clone()),
            AttachmentSource::File(path) => path,
        };

        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or("jpg");
        let directory = self.root.join(kind.folder());
        fs::create_dir_all(&directory)
            .map_err(|err| EngineError::AttachmentUpload(err.to_string()))?;

        let target = directory.join(format!("file_{}.{extension}", Uuid::new_v4()));
        fs::copy(path, &target).map_err(|err| EngineError::AttachmentUpload(err.to_string()))?;

        Ok(target.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/test_attachments")
            .join(name);
        fs::create_dir_all(&root).unwrap();
        root
    }

    #[test]
    fn stored_references_pass_through() {
        let store = LocalAttachmentStore::new(scratch_dir("passthrough"));
        let reference = store
            .store(
                &AttachmentSource::Stored("uploads/receipt.jpg".to_string()),
                AttachmentKind::Receipt,
            )
            .unwrap();
        assert_eq!(reference, "uploads/receipt.jpg");
    }

    #[test]
    fn files_are_copied_under_the_kind_folder() {
        let root = scratch_dir("copy");
        let source = root.join("source.png");
        fs::write(&source, b"not really a png").unwrap();

        let store = LocalAttachmentStore::new(&root);
        let reference = store
            .store(&AttachmentSource::File(source), AttachmentKind::Receipt)
            .unwrap();

        assert!(reference.contains("transactions"));
        assert!(reference.ends_with(".png"));
        assert_eq!(fs::read(&reference).unwrap(), b"not really a png");
    }

    #[test]
    fn missing_source_file_fails() {
        let store = LocalAttachmentStore::new(scratch_dir("missing"));
        let err = store
            .store(
                &AttachmentSource::File(PathBuf::from("does/not/exist.jpg")),
                AttachmentKind::WalletIcon,
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::AttachmentUpload(_)));
    }
}
