//! On-disk JD file store and upload validation.

use std::path::{Path, PathBuf};

use rhub_core::error::{RhubError, RhubResult};
use rhub_core::storage::{
    FileStore, FileStoreError, MAX_JD_FILE_BYTES, StoredUpload, extension_allowed,
};

/// Validate an upload's extension and size against the JD constraints.
pub fn validate_upload(upload: &StoredUpload) -> RhubResult<()> {
    if !extension_allowed(&upload.original_name) {
        return Err(RhubError::invalid_input(
            "Only PDF, DOC, and DOCX files are allowed.",
        ));
    }
    if upload.size_bytes > MAX_JD_FILE_BYTES {
        return Err(RhubError::invalid_input(
            "File exceeds the maximum allowed size of 5 MB.",
        ));
    }
    Ok(())
}

/// [`FileStore`] backed by a directory on local disk. Stored paths are
/// relative to the root.
#[derive(Debug, Clone)]
pub struct DiskFileStore {
    root: PathBuf,
}

impl DiskFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, stored_path: &str) -> PathBuf {
        self.root.join(Path::new(stored_path))
    }
}

impl FileStore for DiskFileStore {
    async fn delete(&self, stored_path: &str) -> Result<(), FileStoreError> {
        tokio::fs::remove_file(self.resolve(stored_path))
            .await
            .map_err(|e| FileStoreError(format!("remove {stored_path}: {e}")))
    }

    async fn exists(&self, stored_path: &str) -> Result<bool, FileStoreError> {
        match tokio::fs::metadata(self.resolve(stored_path)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FileStoreError(format!("stat {stored_path}: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, size: u64) -> StoredUpload {
        StoredUpload {
            original_name: name.into(),
            stored_path: "uploads/x".into(),
            size_bytes: size,
        }
    }

    #[test]
    fn accepts_allowed_extensions() {
        assert!(validate_upload(&upload("jd.pdf", 1024)).is_ok());
        assert!(validate_upload(&upload("jd.DOCX", 1024)).is_ok());
    }

    #[test]
    fn rejects_wrong_type_and_oversize() {
        assert!(validate_upload(&upload("jd.exe", 1024)).is_err());
        assert!(validate_upload(&upload("no-extension", 1024)).is_err());
        assert!(validate_upload(&upload("jd.pdf", MAX_JD_FILE_BYTES + 1)).is_err());
    }
}
