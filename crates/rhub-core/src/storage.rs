//! Job-description file storage collaborator interface.
//!
//! The transport layer writes uploads into the store before the
//! lifecycle engine runs; the engine validates, records metadata, and
//! removes artifacts. Removal is best-effort and never surfaces as a
//! user-facing error.

use thiserror::Error;

/// File extensions accepted for job descriptions.
pub const ALLOWED_JD_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Upload size ceiling (5 MiB).
pub const MAX_JD_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// A file the transport layer has already written to storage.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Filename as submitted by the client.
    pub original_name: String,
    /// Stable path inside the file store.
    pub stored_path: String,
    pub size_bytes: u64,
}

/// Reference handed back for a JD download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdDownload {
    pub stored_path: String,
    pub file_name: String,
}

#[derive(Debug, Error)]
#[error("file store error: {0}")]
pub struct FileStoreError(pub String);

pub trait FileStore: Send + Sync {
    fn delete(&self, stored_path: &str) -> impl Future<Output = Result<(), FileStoreError>> + Send;

    fn exists(&self, stored_path: &str)
    -> impl Future<Output = Result<bool, FileStoreError>> + Send;
}

/// Whether the upload's extension is one of [`ALLOWED_JD_EXTENSIONS`].
pub fn extension_allowed(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_JD_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
