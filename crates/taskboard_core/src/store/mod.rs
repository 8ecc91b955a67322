//! Access to the version-controlled file store that holds the boards.
//!
//! The hosted store itself is reached through the [`FileStore`] trait; the
//! transport behind it (REST calls, auth, retries) lives outside this crate.
//! [`BoardStore`] layers board semantics on top: paths, base64 content,
//! version stamping, credential checks and cache-bypassing reads.
//!
//! # Architecture
//!
//! ```text
//! BoardSession (baseline + optimistic save)
//!         ↓
//!    BoardStore (board documents)
//!         ↓
//!    FileStore (hosted API / MemoryFileStore / LocalFileStore)
//! ```

mod board_store;
/// Directory-backed store for local use
#[cfg(not(target_arch = "wasm32"))]
pub mod local;
/// In-memory versioned store
pub mod memory;

pub use board_store::{BoardStore, CustomerEntry, DEFAULT_SAVE_MESSAGE, SavedBoard};
#[cfg(not(target_arch = "wasm32"))]
pub use local::LocalFileStore;
pub use memory::MemoryFileStore;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::board::Revision;

/// A boxed future for object-safe async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Failure reported by a file store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The file, directory or reference does not exist
    #[error("not found")]
    NotFound,

    /// The expected revision supplied with a write is stale (HTTP 409)
    #[error("revision precondition failed")]
    PreconditionFailed,

    /// Any other failure talking to the store
    #[error("{0}")]
    Transport(String),
}

/// A file as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Content hash of the file, usable as a revision and as a blob id
    pub sha: Revision,
    /// Base64 content, possibly wrapped with newlines.
    /// `None` or empty for large files, which must be read through `get_blob`.
    pub content: Option<String>,
}

/// An entry in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// File name without directory
    pub name: String,
    /// Path relative to the repository root
    pub path: String,
    /// Content hash
    pub sha: Revision,
}

/// A create-or-update request.
#[derive(Debug, Clone)]
pub struct PutRequest {
    pub path: String,
    /// Base64-encoded content
    pub content: String,
    pub branch: String,
    /// Commit message
    pub message: String,
    /// Revision the caller last saw; required to overwrite an existing file
    pub expected_revision: Option<Revision>,
}

/// Trait for version-controlled file stores.
///
/// Mirrors the subset of a hosted source-control content API the board needs.
/// `reference` arguments accept a branch name or a commit id; reading by commit
/// id bypasses any caching the store applies to branch reads.
pub trait FileStore: Send + Sync {
    /// Human-readable name for this store
    fn name(&self) -> &str;

    /// Read a file at a branch or commit
    fn get_file(
        &self,
        path: &str,
        reference: &str,
    ) -> BoxFuture<'_, Result<RemoteFile, StoreError>>;

    /// Read a blob by content hash, returning base64 content
    fn get_blob(&self, sha: &str) -> BoxFuture<'_, Result<String, StoreError>>;

    /// Create or overwrite a file, returning the new content hash
    fn put_file(&self, request: PutRequest) -> BoxFuture<'_, Result<Revision, StoreError>>;

    /// Delete a file whose current content hash is `sha`
    fn delete_file(
        &self,
        path: &str,
        branch: &str,
        message: &str,
        sha: &str,
    ) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Id of the newest commit on a branch
    fn get_latest_revision(&self, branch: &str) -> BoxFuture<'_, Result<String, StoreError>>;

    /// List the files in a directory
    fn list_files(
        &self,
        directory: &str,
        reference: &str,
    ) -> BoxFuture<'_, Result<Vec<FileDescriptor>, StoreError>>;
}

/// Compute a content hash for stored files.
pub fn compute_content_hash(content: &[u8]) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
pub(crate) fn block_on_test<F: Future>(f: F) -> F::Output {
    futures_lite::future::block_on(f)
}
