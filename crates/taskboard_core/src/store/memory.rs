//! In-memory file store with commit history.
//!
//! Behaves like a hosted source-control content API closely enough to exercise
//! the board store: every write is a commit, file revisions are content hashes,
//! large files are only reachable through the blob endpoint, and branch reads
//! can be pinned to an old commit to mimic a stale upstream cache.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::{
    BoxFuture, FileDescriptor, FileStore, PutRequest, RemoteFile, StoreError, compute_content_hash,
};
use crate::board::Revision;

/// Width of base64 lines in file responses.
const BASE64_LINE_WIDTH: usize = 60;

#[derive(Debug, Clone)]
struct Commit {
    id: String,
    message: String,
    files: BTreeMap<String, String>,
}

#[derive(Debug)]
struct MemoryState {
    commits: Vec<Commit>,
    /// Commit served for branch-name reads while a stale cache is simulated
    cached_branch_commit: Option<usize>,
}

impl MemoryState {
    fn head(&self) -> &Commit {
        // commits always holds the root commit
        &self.commits[self.commits.len() - 1]
    }

    fn commit(&mut self, message: &str, files: BTreeMap<String, String>) {
        let id = format!("commit-{}", self.commits.len());
        self.commits.push(Commit {
            id,
            message: message.to_string(),
            files,
        });
    }
}

/// An in-memory [`FileStore`] on a single branch.
#[derive(Debug)]
pub struct MemoryFileStore {
    branch: String,
    blob_threshold: Option<usize>,
    state: Mutex<MemoryState>,
}

impl MemoryFileStore {
    /// Create an empty store whose only branch is `branch`.
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            blob_threshold: None,
            state: Mutex::new(MemoryState {
                commits: vec![Commit {
                    id: "commit-0".to_string(),
                    message: "Initial commit".to_string(),
                    files: BTreeMap::new(),
                }],
                cached_branch_commit: None,
            }),
        }
    }

    /// Omit inline content for files larger than `bytes` (builder pattern).
    pub fn with_blob_threshold(mut self, bytes: usize) -> Self {
        self.blob_threshold = Some(bytes);
        self
    }

    /// Commit a file with the given raw content (builder pattern).
    pub fn with_file(self, path: &str, content: &str) -> Self {
        {
            let mut state = self.lock();
            let mut files = state.head().files.clone();
            files.insert(path.to_string(), content.to_string());
            state.commit(&format!("Add {path}"), files);
        }
        self
    }

    /// Serve branch-name reads from the current head until [`Self::refresh_cache`].
    pub fn freeze_branch_cache(&self) {
        let mut state = self.lock();
        let head = state.commits.len() - 1;
        state.cached_branch_commit = Some(head);
    }

    /// Stop serving stale branch reads.
    pub fn refresh_cache(&self) {
        self.lock().cached_branch_commit = None;
    }

    /// Raw content of a file at the branch head.
    pub fn raw_content(&self, path: &str) -> Option<String> {
        self.lock().head().files.get(path).cloned()
    }

    /// Number of commits, including the root commit.
    pub fn commit_count(&self) -> usize {
        self.lock().commits.len()
    }

    /// Message of the newest commit.
    pub fn last_message(&self) -> String {
        self.lock().head().message.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve<'s>(&self, state: &'s MemoryState, reference: &str) -> Option<&'s Commit> {
        if reference == self.branch {
            let index = state
                .cached_branch_commit
                .unwrap_or(state.commits.len() - 1);
            return state.commits.get(index);
        }
        state.commits.iter().find(|commit| commit.id == reference)
    }

    fn current_sha(state: &MemoryState, path: &str) -> Option<Revision> {
        state
            .head()
            .files
            .get(path)
            .map(|content| compute_content_hash(content.as_bytes()))
    }
}

fn encode_wrapped(content: &str) -> String {
    let encoded = STANDARD.encode(content.as_bytes());
    encoded
        .as_bytes()
        .chunks(BASE64_LINE_WIDTH)
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

impl FileStore for MemoryFileStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get_file(
        &self,
        path: &str,
        reference: &str,
    ) -> BoxFuture<'_, Result<RemoteFile, StoreError>> {
        let path = path.to_string();
        let reference = reference.to_string();
        Box::pin(async move {
            let state = self.lock();
            let commit = self.resolve(&state, &reference).ok_or(StoreError::NotFound)?;
            let content = commit.files.get(&path).ok_or(StoreError::NotFound)?;

            let inline = match self.blob_threshold {
                Some(limit) if content.len() > limit => None,
                _ => Some(encode_wrapped(content)),
            };

            Ok(RemoteFile {
                sha: compute_content_hash(content.as_bytes()),
                content: inline,
            })
        })
    }

    fn get_blob(&self, sha: &str) -> BoxFuture<'_, Result<String, StoreError>> {
        let sha = sha.to_string();
        Box::pin(async move {
            let state = self.lock();
            state
                .commits
                .iter()
                .rev()
                .flat_map(|commit| commit.files.values())
                .find(|content| compute_content_hash(content.as_bytes()) == sha)
                .map(|content| encode_wrapped(content))
                .ok_or(StoreError::NotFound)
        })
    }

    fn put_file(&self, request: PutRequest) -> BoxFuture<'_, Result<Revision, StoreError>> {
        Box::pin(async move {
            if request.branch != self.branch {
                return Err(StoreError::NotFound);
            }

            let bytes = STANDARD
                .decode(request.content.as_bytes())
                .map_err(|e| StoreError::Transport(format!("invalid base64 content: {e}")))?;
            let content = String::from_utf8(bytes)
                .map_err(|e| StoreError::Transport(format!("invalid UTF-8 content: {e}")))?;

            let mut state = self.lock();
            let current = Self::current_sha(&state, &request.path);
            match (current.as_deref(), request.expected_revision.as_deref()) {
                (None, None) => {}
                (Some(current), Some(expected)) if current == expected => {}
                _ => return Err(StoreError::PreconditionFailed),
            }

            let revision = compute_content_hash(content.as_bytes());
            let mut files = state.head().files.clone();
            files.insert(request.path, content);
            state.commit(&request.message, files);
            Ok(revision)
        })
    }

    fn delete_file(
        &self,
        path: &str,
        branch: &str,
        message: &str,
        sha: &str,
    ) -> BoxFuture<'_, Result<(), StoreError>> {
        let path = path.to_string();
        let branch = branch.to_string();
        let message = message.to_string();
        let sha = sha.to_string();
        Box::pin(async move {
            if branch != self.branch {
                return Err(StoreError::NotFound);
            }

            let mut state = self.lock();
            match Self::current_sha(&state, &path) {
                None => return Err(StoreError::NotFound),
                Some(current) if current != sha => return Err(StoreError::PreconditionFailed),
                Some(_) => {}
            }

            let mut files = state.head().files.clone();
            files.remove(&path);
            state.commit(&message, files);
            Ok(())
        })
    }

    fn get_latest_revision(&self, branch: &str) -> BoxFuture<'_, Result<String, StoreError>> {
        let branch = branch.to_string();
        Box::pin(async move {
            if branch != self.branch {
                return Err(StoreError::NotFound);
            }
            Ok(self.lock().head().id.clone())
        })
    }

    fn list_files(
        &self,
        directory: &str,
        reference: &str,
    ) -> BoxFuture<'_, Result<Vec<FileDescriptor>, StoreError>> {
        let prefix = format!("{}/", directory.trim_end_matches('/'));
        let reference = reference.to_string();
        Box::pin(async move {
            let state = self.lock();
            let commit = self.resolve(&state, &reference).ok_or(StoreError::NotFound)?;

            let entries: Vec<FileDescriptor> = commit
                .files
                .iter()
                .filter_map(|(path, content)| {
                    let name = path.strip_prefix(&prefix)?;
                    if name.contains('/') {
                        return None;
                    }
                    Some(FileDescriptor {
                        name: name.to_string(),
                        path: path.clone(),
                        sha: compute_content_hash(content.as_bytes()),
                    })
                })
                .collect();

            if entries.is_empty() {
                return Err(StoreError::NotFound);
            }
            Ok(entries)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::block_on_test;

    fn put(
        store: &MemoryFileStore,
        path: &str,
        content: &str,
        expected: Option<&str>,
    ) -> Result<Revision, StoreError> {
        block_on_test(store.put_file(PutRequest {
            path: path.to_string(),
            content: STANDARD.encode(content),
            branch: "main".to_string(),
            message: format!("write {path}"),
            expected_revision: expected.map(String::from),
        }))
    }

    #[test]
    fn test_put_requires_current_revision() {
        let store = MemoryFileStore::new("main");

        let first = put(&store, "data/a.json", "one", None).unwrap();
        assert_eq!(
            put(&store, "data/a.json", "two", None),
            Err(StoreError::PreconditionFailed)
        );
        assert_eq!(
            put(&store, "data/a.json", "two", Some("stale")),
            Err(StoreError::PreconditionFailed)
        );

        let second = put(&store, "data/a.json", "two", Some(first.as_str())).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.raw_content("data/a.json").as_deref(), Some("two"));
        assert_eq!(store.commit_count(), 3);
        assert_eq!(store.last_message(), "write data/a.json");
    }

    #[test]
    fn test_frozen_cache_serves_old_content_on_branch_reads() {
        let store = MemoryFileStore::new("main").with_file("data/a.json", "old");
        store.freeze_branch_cache();

        let old = block_on_test(store.get_file("data/a.json", "main")).unwrap();
        put(&store, "data/a.json", "new", Some(old.sha.as_str())).unwrap();

        let cached = block_on_test(store.get_file("data/a.json", "main")).unwrap();
        assert_eq!(cached.sha, old.sha);

        let head = block_on_test(store.get_latest_revision("main")).unwrap();
        let fresh = block_on_test(store.get_file("data/a.json", &head)).unwrap();
        assert_ne!(fresh.sha, old.sha);

        store.refresh_cache();
        let refreshed = block_on_test(store.get_file("data/a.json", "main")).unwrap();
        assert_eq!(refreshed.sha, fresh.sha);
    }

    #[test]
    fn test_large_files_only_through_blob() {
        let body = "x".repeat(200);
        let store = MemoryFileStore::new("main")
            .with_blob_threshold(100)
            .with_file("data/big.json", &body);

        let file = block_on_test(store.get_file("data/big.json", "main")).unwrap();
        assert!(file.content.is_none());

        let blob = block_on_test(store.get_blob(&file.sha)).unwrap();
        assert!(blob.contains('\n'));
        let decoded = STANDARD.decode(blob.replace('\n', "")).unwrap();
        assert_eq!(decoded, body.as_bytes());
    }

    #[test]
    fn test_list_and_delete() {
        let store = MemoryFileStore::new("main")
            .with_file("data/.gitkeep", "")
            .with_file("data/acme.json", "{}")
            .with_file("data/archive/old.json", "{}");

        let files = block_on_test(store.list_files("data", "main")).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec![".gitkeep", "acme.json"]);

        let sha = files[1].sha.clone();
        assert_eq!(
            block_on_test(store.delete_file("data/acme.json", "main", "rm", "wrong")),
            Err(StoreError::PreconditionFailed)
        );
        block_on_test(store.delete_file("data/acme.json", "main", "rm", &sha)).unwrap();
        assert!(store.raw_content("data/acme.json").is_none());
        assert_eq!(
            block_on_test(store.get_file("data/acme.json", "main")),
            Err(StoreError::NotFound)
        );
        assert_eq!(
            block_on_test(store.list_files("missing", "main")),
            Err(StoreError::NotFound)
        );
    }
}
