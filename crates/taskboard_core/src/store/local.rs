//! Directory-backed file store.
//!
//! Only available on non-WASM targets. There is no history: every reference
//! reads the working tree, and revisions are content hashes of the current
//! files. Writes still honor the expected-revision precondition, so two CLI
//! invocations racing on the same board see the same conflict flow as the
//! hosted store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::{
    BoxFuture, FileDescriptor, FileStore, PutRequest, RemoteFile, StoreError, compute_content_hash,
};
use crate::board::Revision;

/// Reference returned by [`LocalFileStore::get_latest_revision`].
const WORKING_TREE: &str = "working-tree";

/// A [`FileStore`] rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    fn read(&self, path: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.full_path(path)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_failure(path, e)),
        }
    }
}

fn io_failure(path: &str, err: std::io::Error) -> StoreError {
    StoreError::Transport(format!("{path}: {err}"))
}

impl FileStore for LocalFileStore {
    fn name(&self) -> &str {
        "local"
    }

    fn get_file(
        &self,
        path: &str,
        _reference: &str,
    ) -> BoxFuture<'_, Result<RemoteFile, StoreError>> {
        let path = path.to_string();
        Box::pin(async move {
            let content = self.read(&path)?.ok_or(StoreError::NotFound)?;
            Ok(RemoteFile {
                sha: compute_content_hash(content.as_bytes()),
                content: Some(STANDARD.encode(content.as_bytes())),
            })
        })
    }

    fn get_blob(&self, _sha: &str) -> BoxFuture<'_, Result<String, StoreError>> {
        // Content is always returned inline
        Box::pin(async move { Err(StoreError::NotFound) })
    }

    fn put_file(&self, request: PutRequest) -> BoxFuture<'_, Result<Revision, StoreError>> {
        Box::pin(async move {
            let bytes = STANDARD
                .decode(request.content.as_bytes())
                .map_err(|e| StoreError::Transport(format!("invalid base64 content: {e}")))?;

            let current = self
                .read(&request.path)?
                .map(|content| compute_content_hash(content.as_bytes()));
            match (current.as_deref(), request.expected_revision.as_deref()) {
                (None, None) => {}
                (Some(current), Some(expected)) if current == expected => {}
                _ => return Err(StoreError::PreconditionFailed),
            }

            let full_path = self.full_path(&request.path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).map_err(|e| io_failure(&request.path, e))?;
            }
            fs::write(&full_path, &bytes).map_err(|e| io_failure(&request.path, e))?;

            log::debug!("LocalFileStore: wrote {} ({})", request.path, request.message);
            Ok(compute_content_hash(&bytes))
        })
    }

    fn delete_file(
        &self,
        path: &str,
        _branch: &str,
        _message: &str,
        sha: &str,
    ) -> BoxFuture<'_, Result<(), StoreError>> {
        let path = path.to_string();
        let sha = sha.to_string();
        Box::pin(async move {
            let content = self.read(&path)?.ok_or(StoreError::NotFound)?;
            if compute_content_hash(content.as_bytes()) != sha {
                return Err(StoreError::PreconditionFailed);
            }
            fs::remove_file(self.full_path(&path)).map_err(|e| io_failure(&path, e))
        })
    }

    fn get_latest_revision(&self, _branch: &str) -> BoxFuture<'_, Result<String, StoreError>> {
        Box::pin(async move { Ok(WORKING_TREE.to_string()) })
    }

    fn list_files(
        &self,
        directory: &str,
        _reference: &str,
    ) -> BoxFuture<'_, Result<Vec<FileDescriptor>, StoreError>> {
        let directory = directory.trim_matches('/').to_string();
        Box::pin(async move {
            let dir = self.full_path(&directory);
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound),
                Err(e) => return Err(io_failure(&directory, e)),
            };

            let mut files = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| io_failure(&directory, e))?;
                let file_path = entry.path();
                if !file_path.is_file() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                let content = fs::read(&file_path).map_err(|e| io_failure(&name, e))?;
                files.push(FileDescriptor {
                    path: format!("{directory}/{name}"),
                    sha: compute_content_hash(&content),
                    name,
                });
            }
            files.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(files)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::block_on_test;

    fn put(
        store: &LocalFileStore,
        path: &str,
        content: &str,
        expected: Option<String>,
    ) -> Result<Revision, StoreError> {
        block_on_test(store.put_file(PutRequest {
            path: path.to_string(),
            content: STANDARD.encode(content),
            branch: "main".to_string(),
            message: "test".to_string(),
            expected_revision: expected,
        }))
    }

    #[test]
    fn test_write_read_and_precondition() {
        let temp = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(temp.path());

        let first = put(&store, "data/acme.json", "{\"columns\": []}", None).unwrap();
        assert!(temp.path().join("data/acme.json").exists());

        let file = block_on_test(store.get_file("data/acme.json", "main")).unwrap();
        assert_eq!(file.sha, first);
        let decoded = STANDARD.decode(file.content.unwrap()).unwrap();
        assert_eq!(decoded, b"{\"columns\": []}");

        assert_eq!(
            put(&store, "data/acme.json", "{}", Some("stale".to_string())),
            Err(StoreError::PreconditionFailed)
        );
        assert_eq!(
            put(&store, "data/acme.json", "{}", None),
            Err(StoreError::PreconditionFailed)
        );
        put(&store, "data/acme.json", "{}", Some(first)).unwrap();
    }

    #[test]
    fn test_list_and_delete() {
        let temp = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(temp.path());

        assert_eq!(
            block_on_test(store.list_files("data", "main")),
            Err(StoreError::NotFound)
        );

        let rev_b = put(&store, "data/b.json", "b", None).unwrap();
        put(&store, "data/a.json", "a", None).unwrap();

        let files = block_on_test(store.list_files("data", "main")).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
        assert_eq!(files[1].path, "data/b.json");

        block_on_test(store.delete_file("data/b.json", "main", "rm", &rev_b)).unwrap();
        assert_eq!(
            block_on_test(store.get_file("data/b.json", "main")),
            Err(StoreError::NotFound)
        );
    }
}
