//! Board documents on top of a [`FileStore`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::{FileStore, PutRequest, RemoteFile, StoreError};
use crate::board::{BoardSnapshot, Revision, Version};
use crate::config::Config;
use crate::error::{BoardError, Result, StoreOperation};

/// Commit message used when the caller has nothing more specific.
pub const DEFAULT_SAVE_MESSAGE: &str = "Update board data";

/// Placeholder file keeping the data directory in the repository.
const KEEP_FILE: &str = ".gitkeep";

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedBoard {
    /// Revision of the written file, needed for the next write
    pub revision: Revision,
    /// Version stamped into the written snapshot
    pub version: Version,
}

/// A board file found in the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerEntry {
    pub customer_id: String,
    pub path: String,
    pub revision: Revision,
}

/// Reads and writes customer boards through a [`FileStore`].
pub struct BoardStore<S: FileStore> {
    store: S,
    config: Config,
}

impl<S: FileStore> BoardStore<S> {
    /// Create a board store over `store`, using `config` for branch and paths.
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    /// Get a reference to the underlying file store.
    pub fn file_store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// List all boards in the data directory.
    ///
    /// A missing data directory holds no boards and lists as empty.
    pub async fn list_customers(&self) -> Result<Vec<CustomerEntry>> {
        let files = match self
            .store
            .list_files(&self.config.data_dir, &self.config.branch)
            .await
        {
            Ok(files) => files,
            Err(StoreError::NotFound) => {
                log::debug!("No data directory '{}'", self.config.data_dir);
                Vec::new()
            }
            Err(e) => {
                log::error!("Error loading customer list: {}", e);
                return Err(BoardError::from_store(e, "", StoreOperation::List));
            }
        };

        Ok(files
            .into_iter()
            .filter(|file| file.name != KEEP_FILE)
            .map(|file| CustomerEntry {
                customer_id: file
                    .name
                    .strip_suffix(".json")
                    .unwrap_or(&file.name)
                    .to_string(),
                path: file.path,
                revision: file.sha,
            })
            .collect())
    }

    /// Load a board, checking the caller's password hash against the stored one.
    pub async fn load(&self, customer_id: &str, password_hash: &str) -> Result<BoardSnapshot> {
        let snapshot = self.load_admin(customer_id).await?;
        if snapshot.password_hash != password_hash {
            log::warn!("Rejected password for board '{}'", customer_id);
            return Err(BoardError::IncorrectCredential(customer_id.to_string()));
        }
        Ok(snapshot)
    }

    /// Load a board without a credential check.
    pub async fn load_admin(&self, customer_id: &str) -> Result<BoardSnapshot> {
        let result = self
            .read_board(customer_id, &self.config.branch, StoreOperation::Load)
            .await;
        log_failure(StoreOperation::Load, customer_id, result)
    }

    /// Read the newest stored board, bypassing any cache on branch reads.
    ///
    /// Resolves the branch to its latest commit id first and reads the file at
    /// that commit. Use this after a rejected write, when a branch read may
    /// still return the content the write was rejected against.
    pub async fn fetch_latest(&self, customer_id: &str) -> Result<BoardSnapshot> {
        let result = async {
            let head = self
                .store
                .get_latest_revision(&self.config.branch)
                .await
                .map_err(|e| BoardError::from_store(e, customer_id, StoreOperation::FetchLatest))?;
            log::debug!("Fetching '{}' at {}", customer_id, head);
            self.read_board(customer_id, &head, StoreOperation::FetchLatest)
                .await
        }
        .await;
        log_failure(StoreOperation::FetchLatest, customer_id, result)
    }

    /// Write a board, stamping it with the next version.
    ///
    /// `expected_revision` must be the revision the caller last read or wrote;
    /// `None` only succeeds when the board does not exist yet. A stale revision
    /// fails with [`BoardError::PreconditionFailed`].
    pub async fn save(
        &self,
        customer_id: &str,
        snapshot: &BoardSnapshot,
        message: &str,
        expected_revision: Option<&str>,
    ) -> Result<SavedBoard> {
        let version = snapshot.version.next();
        let result = async {
            let stamped = BoardSnapshot {
                version,
                ..snapshot.clone()
            };
            let json = stamped.to_json()?;

            let revision = self
                .store
                .put_file(PutRequest {
                    path: self.config.board_path(customer_id),
                    content: STANDARD.encode(json.as_bytes()),
                    branch: self.config.branch.clone(),
                    message: message.to_string(),
                    expected_revision: expected_revision.map(String::from),
                })
                .await
                .map_err(|e| BoardError::from_store(e, customer_id, StoreOperation::Save))?;

            log::info!("Saved board '{}' at {}", customer_id, version);
            Ok(SavedBoard { revision, version })
        }
        .await;
        log_failure(StoreOperation::Save, customer_id, result)
    }

    /// Delete a board.
    pub async fn delete(&self, customer_id: &str) -> Result<()> {
        let result = async {
            let path = self.config.board_path(customer_id);
            let file = self
                .store
                .get_file(&path, &self.config.branch)
                .await
                .map_err(|e| BoardError::from_store(e, customer_id, StoreOperation::Delete))?;

            self.store
                .delete_file(
                    &path,
                    &self.config.branch,
                    &format!("Delete customer: {customer_id}"),
                    &file.sha,
                )
                .await
                .map_err(|e| BoardError::from_store(e, customer_id, StoreOperation::Delete))?;

            log::info!("Deleted board '{}'", customer_id);
            Ok(())
        }
        .await;
        log_failure(StoreOperation::Delete, customer_id, result)
    }

    async fn read_board(
        &self,
        customer_id: &str,
        reference: &str,
        operation: StoreOperation,
    ) -> Result<BoardSnapshot> {
        let path = self.config.board_path(customer_id);
        let file = self
            .store
            .get_file(&path, reference)
            .await
            .map_err(|e| BoardError::from_store(e, customer_id, operation))?;

        let json = self.file_content(&file, customer_id, operation).await?;

        let mut snapshot = BoardSnapshot::from_json(&json)?;
        snapshot.revision = Some(file.sha);
        Ok(snapshot)
    }

    /// Decode a file's content, going through the blob endpoint for large files.
    async fn file_content(
        &self,
        file: &RemoteFile,
        customer_id: &str,
        operation: StoreOperation,
    ) -> Result<String> {
        let encoded = match file.content.as_deref() {
            Some(content) if !content.trim().is_empty() => content.to_string(),
            _ => {
                log::debug!("Large file, reading blob {}", file.sha);
                self.store
                    .get_blob(&file.sha)
                    .await
                    .map_err(|e| match e {
                        // The file was listed, so a missing blob is a store fault
                        StoreError::NotFound => BoardError::Transport {
                            operation,
                            message: format!("blob {} missing", file.sha),
                        },
                        other => BoardError::from_store(other, customer_id, operation),
                    })?
            }
        };
        decode_base64(&encoded)
    }
}

/// Decode base64 content that may be wrapped across lines.
fn decode_base64(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}

/// Log a store failure at the level it deserves and pass the result through.
///
/// A missing board is an expected outcome (new customer) and a stale write is
/// the conflict flow, so neither is logged as an error.
fn log_failure<T>(operation: StoreOperation, customer_id: &str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        match err {
            BoardError::NotFound(_) => {
                log::debug!("{} '{}': not found", operation, customer_id)
            }
            BoardError::PreconditionFailed(_) => {
                log::info!("{} '{}': revision is stale", operation, customer_id)
            }
            BoardError::IncorrectCredential(_) => {}
            other => log::error!("Failed to {} '{}': {}", operation, customer_id, other),
        }
    }
    result
}
