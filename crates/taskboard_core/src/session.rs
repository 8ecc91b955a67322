//! One editor's optimistic editing session on a board.
//!
//! A session remembers the snapshot the editor started from (the baseline,
//! with the revision it was read at). Saves are written against that revision;
//! when the store rejects one, the session fetches the newest board and hands
//! back a [`ConflictVerdict`] instead of overwriting anything.
//!
//! ```ignore
//! let mut session = BoardSession::open(&store, "acme", &hash).await?;
//! let mut local = session.baseline().clone();
//! local.columns.move_task(7, ColumnId::Done);
//!
//! match session.save(&local, DEFAULT_SAVE_MESSAGE).await? {
//!     SaveOutcome::Saved(saved) => println!("saved {}", saved.version),
//!     SaveOutcome::Conflict(verdict) => show_dialog(verdict),
//! }
//! ```

use crate::board::{BoardSnapshot, ColumnSet};
use crate::error::{BoardError, Result};
use crate::reconcile::{ConflictResolution, ConflictVerdict, evaluate};
use crate::store::{BoardStore, FileStore, SavedBoard};

/// Result of a save attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The board was written; the session baseline now matches it
    Saved(SavedBoard),
    /// Someone else wrote first; nothing was written
    Conflict(ConflictVerdict),
}

impl SaveOutcome {
    pub fn is_conflict(&self) -> bool {
        matches!(self, SaveOutcome::Conflict(_))
    }
}

/// Editing session for one customer's board.
pub struct BoardSession<'a, S: FileStore> {
    store: &'a BoardStore<S>,
    customer_id: String,
    baseline: BoardSnapshot,
}

impl<'a, S: FileStore> BoardSession<'a, S> {
    /// Open a board, checking the password hash.
    pub async fn open(
        store: &'a BoardStore<S>,
        customer_id: &str,
        password_hash: &str,
    ) -> Result<Self> {
        let baseline = store.load(customer_id, password_hash).await?;
        Ok(Self::resume(store, customer_id, baseline))
    }

    /// Open a board without a credential check.
    pub async fn open_admin(store: &'a BoardStore<S>, customer_id: &str) -> Result<Self> {
        let baseline = store.load_admin(customer_id).await?;
        Ok(Self::resume(store, customer_id, baseline))
    }

    /// Write a new board and start a session on it.
    ///
    /// Fails with [`BoardError::PreconditionFailed`] if the board already exists.
    pub async fn create(
        store: &'a BoardStore<S>,
        customer_id: &str,
        snapshot: BoardSnapshot,
        message: &str,
    ) -> Result<Self> {
        let saved = store.save(customer_id, &snapshot, message, None).await?;
        let baseline = BoardSnapshot {
            version: saved.version,
            revision: Some(saved.revision),
            ..snapshot
        };
        Ok(Self::resume(store, customer_id, baseline))
    }

    /// Continue a session from a baseline obtained earlier.
    ///
    /// The baseline's `revision` is what the next save is checked against. A
    /// baseline without one can only be saved if the board does not exist;
    /// otherwise the save reports a conflict.
    pub fn resume(store: &'a BoardStore<S>, customer_id: &str, baseline: BoardSnapshot) -> Self {
        log::debug!(
            "Session on '{}' starts at {}",
            customer_id,
            baseline.version
        );
        Self {
            store,
            customer_id: customer_id.to_string(),
            baseline,
        }
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    /// The snapshot local edits are measured against.
    pub fn baseline(&self) -> &BoardSnapshot {
        &self.baseline
    }

    pub fn into_baseline(self) -> BoardSnapshot {
        self.baseline
    }

    /// Compare local columns against the newest stored board without writing.
    pub async fn check_remote(&self, local: &ColumnSet) -> Result<ConflictVerdict> {
        let remote = self.store.fetch_latest(&self.customer_id).await?;
        Ok(evaluate(
            &self.baseline.columns,
            local,
            &remote,
            Some(self.baseline.version),
            false,
        ))
    }

    /// Save `local` against the baseline revision.
    ///
    /// The written version is always the baseline version plus one, whatever
    /// version `local` carries. A rejected write re-reads the newest board and
    /// reports a conflict; the version read back is not trusted, since a
    /// cached read may still show the baseline.
    pub async fn save(&mut self, local: &BoardSnapshot, message: &str) -> Result<SaveOutcome> {
        let pending = BoardSnapshot {
            version: self.baseline.version,
            ..local.clone()
        };

        match self
            .store
            .save(
                &self.customer_id,
                &pending,
                message,
                self.baseline.revision.as_deref(),
            )
            .await
        {
            Ok(saved) => {
                self.baseline = BoardSnapshot {
                    version: saved.version,
                    revision: Some(saved.revision.clone()),
                    ..pending
                };
                Ok(SaveOutcome::Saved(saved))
            }
            Err(BoardError::PreconditionFailed(_)) => {
                let remote = self.store.fetch_latest(&self.customer_id).await?;
                let verdict = evaluate(
                    &self.baseline.columns,
                    &local.columns,
                    &remote,
                    Some(self.baseline.version),
                    true,
                );
                Ok(SaveOutcome::Conflict(verdict))
            }
            Err(err) => Err(err),
        }
    }

    /// Settle a conflict reported by [`Self::save`].
    ///
    /// `KeepRemote` adopts `remote` as the new baseline and writes nothing,
    /// returning `None`. `KeepLocal` writes `local` over `remote`; the write is
    /// checked against `remote`'s revision, so it can conflict again.
    pub async fn resolve(
        &mut self,
        local: &BoardSnapshot,
        remote: &BoardSnapshot,
        resolution: ConflictResolution,
        message: &str,
    ) -> Result<Option<SaveOutcome>> {
        log::info!(
            "Resolving conflict on '{}' with {:?}",
            self.customer_id,
            resolution
        );
        self.baseline = remote.clone();
        if !resolution.writes() {
            return Ok(None);
        }
        self.save(local, message).await.map(Some)
    }
}
