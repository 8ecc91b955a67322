#![doc = include_str!("../README.md")]

/// Board data model (tasks, columns, snapshots, versions)
pub mod board;

/// Configuration options
pub mod config;

/// Error (common error types)
pub mod error;

/// Reconciliation (three-way diff and conflict verdict)
pub mod reconcile;

/// Editing session (optimistic save with conflict reporting)
pub mod session;

/// File store abstraction and board persistence
pub mod store;

#[cfg(test)]
pub mod test_utils;

pub use board::{BoardSnapshot, Column, ColumnId, ColumnSet, Task, TaskId, Version};
pub use error::{BoardError, Result, StoreOperation};
pub use reconcile::{ChangeEvent, ConflictResolution, ConflictVerdict};
pub use session::{BoardSession, SaveOutcome};
