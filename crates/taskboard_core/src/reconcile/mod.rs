//! Optimistic-concurrency reconciliation.
//!
//! Given the baseline board an editor started from, their local edit, and the
//! latest stored board, this module works out what each side changed and
//! whether the editor has to be asked before saving.
//!
//! # Key Components
//!
//! - [`locate`] - find a task and the column holding it
//! - [`diff`] - three-way change sets relative to the baseline
//! - [`evaluate`] - the conflict verdict, with the version fast path
//! - [`ChangeEvent`] - one added/deleted/modified/moved task
//!
//! Everything here is pure: no I/O, no errors.

mod change;
mod diff;
mod locate;
/// Conflict resolution choices
pub mod resolution;
mod verdict;

pub use change::{ChangeEvent, ChangeKind, ChangeSet};
pub use diff::diff;
pub use locate::{TaskLocation, locate};
pub use resolution::ConflictResolution;
pub use verdict::{ConflictVerdict, evaluate};
