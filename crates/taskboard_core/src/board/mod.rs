//! Board data model.
//!
//! A board is a [`BoardSnapshot`]: six fixed [`Column`]s holding [`Task`]s, plus
//! board-level metadata and a [`Version`] counter.

mod column;
mod snapshot;
mod task;
mod version;

pub use column::{Column, ColumnId, ColumnSet, StoredColumn};
pub use snapshot::{BoardSnapshot, Revision};
pub use task::{
    DeviceType, FeedbackAuthor, FeedbackItem, OwnerType, Task, TaskId, TaskType, tasks_are_equal,
};
pub use version::Version;
