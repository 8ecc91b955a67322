//! Test utilities for taskboard_core
//!
//! Deterministic task and board builders shared by the unit tests.

use chrono::{TimeZone, Utc};

use crate::board::{BoardSnapshot, ColumnId, ColumnSet, Task, TaskId, Version};

/// A task with fixed timestamps and a description derived from its id.
pub fn task(id: TaskId) -> Task {
    let stamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    Task {
        created_at: stamp,
        updated_at: stamp,
        ..Task::new(id, format!("Task {id}"))
    }
}

/// Build a column set from `(column, task ids)` pairs using [`task`].
pub fn board(layout: &[(ColumnId, &[TaskId])]) -> ColumnSet {
    ColumnSet::with_tasks(
        layout
            .iter()
            .map(|(column, ids)| (*column, ids.iter().copied().map(task).collect())),
    )
}

/// Wrap columns in a snapshot at the given version.
pub fn snapshot(columns: ColumnSet, version: u64) -> BoardSnapshot {
    BoardSnapshot {
        columns,
        version: Version(version),
        ..BoardSnapshot::new("hash")
    }
}
