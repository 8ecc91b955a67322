//! Change event types produced by the differ.
//!
//! Each event describes one difference between the baseline snapshot and a
//! later one, for one task.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::board::{ColumnId, Task, TaskId};

/// Kind of a [`ChangeEvent`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Deleted,
    Modified,
    Moved,
}

/// One discrete difference between a baseline and a later snapshot.
///
/// Serialized in the shape the browser front end renders:
/// `{"changeType": "moved", "task": {...}, "fromColumn": "todo", "toColumn": "done"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "changeType", rename_all = "lowercase")]
pub enum ChangeEvent {
    /// The task did not exist in the baseline
    Added {
        /// The task as it now exists
        task: Task,
        /// Column now holding the task
        #[serde(rename = "toColumn")]
        to_column: ColumnId,
    },
    /// The task existed in the baseline and is gone
    Deleted {
        /// The task as it was in the baseline
        task: Task,
        /// Column that held the task in the baseline
        #[serde(rename = "fromColumn")]
        from_column: ColumnId,
    },
    /// The task stayed in its column but its content changed
    Modified {
        /// The task as it now exists
        task: Task,
        /// Column holding the task
        #[serde(rename = "toColumn")]
        column: ColumnId,
    },
    /// The task now sits in a different column
    Moved {
        /// The task as it now exists
        task: Task,
        /// Column that held the task in the baseline
        #[serde(rename = "fromColumn")]
        from_column: ColumnId,
        /// Column now holding the task
        #[serde(rename = "toColumn")]
        to_column: ColumnId,
    },
}

impl ChangeEvent {
    /// Get the kind of change
    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeEvent::Added { .. } => ChangeKind::Added,
            ChangeEvent::Deleted { .. } => ChangeKind::Deleted,
            ChangeEvent::Modified { .. } => ChangeKind::Modified,
            ChangeEvent::Moved { .. } => ChangeKind::Moved,
        }
    }

    /// Get the task snapshot carried by the event
    pub fn task(&self) -> &Task {
        match self {
            ChangeEvent::Added { task, .. }
            | ChangeEvent::Deleted { task, .. }
            | ChangeEvent::Modified { task, .. }
            | ChangeEvent::Moved { task, .. } => task,
        }
    }

    /// Get the id of the changed task
    pub fn task_id(&self) -> TaskId {
        self.task().id
    }

    /// Column the task left, for deletions and moves
    pub fn from_column(&self) -> Option<ColumnId> {
        match self {
            ChangeEvent::Deleted { from_column, .. } | ChangeEvent::Moved { from_column, .. } => {
                Some(*from_column)
            }
            ChangeEvent::Added { .. } | ChangeEvent::Modified { .. } => None,
        }
    }

    /// Column the task is in after the change, for everything but deletions
    pub fn to_column(&self) -> Option<ColumnId> {
        match self {
            ChangeEvent::Added { to_column, .. } | ChangeEvent::Moved { to_column, .. } => {
                Some(*to_column)
            }
            ChangeEvent::Modified { column, .. } => Some(*column),
            ChangeEvent::Deleted { .. } => None,
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeEvent::Added { task, to_column } => {
                write!(f, "added #{} \"{}\" to {}", task.id, task.description, to_column)
            }
            ChangeEvent::Deleted { task, from_column } => {
                write!(
                    f,
                    "deleted #{} \"{}\" from {}",
                    task.id, task.description, from_column
                )
            }
            ChangeEvent::Modified { task, column } => {
                write!(f, "modified #{} \"{}\" in {}", task.id, task.description, column)
            }
            ChangeEvent::Moved {
                task,
                from_column,
                to_column,
            } => write!(
                f,
                "moved #{} \"{}\" from {} to {}",
                task.id, task.description, from_column, to_column
            ),
        }
    }
}

/// Both sides' changes relative to a shared baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Changes made by this editor
    pub local: Vec<ChangeEvent>,
    /// Changes found in the latest stored snapshot
    pub remote: Vec<ChangeEvent>,
}

impl ChangeSet {
    /// True when neither side changed anything
    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.remote.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let task = Task::new(4, "Menu");

        let moved = ChangeEvent::Moved {
            task: task.clone(),
            from_column: ColumnId::Todo,
            to_column: ColumnId::Retest,
        };
        assert_eq!(moved.kind(), ChangeKind::Moved);
        assert_eq!(moved.task_id(), 4);
        assert_eq!(moved.from_column(), Some(ColumnId::Todo));
        assert_eq!(moved.to_column(), Some(ColumnId::Retest));

        let deleted = ChangeEvent::Deleted {
            task: task.clone(),
            from_column: ColumnId::Done,
        };
        assert_eq!(deleted.from_column(), Some(ColumnId::Done));
        assert_eq!(deleted.to_column(), None);

        let modified = ChangeEvent::Modified {
            task,
            column: ColumnId::Feedback,
        };
        assert_eq!(modified.from_column(), None);
        assert_eq!(modified.to_column(), Some(ColumnId::Feedback));
    }

    #[test]
    fn test_wire_format() {
        let event = ChangeEvent::Moved {
            task: Task::new(1, "Hero image"),
            from_column: ColumnId::Todo,
            to_column: ColumnId::Done,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["changeType"], "moved");
        assert_eq!(value["fromColumn"], "todo");
        assert_eq!(value["toColumn"], "done");
        assert_eq!(value["task"]["id"], 1);

        let event = ChangeEvent::Modified {
            task: Task::new(2, "Copy"),
            column: ColumnId::InProgress,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["changeType"], "modified");
        assert_eq!(value["toColumn"], "inprogress");
        assert!(value.get("fromColumn").is_none());
    }

    #[test]
    fn test_display() {
        let event = ChangeEvent::Added {
            task: Task::new(5, "Cookie banner"),
            to_column: ColumnId::Todo,
        };
        assert_eq!(event.to_string(), "added #5 \"Cookie banner\" to todo");
    }
}
