//! Three-way change-set differ.

use indexmap::IndexSet;

use super::change::{ChangeEvent, ChangeSet};
use super::locate::{TaskLocation, locate};
use crate::board::{ColumnSet, TaskId};

/// Compute what changed locally and remotely, relative to `original`.
///
/// Every task id found in any of the three column sets is examined once and
/// yields at most one local and one remote event. Ids are visited in first-seen
/// order (original, local, remote), so the output is stable for equal inputs.
///
/// Moves and modifications are only reported for tasks present in all three
/// snapshots: a task moved locally but deleted remotely yields just the remote
/// deletion. A task added on both sides under the same id is reported as two
/// independent additions.
pub fn diff(original: &ColumnSet, local: &ColumnSet, remote: &ColumnSet) -> ChangeSet {
    let task_ids: IndexSet<TaskId> = original
        .task_ids()
        .chain(local.task_ids())
        .chain(remote.task_ids())
        .collect();

    let mut changes = ChangeSet::default();

    for task_id in task_ids {
        let base = locate(task_id, original);
        let ours = locate(task_id, local);
        let theirs = locate(task_id, remote);

        match (base, ours, theirs) {
            (None, ours, theirs) => {
                changes.local.extend(ours.map(added));
                changes.remote.extend(theirs.map(added));
            }
            (Some(base), Some(ours), Some(theirs)) => {
                changes.local.extend(edited(base, ours));
                changes.remote.extend(edited(base, theirs));
            }
            (Some(base), ours, theirs) => {
                if ours.is_none() {
                    changes.local.push(deleted(base));
                }
                if theirs.is_none() {
                    changes.remote.push(deleted(base));
                }
            }
        }
    }

    log::debug!(
        "Diffed {} local and {} remote changes",
        changes.local.len(),
        changes.remote.len()
    );

    changes
}

fn added(location: TaskLocation<'_>) -> ChangeEvent {
    ChangeEvent::Added {
        task: location.task.clone(),
        to_column: location.column,
    }
}

fn deleted(base: TaskLocation<'_>) -> ChangeEvent {
    ChangeEvent::Deleted {
        task: base.task.clone(),
        from_column: base.column,
    }
}

/// A column change wins over a content change.
fn edited(base: TaskLocation<'_>, side: TaskLocation<'_>) -> Option<ChangeEvent> {
    if base.column != side.column {
        Some(ChangeEvent::Moved {
            task: side.task.clone(),
            from_column: base.column,
            to_column: side.column,
        })
    } else if !base.task.same_content(side.task) {
        Some(ChangeEvent::Modified {
            task: side.task.clone(),
            column: side.column,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{ColumnId, Task};
    use crate::reconcile::ChangeKind;
    use crate::test_utils::{board, task};

    #[test]
    fn test_identical_inputs_have_no_changes() {
        let original = board(&[(ColumnId::Todo, &[1, 2]), (ColumnId::Done, &[3])]);
        let changes = diff(&original, &original.clone(), &original.clone());
        assert!(changes.is_empty());
    }

    #[test]
    fn test_move_and_edit_on_one_task() {
        let original = board(&[(ColumnId::Todo, &[1])]);

        let mut local = original.clone();
        local.move_task(1, ColumnId::InProgress);
        local.task_mut(1).unwrap().description = "changed too".to_string();

        let mut remote = original.clone();
        remote.task_mut(1).unwrap().description = "remote edit".to_string();

        let changes = diff(&original, &local, &remote);

        // Move takes precedence over the content change on the same side
        assert_eq!(changes.local.len(), 1);
        assert_eq!(changes.local[0].kind(), ChangeKind::Moved);
        assert_eq!(changes.local[0].task().description, "changed too");

        assert_eq!(changes.remote.len(), 1);
        assert_eq!(changes.remote[0].kind(), ChangeKind::Modified);
        assert_eq!(changes.remote[0].to_column(), Some(ColumnId::Todo));
    }

    #[test]
    fn test_local_move_hidden_by_remote_delete() {
        let original = board(&[(ColumnId::Todo, &[1])]);

        let mut local = original.clone();
        local.move_task(1, ColumnId::Done);

        let mut remote = original.clone();
        remote.remove_task(1);

        let changes = diff(&original, &local, &remote);
        assert!(changes.local.is_empty());
        assert_eq!(
            changes.remote,
            vec![ChangeEvent::Deleted {
                task: task(1),
                from_column: ColumnId::Todo,
            }]
        );
    }

    #[test]
    fn test_deleted_event_carries_baseline_task() {
        let original = board(&[(ColumnId::Feedback, &[3])]);
        let mut local = original.clone();
        local.remove_task(3);

        let changes = diff(&original, &local, &original);
        assert_eq!(changes.local.len(), 1);
        assert_eq!(changes.local[0].task(), &task(3));
        assert_eq!(changes.local[0].from_column(), Some(ColumnId::Feedback));
        assert!(changes.remote.is_empty());
    }

    #[test]
    fn test_output_order_follows_first_seen_ids() {
        let original = board(&[(ColumnId::Todo, &[5, 2])]);
        let mut local = ColumnSet::empty();
        local.push_task(ColumnId::Done, Task::new(9, "new"));

        let changes = diff(&original, &local, &original);
        let ids: Vec<_> = changes.local.iter().map(ChangeEvent::task_id).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn test_timestamp_only_change_is_not_modified() {
        let original = board(&[(ColumnId::Retest, &[4])]);
        let mut local = original.clone();
        local.task_mut(4).unwrap().updated_at = chrono::Utc::now();

        let changes = diff(&original, &local, &original);
        assert!(changes.is_empty());
    }
}
