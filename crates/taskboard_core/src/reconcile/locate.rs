use crate::board::{ColumnId, ColumnSet, Task, TaskId};

/// Where a task currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskLocation<'a> {
    pub task: &'a Task,
    pub column: ColumnId,
}

/// Find a task by id, scanning columns in display order.
///
/// If the same id appears in two columns the first one wins.
pub fn locate(task_id: TaskId, columns: &ColumnSet) -> Option<TaskLocation<'_>> {
    columns.iter().find_map(|column| {
        column
            .items
            .iter()
            .find(|task| task.id == task_id)
            .map(|task| TaskLocation {
                task,
                column: column.id,
            })
    })
}
