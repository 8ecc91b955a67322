//! Board columns and the normalized column set.
//!
//! A board always shows the same six columns in the same order. Stored data is
//! allowed to drift from that (older boards miss newer columns, hand-edited
//! files may carry unknown ones), so every [`ColumnSet`] is built through
//! [`ColumnSet::from_columns`], which fills the gaps and drops the rest.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::task::{Task, TaskId};

/// Identifier of one of the fixed board columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum ColumnId {
    Todo,
    InProgress,
    Retest,
    Feedback,
    Done,
    Cancelled,
}

impl ColumnId {
    /// All columns in display order.
    pub const ALL: [ColumnId; 6] = [
        ColumnId::Todo,
        ColumnId::InProgress,
        ColumnId::Retest,
        ColumnId::Feedback,
        ColumnId::Done,
        ColumnId::Cancelled,
    ];

    /// Wire name used in stored snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnId::Todo => "todo",
            ColumnId::InProgress => "inprogress",
            ColumnId::Retest => "retest",
            ColumnId::Feedback => "feedback",
            ColumnId::Done => "done",
            ColumnId::Cancelled => "cancelled",
        }
    }

    /// Display title of the column.
    pub fn title(&self) -> &'static str {
        match self {
            ColumnId::Todo => "To Do",
            ColumnId::InProgress => "In Progress",
            ColumnId::Retest => "Re-Test",
            ColumnId::Feedback => "Feedback Needed",
            ColumnId::Done => "Done",
            ColumnId::Cancelled => "Cancelled",
        }
    }

    fn index(&self) -> usize {
        match self {
            ColumnId::Todo => 0,
            ColumnId::InProgress => 1,
            ColumnId::Retest => 2,
            ColumnId::Feedback => 3,
            ColumnId::Done => 4,
            ColumnId::Cancelled => 5,
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or(())
    }
}

/// A column and the tasks it holds, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub items: Vec<Task>,
}

impl Column {
    /// An empty column with its canonical title.
    pub fn empty(id: ColumnId) -> Self {
        Self {
            id,
            title: id.title().to_string(),
            items: Vec::new(),
        }
    }
}

/// Column as found in storage, before normalization.
///
/// The id is kept as a string and the items as raw JSON so unknown columns can
/// be dropped without their contents failing the whole snapshot. A null or
/// missing `items` reads as an empty column.
#[derive(Debug, Deserialize)]
pub struct StoredColumn {
    id: String,
    #[serde(default)]
    items: Option<Vec<serde_json::Value>>,
}

/// The full, normalized set of board columns.
///
/// Always holds every [`ColumnId`] exactly once, in [`ColumnId::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StoredColumn>", into = "Vec<Column>")]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl ColumnSet {
    /// Six empty columns.
    pub fn empty() -> Self {
        Self {
            columns: ColumnId::ALL.into_iter().map(Column::empty).collect(),
        }
    }

    /// Build a column set from arbitrary columns.
    ///
    /// Missing columns come out empty; a column id seen twice keeps its first
    /// occurrence; titles are reset to the canonical title.
    pub fn from_columns(columns: impl IntoIterator<Item = Column>) -> Self {
        let mut set = Self::empty();
        let mut seen = [false; 6];
        for column in columns {
            let index = column.id.index();
            if seen[index] {
                log::warn!("Duplicate column '{}' ignored", column.id);
                continue;
            }
            seen[index] = true;
            set.columns[index].items = column.items;
        }
        set
    }

    /// Build a column set from `(column, tasks)` pairs.
    pub fn with_tasks(columns: impl IntoIterator<Item = (ColumnId, Vec<Task>)>) -> Self {
        Self::from_columns(columns.into_iter().map(|(id, items)| Column {
            id,
            title: id.title().to_string(),
            items,
        }))
    }

    /// The column with the given id.
    pub fn get(&self, id: ColumnId) -> &Column {
        &self.columns[id.index()]
    }

    /// Mutable access to the column with the given id.
    pub fn get_mut(&mut self, id: ColumnId) -> &mut Column {
        &mut self.columns[id.index()]
    }

    /// Columns in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Every task id on the board, column by column.
    pub fn task_ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.columns
            .iter()
            .flat_map(|column| column.items.iter().map(|task| task.id))
    }

    /// Total number of tasks across all columns.
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|column| column.items.len()).sum()
    }

    /// Append a task to the end of a column.
    pub fn push_task(&mut self, column: ColumnId, task: Task) {
        self.get_mut(column).items.push(task);
    }

    /// Remove a task from whichever column holds it.
    pub fn remove_task(&mut self, task_id: TaskId) -> Option<(ColumnId, Task)> {
        for column in &mut self.columns {
            if let Some(pos) = column.items.iter().position(|task| task.id == task_id) {
                return Some((column.id, column.items.remove(pos)));
            }
        }
        None
    }

    /// Move a task to the end of another column. Returns the column it left.
    pub fn move_task(&mut self, task_id: TaskId, to: ColumnId) -> Option<ColumnId> {
        let (from, task) = self.remove_task(task_id)?;
        self.push_task(to, task);
        Some(from)
    }

    /// Mutable access to a task wherever it sits.
    pub fn task_mut(&mut self, task_id: TaskId) -> Option<&mut Task> {
        self.columns
            .iter_mut()
            .flat_map(|column| column.items.iter_mut())
            .find(|task| task.id == task_id)
    }
}

impl TryFrom<Vec<StoredColumn>> for ColumnSet {
    type Error = serde_json::Error;

    /// Tasks are parsed only for the first occurrence of each known column.
    fn try_from(stored: Vec<StoredColumn>) -> Result<Self, Self::Error> {
        let mut seen = [false; 6];
        let mut columns = Vec::new();
        for column in stored {
            let Ok(id) = column.id.parse::<ColumnId>() else {
                log::debug!("Dropping unknown column '{}'", column.id);
                continue;
            };
            if std::mem::replace(&mut seen[id.index()], true) {
                log::warn!("Duplicate column '{}' ignored", id);
                continue;
            }
            let items = column
                .items
                .unwrap_or_default()
                .into_iter()
                .map(serde_json::from_value::<Task>)
                .collect::<Result<Vec<_>, _>>()?;
            columns.push(Column {
                id,
                title: id.title().to_string(),
                items,
            });
        }
        Ok(ColumnSet::from_columns(columns))
    }
}

impl From<ColumnSet> for Vec<Column> {
    fn from(set: ColumnSet) -> Self {
        set.columns
    }
}

impl<'a> IntoIterator for &'a ColumnSet {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
