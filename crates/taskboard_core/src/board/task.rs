//! Task records and the equality rule used by conflict detection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Identifier of a task, unique within a board.
pub type TaskId = u64;

/// Classification of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TaskType {
    #[serde(rename = "Change Request")]
    ChangeRequest,
    Issue,
    Feature,
}

/// Devices a task applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum DeviceType {
    #[default]
    All,
    Desktop,
    Mobile,
}

/// Role responsible for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum OwnerType {
    #[serde(rename = "PM")]
    Pm,
    #[serde(rename = "CWS Dev")]
    CwsDev,
    Customer,
}

/// Role of whoever wrote a feedback entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackAuthor {
    Customer,
    Pm,
    CwsDev,
}

/// One entry in a task's feedback thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    pub text: String,
    pub author: FeedbackAuthor,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
}

/// A card on the board.
///
/// A task is owned by exactly one column at a time; moving it means removing
/// it from one column and pushing it onto another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,
    #[serde(default)]
    pub device: DeviceType,
    #[serde(default)]
    pub feedback: Vec<FeedbackItem>,
    #[serde(default)]
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl Task {
    /// Create a task stamped with the current time.
    pub fn new(id: TaskId, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            description: description.into(),
            task_type: None,
            device: DeviceType::default(),
            feedback: Vec::new(),
            section: String::new(),
            owner: None,
            created_at: now,
            updated_at: now,
            locked: None,
            images: Vec::new(),
        }
    }

    /// Whether two tasks carry the same content.
    ///
    /// The identifier and the `created_at`/`updated_at` stamps are ignored.
    /// Feedback and image lists compare as ordered sequences.
    pub fn same_content(&self, other: &Task) -> bool {
        self.description == other.description
            && self.task_type == other.task_type
            && self.device == other.device
            && self.feedback == other.feedback
            && self.section == other.section
            && self.owner == other.owner
            && self.locked == other.locked
            && self.images == other.images
    }

    /// Whether the task is locked against edits.
    pub fn is_locked(&self) -> bool {
        self.locked.unwrap_or(false)
    }
}

/// Equality oracle used by the differ. See [`Task::same_content`].
pub fn tasks_are_equal(a: &Task, b: &Task) -> bool {
    a.same_content(b)
}
