//! Command protocol for the tracker.
//!
//! Serialized as JSON with an internally-tagged `"type"` discriminator so a
//! presentation layer (or a script) can drive the stores with plain
//! messages, e.g. `{"type":"task.toggle","id":"..."}`.

use serde::{Deserialize, Serialize};

use crate::category::{Category, CategoryUpdate};
use crate::task::{NewTask, Task, TaskUpdate};
use crate::types::EntityId;

/// A mutation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Command {
    #[serde(rename = "category.create")]
    CreateCategory { name: String, color: String },

    #[serde(rename = "category.update")]
    UpdateCategory { id: EntityId, update: CategoryUpdate },

    /// Removes the category only; its tasks keep a dangling reference.
    #[serde(rename = "category.delete")]
    DeleteCategory { id: EntityId },

    /// Deletes every task filed under the category, then the category.
    #[serde(rename = "category.delete_cascade")]
    DeleteCategoryCascade { id: EntityId },

    #[serde(rename = "task.create")]
    CreateTask(NewTask),

    #[serde(rename = "task.update")]
    UpdateTask { id: EntityId, update: TaskUpdate },

    #[serde(rename = "task.delete")]
    DeleteTask { id: EntityId },

    #[serde(rename = "task.toggle")]
    ToggleTaskComplete { id: EntityId },

    #[serde(rename = "subtask.add", rename_all = "camelCase")]
    AddSubtask { task_id: EntityId, title: String },

    #[serde(rename = "subtask.delete", rename_all = "camelCase")]
    DeleteSubtask { task_id: EntityId, subtask_id: EntityId },

    #[serde(rename = "subtask.toggle", rename_all = "camelCase")]
    ToggleSubtaskComplete { task_id: EntityId, subtask_id: EntityId },
}

impl Command {
    /// The wire name of this command, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateCategory { .. } => "category.create",
            Command::UpdateCategory { .. } => "category.update",
            Command::DeleteCategory { .. } => "category.delete",
            Command::DeleteCategoryCascade { .. } => "category.delete_cascade",
            Command::CreateTask(_) => "task.create",
            Command::UpdateTask { .. } => "task.update",
            Command::DeleteTask { .. } => "task.delete",
            Command::ToggleTaskComplete { .. } => "task.toggle",
            Command::AddSubtask { .. } => "subtask.add",
            Command::DeleteSubtask { .. } => "subtask.delete",
            Command::ToggleSubtaskComplete { .. } => "subtask.toggle",
        }
    }
}

/// What a successfully applied command produced.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", content = "entity", rename_all = "snake_case")]
pub enum CommandOutcome {
    Unit,
    Category(Category),
    Task(Task),
}
