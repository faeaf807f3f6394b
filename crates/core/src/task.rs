//! Task and subtask entities and the store that owns them.
//!
//! Subtasks live inside their parent task and have no lifecycle of their
//! own: every subtask mutation refreshes the parent's `updated_at`.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{require_text, CoreError};
use crate::types::{new_id, refreshed, Clock, EntityId, SharedClock, Timestamp};

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Task priority, highest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Fixed sort rank: `urgent=4 > high=3 > medium=2 > low=1`.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "urgent" => Ok(Priority::Urgent),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(CoreError::Validation(format!(
                "Invalid priority '{other}'. Must be one of: urgent, high, medium, low"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A checklist item owned by a task.
///
/// Incoming subtasks may omit `id` and `completed`; a fresh id is generated
/// and the item starts open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    #[serde(default = "new_id")]
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            completed: false,
        }
    }
}

/// A unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    /// Weak reference to a category. May dangle after the category is
    /// deleted; display logic treats that the same as `None`.
    pub category_id: Option<EntityId>,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub subtasks: Vec<Subtask>,
}

/// Fields accepted when creating a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category_id: Option<EntityId>,
    /// Defaults to [`Priority::Medium`]. An empty string counts as omitted.
    #[serde(deserialize_with = "blank_priority::deserialize")]
    pub priority: Option<Priority>,
    pub completed: bool,
    pub subtasks: Vec<Subtask>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Partial update for a task. `None` leaves the field untouched; for
/// `category_id`, `Some(None)` clears the category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(with = "double_option", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<EntityId>>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    pub subtasks: Option<Vec<Subtask>>,
}

/// Distinguishes an absent `categoryId` key from an explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Option<String>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            None => serializer.serialize_none(),
            Some(inner) => inner.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Option<String>>, D::Error> {
        Option::<String>::deserialize(deserializer).map(Some)
    }
}

/// Reads `null`, `""` or a missing key as no priority. Any other unknown
/// name is still an error.
mod blank_priority {
    use serde::de::{Deserialize, Deserializer, Error};

    use super::Priority;

    const VARIANTS: &[&str] = &["urgent", "high", "medium", "low"];

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Priority>, D::Error> {
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            None | Some("") => Ok(None),
            Some(name) => name
                .parse()
                .map(Some)
                .map_err(|_| D::Error::unknown_variant(name, VARIANTS)),
        }
    }
}

fn validate_subtasks(subtasks: &[Subtask]) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for subtask in subtasks {
        require_text("Subtask title", &subtask.title)?;
        if !seen.insert(subtask.id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate subtask id '{}'",
                subtask.id
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// TaskStore
// ---------------------------------------------------------------------------

/// Owns the task collection in insertion order.
pub struct TaskStore {
    tasks: Vec<Task>,
    clock: SharedClock,
    revision: u64,
}

impl TaskStore {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            tasks: Vec::new(),
            clock,
            revision: 0,
        }
    }

    /// Create a task. Fails if the title (or any supplied subtask title) is
    /// blank.
    pub fn create(&mut self, fields: NewTask) -> Result<Task, CoreError> {
        require_text("Task title", &fields.title)?;
        validate_subtasks(&fields.subtasks)?;

        let now = self.clock.now();
        let task = Task {
            id: new_id(),
            title: fields.title,
            description: fields.description,
            category_id: fields.category_id,
            priority: fields.priority.unwrap_or_default(),
            completed: fields.completed,
            created_at: now,
            updated_at: now,
            subtasks: fields.subtasks,
        };
        self.tasks.push(task.clone());
        self.revision += 1;

        tracing::debug!(
            task_id = %task.id,
            priority = %task.priority,
            category_id = ?task.category_id,
            "Task created",
        );
        Ok(task)
    }

    /// Merge the provided fields into a task. Unknown ids are ignored.
    pub fn update(&mut self, id: &str, update: TaskUpdate) -> Result<(), CoreError> {
        if let Some(title) = &update.title {
            require_text("Task title", title)?;
        }
        if let Some(subtasks) = &update.subtasks {
            validate_subtasks(subtasks)?;
        }

        let updated = self.modify(id, |task| {
            if let Some(title) = update.title {
                task.title = title;
            }
            if let Some(description) = update.description {
                task.description = description;
            }
            if let Some(category_id) = update.category_id {
                task.category_id = category_id;
            }
            if let Some(priority) = update.priority {
                task.priority = priority;
            }
            if let Some(completed) = update.completed {
                task.completed = completed;
            }
            if let Some(subtasks) = update.subtasks {
                task.subtasks = subtasks;
            }
            true
        });
        if updated {
            tracing::debug!(task_id = %id, "Task updated");
        }
        Ok(())
    }

    /// Remove a task together with its subtasks.
    pub fn delete(&mut self, id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            tracing::trace!(task_id = %id, "Delete for unknown task ignored");
            return;
        }
        self.revision += 1;
        tracing::debug!(task_id = %id, "Task deleted");
    }

    pub fn toggle_complete(&mut self, id: &str) {
        let toggled = self.modify(id, |task| {
            task.completed = !task.completed;
            true
        });
        if toggled {
            tracing::debug!(task_id = %id, "Task completion toggled");
        }
    }

    /// Append a pending subtask to a task. Fails only on a blank title.
    pub fn add_subtask(&mut self, task_id: &str, title: &str) -> Result<(), CoreError> {
        require_text("Subtask title", title)?;

        let added = self.modify(task_id, |task| {
            task.subtasks.push(Subtask::new(title));
            true
        });
        if added {
            tracing::debug!(task_id = %task_id, "Subtask added");
        }
        Ok(())
    }

    pub fn delete_subtask(&mut self, task_id: &str, subtask_id: &str) {
        let removed = self.modify(task_id, |task| {
            let before = task.subtasks.len();
            task.subtasks.retain(|s| s.id != subtask_id);
            task.subtasks.len() != before
        });
        if removed {
            tracing::debug!(task_id = %task_id, subtask_id = %subtask_id, "Subtask deleted");
        }
    }

    pub fn toggle_subtask_complete(&mut self, task_id: &str, subtask_id: &str) {
        let toggled = self.modify(task_id, |task| {
            match task.subtasks.iter_mut().find(|s| s.id == subtask_id) {
                Some(subtask) => {
                    subtask.completed = !subtask.completed;
                    true
                }
                None => false,
            }
        });
        if toggled {
            tracing::debug!(task_id = %task_id, subtask_id = %subtask_id, "Subtask completion toggled");
        }
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Ids of tasks whose `category_id` is exactly `category_id`.
    pub fn ids_in_category(&self, category_id: &str) -> Vec<EntityId> {
        self.tasks
            .iter()
            .filter(|t| t.category_id.as_deref() == Some(category_id))
            .map(|t| t.id.clone())
            .collect()
    }

    /// Incremented on every applied mutation; unchanged by no-ops.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Run `change` against the task with `id`. When it reports a change,
    /// refresh `updated_at` and bump the revision. Returns whether anything
    /// changed; an unknown id is a silent miss.
    fn modify(&mut self, id: &str, change: impl FnOnce(&mut Task) -> bool) -> bool {
        let now = self.clock.now();
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            tracing::trace!(task_id = %id, "Mutation for unknown task ignored");
            return false;
        };
        if !change(task) {
            tracing::trace!(task_id = %id, "Mutation for unknown subtask ignored");
            return false;
        }
        task.updated_at = refreshed(task.updated_at, now);
        self.revision += 1;
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
