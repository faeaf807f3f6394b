//! Category entities and the store that owns them.

use serde::{Deserialize, Serialize};

use crate::error::{require_text, CoreError};
use crate::types::{new_id, refreshed, Clock, EntityId, SharedClock, Timestamp};

/// A named, colored tag that tasks can be grouped under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    /// Hex color string, e.g. `"#1976d2"`. Not validated; see [`crate::color`].
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Partial update for a category. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Owns the category collection in insertion order.
pub struct CategoryStore {
    categories: Vec<Category>,
    clock: SharedClock,
    revision: u64,
}

impl CategoryStore {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            categories: Vec::new(),
            clock,
            revision: 0,
        }
    }

    /// Create a category. Fails if `name` is blank.
    pub fn create(&mut self, name: &str, color: &str) -> Result<Category, CoreError> {
        require_text("Category name", name)?;

        let now = self.clock.now();
        let category = Category {
            id: new_id(),
            name: name.to_string(),
            color: color.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.categories.push(category.clone());
        self.revision += 1;

        tracing::debug!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Apply a partial update. Unknown ids are ignored; a blank new name is
    /// rejected before anything changes.
    pub fn update(&mut self, id: &str, update: CategoryUpdate) -> Result<(), CoreError> {
        if let Some(name) = &update.name {
            require_text("Category name", name)?;
        }

        let now = self.clock.now();
        let Some(category) = self.categories.iter_mut().find(|c| c.id == id) else {
            tracing::trace!(category_id = %id, "Update for unknown category ignored");
            return Ok(());
        };

        if let Some(name) = update.name {
            category.name = name;
        }
        if let Some(color) = update.color {
            category.color = color;
        }
        category.updated_at = refreshed(category.updated_at, now);
        self.revision += 1;

        tracing::debug!(category_id = %id, "Category updated");
        Ok(())
    }

    /// Remove a category. Tasks that reference it are left alone.
    pub fn delete(&mut self, id: &str) {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        if self.categories.len() == before {
            tracing::trace!(category_id = %id, "Delete for unknown category ignored");
            return;
        }
        self.revision += 1;
        tracing::debug!(category_id = %id, "Category deleted");
    }

    pub fn list(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Colors of all categories except `exclude` (the one being edited, if any).
    pub fn colors_excluding(&self, exclude: Option<&str>) -> Vec<String> {
        self.categories
            .iter()
            .filter(|c| Some(c.id.as_str()) != exclude)
            .map(|c| c.color.clone())
            .collect()
    }

    /// Incremented on every applied mutation; unchanged by no-ops.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
