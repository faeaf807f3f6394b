//! First-run demonstration data.

use crate::error::CoreError;
use crate::task::{NewTask, Priority};
use crate::tracker::Tracker;

/// Default categories as `(name, color)`.
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Work", "#1976d2"),
    ("Personal", "#dc004e"),
    ("Study", "#388e3c"),
];

/// Category the welcome task is filed under.
const WELCOME_CATEGORY: &str = "Study";

const WELCOME_TITLE: &str = "Try out the task tracker";

const WELCOME_DESCRIPTION: &str = "Take a look around: add, edit and delete tasks, \
    toggle them complete, and break bigger ones into subtasks.";

/// Populate an empty tracker with the default categories and a welcome task.
pub fn seed_demo(tracker: &mut Tracker) -> Result<(), CoreError> {
    let mut welcome_category = None;
    for (name, color) in DEFAULT_CATEGORIES {
        let category = tracker.create_category(name, color)?;
        if *name == WELCOME_CATEGORY {
            welcome_category = Some(category.id);
        }
    }

    tracker.create_task(NewTask {
        description: WELCOME_DESCRIPTION.to_string(),
        category_id: welcome_category,
        priority: Some(Priority::Medium),
        ..NewTask::titled(WELCOME_TITLE)
    })?;

    tracing::info!(
        categories = DEFAULT_CATEGORIES.len(),
        tasks = 1,
        "Seeded demo data",
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_three_categories_and_one_task() {
        let mut tracker = Tracker::default();
        seed_demo(&mut tracker).unwrap();

        let names: Vec<_> = tracker.list_categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Work", "Personal", "Study"]);

        let tasks = tracker.list_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].priority, Priority::Medium);
        assert!(!tasks[0].completed);
        let category = tracker.category_of(&tasks[0]).unwrap();
        assert_eq!(category.name, "Study");
    }

    #[test]
    fn seeded_colors_are_mutually_distinct() {
        let mut tracker = Tracker::default();
        seed_demo(&mut tracker).unwrap();
        for category in tracker.list_categories() {
            let similar = tracker.similar_category_colors(&category.color, Some(&category.id));
            assert!(similar.is_empty(), "{} clashes with {similar:?}", category.name);
        }
    }
}
