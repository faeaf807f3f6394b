//! Category-partitioned task board.
//!
//! Tasks are sorted once and then distributed into columns by filtering,
//! so every column (and its pending/completed halves) keeps the same
//! relative order as the full sorted list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::ordering::sort_tasks;
use crate::task::Task;
use crate::types::EntityId;

/// One column of the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    /// `None` for the uncategorized column.
    pub category_id: Option<EntityId>,
    pub name: String,
    pub color: Option<String>,
    pub pending: Vec<Task>,
    pub completed: Vec<Task>,
}

/// Name shown for tasks without a (resolvable) category.
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// One column per category in category order, followed by an uncategorized
/// column. A task whose `category_id` names no existing category lands in
/// the uncategorized column.
pub fn build_board(categories: &[Category], tasks: &[Task]) -> Vec<BoardColumn> {
    let sorted = sort_tasks(tasks);
    let known: HashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();

    let mut columns: Vec<BoardColumn> = categories
        .iter()
        .map(|category| {
            column(
                Some(category.id.clone()),
                category.name.clone(),
                Some(category.color.clone()),
                sorted
                    .iter()
                    .filter(|t| t.category_id.as_deref() == Some(category.id.as_str())),
            )
        })
        .collect();

    columns.push(column(
        None,
        UNCATEGORIZED_NAME.to_string(),
        None,
        sorted.iter().filter(|t| match t.category_id.as_deref() {
            Some(id) => !known.contains(id),
            None => true,
        }),
    ));

    columns
}

fn column<'a>(
    category_id: Option<EntityId>,
    name: String,
    color: Option<String>,
    tasks: impl Iterator<Item = &'a Task>,
) -> BoardColumn {
    let (completed, pending): (Vec<Task>, Vec<Task>) =
        tasks.cloned().partition(|t| t.completed);
    BoardColumn {
        category_id,
        name,
        color,
        pending,
        completed,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::task::Priority;
    use crate::types::Timestamp;

    fn at() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 20, 10, 0, 0).unwrap()
    }

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.into(),
            name: name.into(),
            color: "#1976d2".into(),
            created_at: at(),
            updated_at: at(),
        }
    }

    fn task(title: &str, category_id: Option<&str>, priority: Priority, completed: bool) -> Task {
        Task {
            id: format!("t-{title}"),
            title: title.into(),
            description: String::new(),
            category_id: category_id.map(str::to_string),
            priority,
            completed,
            created_at: at(),
            updated_at: at(),
            subtasks: Vec::new(),
        }
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn one_column_per_category_plus_uncategorized() {
        let categories = vec![category("w", "Work"), category("h", "Home")];
        let board = build_board(&categories, &[]);
        let names: Vec<_> = board.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Work", "Home", UNCATEGORIZED_NAME]);
        assert_eq!(board[2].category_id, None);
    }

    #[test]
    fn dangling_category_falls_into_uncategorized() {
        let categories = vec![category("w", "Work")];
        let tasks = vec![
            task("orphan", Some("deleted"), Priority::Low, false),
            task("loose", None, Priority::High, false),
            task("filed", Some("w"), Priority::Low, false),
        ];
        let board = build_board(&categories, &tasks);
        assert_eq!(titles(&board[0].pending), ["filed"]);
        assert_eq!(titles(&board[1].pending), ["loose", "orphan"]);
    }

    #[test]
    fn columns_split_by_completion_in_sorted_order() {
        let categories = vec![category("w", "Work")];
        let mut older = task("older", Some("w"), Priority::High, true);
        older.created_at -= Duration::days(1);
        let tasks = vec![
            task("low", Some("w"), Priority::Low, false),
            older,
            task("urgent", Some("w"), Priority::Urgent, false),
            task("newer", Some("w"), Priority::High, true),
        ];
        let board = build_board(&categories, &tasks);
        assert_eq!(titles(&board[0].pending), ["urgent", "low"]);
        assert_eq!(titles(&board[0].completed), ["newer", "older"]);
    }
}
