//! Display ordering for tasks.
//!
//! Order: priority descending, then newest first, then title ascending.
//! The sort is stable and never mutates its input. Partitioned views (per
//! category, pending vs. completed) must filter the output of [`sort_tasks`]
//! rather than sorting each partition, so relative order agrees everywhere.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::task::Task;

/// Return a sorted copy of `tasks`.
pub fn sort_tasks(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(compare_tasks);
    sorted
}

/// Total order used by [`sort_tasks`].
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    b.priority
        .rank()
        .cmp(&a.priority.rank())
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| compare_titles(&a.title, &b.title))
}

/// Locale-style title order, compared level by level:
///
/// 1. base letters, ignoring case and accents (`"éclair" < "zebra"`)
/// 2. unaccented before accented (`"resume" < "résumé"`)
/// 3. lowercase before uppercase (`"apple" < "Apple"`)
///
/// A final byte-wise comparison keeps the order total.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented(a).cmp(accented(b)))
        .then_with(|| case_marks(a).cmp(case_marks(b)))
        .then_with(|| a.cmp(b))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

// `false` (lowercase) sorts before `true` (uppercase).
fn case_marks(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::task::Priority;
    use crate::types::Timestamp;

    fn base() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn task(title: &str, priority: Priority, created_at: Timestamp) -> Task {
        Task {
            id: format!("id-{title}"),
            title: title.to_string(),
            description: String::new(),
            category_id: None,
            priority,
            completed: false,
            created_at,
            updated_at: created_at,
            subtasks: Vec::new(),
        }
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn priority_beats_recency() {
        let t1 = task("T1", Priority::Urgent, base() - Duration::days(1));
        let t2 = task("T2", Priority::High, base());
        let sorted = sort_tasks(&[t1.clone(), t2.clone()]);
        assert_eq!(sorted, vec![t1.clone(), t2.clone()]);
        assert_eq!(sort_tasks(&[t2, t1]), sorted);
    }

    #[test]
    fn newest_first_within_priority() {
        let old = task("Old", Priority::Low, base() - Duration::hours(2));
        let new = task("New", Priority::Low, base());
        assert_eq!(titles(&sort_tasks(&[old, new])), ["New", "Old"]);
    }

    #[test]
    fn title_breaks_remaining_ties() {
        let now = base();
        let tasks = vec![
            task("banana", Priority::Medium, now),
            task("Apple", Priority::Medium, now),
            task("cherry", Priority::Medium, now),
            task("apple", Priority::Medium, now),
        ];
        assert_eq!(titles(&sort_tasks(&tasks)), ["apple", "Apple", "banana", "cherry"]);
    }

    #[test]
    fn accented_titles_sort_with_their_base_letter() {
        assert_eq!(compare_titles("éclair", "zebra"), Ordering::Less);
        assert_eq!(compare_titles("Éclair", "dough"), Ordering::Greater);
        assert_eq!(compare_titles("resume", "résumé"), Ordering::Less);
        assert_eq!(compare_titles("résumé", "resumes"), Ordering::Less);
    }

    #[test]
    fn lowercase_wins_case_only_ties() {
        assert_eq!(compare_titles("apple", "Apple"), Ordering::Less);
        assert_eq!(compare_titles("Apple", "apple"), Ordering::Greater);
        assert_eq!(compare_titles("same", "same"), Ordering::Equal);
    }

    #[test]
    fn full_ordering() {
        let now = base();
        let tasks = vec![
            task("low-new", Priority::Low, now),
            task("medium", Priority::Medium, now - Duration::days(3)),
            task("urgent-old", Priority::Urgent, now - Duration::days(5)),
            task("high", Priority::High, now),
            task("urgent-new", Priority::Urgent, now),
        ];
        assert_eq!(
            titles(&sort_tasks(&tasks)),
            ["urgent-new", "urgent-old", "high", "medium", "low-new"]
        );
    }

    #[test]
    fn sort_is_idempotent_and_pure() {
        let now = base();
        let tasks = vec![
            task("b", Priority::High, now),
            task("a", Priority::High, now),
            task("c", Priority::Low, now - Duration::minutes(1)),
        ];
        let snapshot = tasks.clone();
        let once = sort_tasks(&tasks);
        assert_eq!(sort_tasks(&once), once);
        assert_eq!(tasks, snapshot);
    }

    #[test]
    fn empty_input_sorts_to_empty() {
        assert!(sort_tasks(&[]).is_empty());
    }
}
