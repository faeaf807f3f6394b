//! The state container that owns both stores and exposes the
//! command/query interface consumed by the presentation layer.
//!
//! The two stores never talk to each other. Anything spanning both (the
//! cascading category delete, color warnings, resolving a task's category)
//! is orchestrated here as explicit sequential calls.

use std::sync::Arc;

use serde::Serialize;

use crate::board::{build_board, BoardColumn};
use crate::category::{Category, CategoryStore, CategoryUpdate};
use crate::color::{find_similar, DEFAULT_SIMILARITY_THRESHOLD};
use crate::command::{Command, CommandOutcome};
use crate::error::CoreError;
use crate::ordering::sort_tasks;
use crate::stats::{daily_stats, overall_stats, DailyStat, OverallStats};
use crate::task::{NewTask, Task, TaskStore, TaskUpdate};
use crate::types::{Clock, SharedClock, SystemClock, Timestamp};

/// Everything a consumer needs to render the current state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub generated_at: Timestamp,
    pub revision: u64,
    pub categories: Vec<Category>,
    /// All tasks in display order.
    pub tasks: Vec<Task>,
    pub board: Vec<BoardColumn>,
    pub daily_stats: Vec<DailyStat>,
    pub overall: OverallStats,
}

pub struct Tracker {
    categories: CategoryStore,
    tasks: TaskStore,
    clock: SharedClock,
    similarity_threshold: f64,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl Tracker {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            categories: CategoryStore::new(clock.clone()),
            tasks: TaskStore::new(clock.clone()),
            clock,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    /// Override the distance used for color warnings.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }

    // -- Commands -----------------------------------------------------------

    pub fn create_category(&mut self, name: &str, color: &str) -> Result<Category, CoreError> {
        self.categories.create(name, color)
    }

    pub fn update_category(&mut self, id: &str, update: CategoryUpdate) -> Result<(), CoreError> {
        self.categories.update(id, update)
    }

    /// Delete the category only. Tasks filed under it keep their (now
    /// dangling) `category_id` and show up as uncategorized.
    pub fn delete_category(&mut self, id: &str) {
        self.categories.delete(id);
    }

    /// Delete every task filed under the category, then the category.
    /// Returns how many tasks were removed.
    pub fn delete_category_cascade(&mut self, id: &str) -> usize {
        let dependents = self.tasks.ids_in_category(id);
        for task_id in &dependents {
            self.tasks.delete(task_id);
        }
        self.categories.delete(id);
        tracing::info!(category_id = %id, removed_tasks = dependents.len(), "Category deleted with its tasks");
        dependents.len()
    }

    pub fn create_task(&mut self, fields: NewTask) -> Result<Task, CoreError> {
        self.tasks.create(fields)
    }

    pub fn update_task(&mut self, id: &str, update: TaskUpdate) -> Result<(), CoreError> {
        self.tasks.update(id, update)
    }

    pub fn delete_task(&mut self, id: &str) {
        self.tasks.delete(id);
    }

    pub fn toggle_task_complete(&mut self, id: &str) {
        self.tasks.toggle_complete(id);
    }

    pub fn add_subtask(&mut self, task_id: &str, title: &str) -> Result<(), CoreError> {
        self.tasks.add_subtask(task_id, title)
    }

    pub fn delete_subtask(&mut self, task_id: &str, subtask_id: &str) {
        self.tasks.delete_subtask(task_id, subtask_id);
    }

    pub fn toggle_subtask_complete(&mut self, task_id: &str, subtask_id: &str) {
        self.tasks.toggle_subtask_complete(task_id, subtask_id);
    }

    /// Apply a protocol message. Rejected commands leave state untouched.
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome, CoreError> {
        let kind = command.name();
        let result = match command {
            Command::CreateCategory { name, color } => self
                .create_category(&name, &color)
                .map(CommandOutcome::Category),
            Command::UpdateCategory { id, update } => self
                .update_category(&id, update)
                .map(|()| CommandOutcome::Unit),
            Command::DeleteCategory { id } => {
                self.delete_category(&id);
                Ok(CommandOutcome::Unit)
            }
            Command::DeleteCategoryCascade { id } => {
                self.delete_category_cascade(&id);
                Ok(CommandOutcome::Unit)
            }
            Command::CreateTask(fields) => self.create_task(fields).map(CommandOutcome::Task),
            Command::UpdateTask { id, update } => {
                self.update_task(&id, update).map(|()| CommandOutcome::Unit)
            }
            Command::DeleteTask { id } => {
                self.delete_task(&id);
                Ok(CommandOutcome::Unit)
            }
            Command::ToggleTaskComplete { id } => {
                self.toggle_task_complete(&id);
                Ok(CommandOutcome::Unit)
            }
            Command::AddSubtask { task_id, title } => self
                .add_subtask(&task_id, &title)
                .map(|()| CommandOutcome::Unit),
            Command::DeleteSubtask { task_id, subtask_id } => {
                self.delete_subtask(&task_id, &subtask_id);
                Ok(CommandOutcome::Unit)
            }
            Command::ToggleSubtaskComplete { task_id, subtask_id } => {
                self.toggle_subtask_complete(&task_id, &subtask_id);
                Ok(CommandOutcome::Unit)
            }
        };

        if let Err(e) = &result {
            tracing::warn!(command = kind, error = %e, "Command rejected");
        }
        result
    }

    // -- Queries ------------------------------------------------------------

    pub fn list_categories(&self) -> &[Category] {
        self.categories.list()
    }

    pub fn list_tasks(&self) -> &[Task] {
        self.tasks.list()
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// The category a task is filed under, or `None` when it has none or
    /// the referenced category no longer exists.
    pub fn category_of(&self, task: &Task) -> Option<&Category> {
        task.category_id.as_deref().and_then(|id| self.categories.get(id))
    }

    pub fn sorted_tasks(&self) -> Vec<Task> {
        sort_tasks(self.tasks.list())
    }

    pub fn board(&self) -> Vec<BoardColumn> {
        build_board(self.categories.list(), self.tasks.list())
    }

    pub fn daily_stats(&self, now: Timestamp) -> Vec<DailyStat> {
        daily_stats(self.tasks.list(), now)
    }

    pub fn overall_stats(&self) -> OverallStats {
        overall_stats(self.tasks.list())
    }

    /// Existing category colors close to `candidate`. Pass the id of the
    /// category being edited as `exclude` so it is not compared with itself.
    pub fn similar_category_colors(&self, candidate: &str, exclude: Option<&str>) -> Vec<String> {
        let existing = self.categories.colors_excluding(exclude);
        find_similar(candidate, &existing, self.similarity_threshold)
    }

    /// Changes whenever either store applies a mutation. Suitable as a
    /// cache key for derived views.
    pub fn revision(&self) -> u64 {
        self.categories.revision() + self.tasks.revision()
    }

    /// Build a full snapshot at the tracker clock's current time.
    pub fn snapshot(&self) -> Snapshot {
        let now = self.clock.now();
        Snapshot {
            generated_at: now,
            revision: self.revision(),
            categories: self.categories.list().to_vec(),
            tasks: self.sorted_tasks(),
            board: self.board(),
            daily_stats: self.daily_stats(now),
            overall: self.overall_stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::task::Priority;
    use crate::types::ManualClock;

    fn tracker() -> (Tracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap(),
        ));
        (Tracker::new(clock.clone()), clock)
    }

    #[test]
    fn plain_delete_leaves_tasks_orphaned() {
        let (mut tracker, _) = tracker();
        let work = tracker.create_category("Work", "#1976d2").unwrap();
        let task = tracker
            .create_task(NewTask { category_id: Some(work.id.clone()), ..NewTask::titled("Report") })
            .unwrap();

        tracker.delete_category(&work.id);

        let orphan = tracker.task(&task.id).unwrap();
        assert_eq!(orphan.category_id.as_deref(), Some(work.id.as_str()));
        assert!(tracker.category_of(orphan).is_none());
        let board = tracker.board();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].pending.len(), 1);
    }

    #[test]
    fn cascade_removes_only_dependent_tasks() {
        let (mut tracker, _) = tracker();
        let work = tracker.create_category("Work", "#1976d2").unwrap();
        let home = tracker.create_category("Home", "#dc004e").unwrap();
        for title in ["A", "B"] {
            tracker
                .create_task(NewTask { category_id: Some(work.id.clone()), ..NewTask::titled(title) })
                .unwrap();
        }
        let kept = tracker
            .create_task(NewTask { category_id: Some(home.id.clone()), ..NewTask::titled("C") })
            .unwrap();

        assert_eq!(tracker.delete_category_cascade(&work.id), 2);
        assert_eq!(tracker.list_tasks(), &[kept]);
        assert_eq!(tracker.list_categories(), &[home]);
    }

    #[test]
    fn similar_colors_exclude_the_edited_category() {
        let (mut tracker, _) = tracker();
        let red = tracker.create_category("Red", "#ff0000").unwrap();
        tracker.create_category("Green", "#00ff00").unwrap();

        assert_eq!(tracker.similar_category_colors("#fe0101", None), vec!["#ff0000".to_string()]);
        assert!(tracker.similar_category_colors("#fe0101", Some(&red.id)).is_empty());
    }

    #[test]
    fn similarity_threshold_is_configurable() {
        let (tracker, _) = tracker();
        let mut tracker = tracker.with_similarity_threshold(0.0);
        tracker.create_category("Red", "#ff0000").unwrap();
        assert!(tracker.similar_category_colors("#fe0101", None).is_empty());
        assert_eq!(tracker.similar_category_colors("#ff0000", None).len(), 1);
    }

    #[test]
    fn apply_reports_created_entities() {
        let (mut tracker, _) = tracker();
        let outcome = tracker
            .apply(Command::CreateCategory { name: "Work".into(), color: "#1976d2".into() })
            .unwrap();
        assert_matches!(outcome, CommandOutcome::Category(c) if c.name == "Work");

        let outcome = tracker
            .apply(Command::CreateTask(NewTask {
                priority: Some(Priority::Low),
                ..NewTask::titled("Read")
            }))
            .unwrap();
        assert_matches!(outcome, CommandOutcome::Task(t) if t.priority == Priority::Low);
    }

    #[test]
    fn apply_rejects_blank_input_without_mutating() {
        let (mut tracker, _) = tracker();
        let revision = tracker.revision();
        let result = tracker.apply(Command::CreateCategory { name: " ".into(), color: "#000000".into() });
        assert_matches!(result, Err(CoreError::Validation(_)));
        assert_eq!(tracker.revision(), revision);
        assert!(tracker.list_categories().is_empty());
    }

    #[test]
    fn revision_moves_only_on_effective_mutations() {
        let (mut tracker, _) = tracker();
        let task = tracker.create_task(NewTask::titled("One")).unwrap();
        let after_create = tracker.revision();

        tracker.toggle_task_complete("missing");
        assert_eq!(tracker.revision(), after_create);

        tracker.toggle_task_complete(&task.id);
        assert!(tracker.revision() > after_create);
    }

    #[test]
    fn snapshot_uses_clock_time() {
        let (mut tracker, clock) = tracker();
        tracker.create_task(NewTask::titled("One")).unwrap();
        clock.advance(Duration::days(1));

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.generated_at, clock.now());
        assert_eq!(snapshot.daily_stats.last().unwrap().date, clock.now().date_naive());
        assert_eq!(snapshot.daily_stats[5].added, 1);
        assert_eq!(snapshot.overall.total_tasks, 1);
        assert_eq!(snapshot.board.len(), 1);
    }
}
