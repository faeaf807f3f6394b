//! Activity statistics: a 7-day window of created/completed counts with a
//! running balance, plus overall completion totals.
//!
//! Dates are UTC calendar dates. A completed task is attributed to the day
//! of its *current* `updated_at`, so editing a completed task later moves
//! it to the edit day. That approximation is intentional.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::task::Task;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of days in the rolling window, today included.
pub const WINDOW_DAYS: usize = 7;

/// Chart axis maxima are rounded up to a multiple of this.
pub const CHART_AXIS_STEP: u32 = 5;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One day of activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    pub date: NaiveDate,
    /// Short `M/D` label for chart axes.
    pub label: String,
    pub added: u32,
    pub completed: u32,
    /// `added - completed` for this day alone.
    pub balance: i64,
    /// Running completed total minus running added total, from the first
    /// day of the window through this one.
    pub cumulative_balance: i64,
}

/// Totals over every task, regardless of the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub pending_tasks: u32,
    /// Percentage in `0..=100`, rounded half up.
    pub completion_rate: u32,
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// The seven dates ending at `now`'s date, oldest first.
pub fn last_7_days(now: Timestamp) -> Vec<NaiveDate> {
    let today = now.date_naive();
    (0..WINDOW_DAYS)
        .rev()
        .map(|offset| today - Duration::days(offset as i64))
        .collect()
}

/// Format a date as `M/D` without zero padding, e.g. `3/7`.
pub fn display_label(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Per-day created/completed counts over the window ending at `now`.
///
/// Tasks created or completed outside the window are not counted.
pub fn daily_stats(tasks: &[Task], now: Timestamp) -> Vec<DailyStat> {
    let days = last_7_days(now);
    let mut buckets: HashMap<NaiveDate, (u32, u32)> =
        days.iter().map(|d| (*d, (0, 0))).collect();

    for task in tasks {
        if let Some((added, _)) = buckets.get_mut(&task.created_at.date_naive()) {
            *added += 1;
        }
        if task.completed {
            if let Some((_, completed)) = buckets.get_mut(&task.updated_at.date_naive()) {
                *completed += 1;
            }
        }
    }

    let mut running_added: i64 = 0;
    let mut running_completed: i64 = 0;
    days.into_iter()
        .map(|date| {
            let (added, completed) = buckets.get(&date).copied().unwrap_or_default();
            running_added += i64::from(added);
            running_completed += i64::from(completed);
            DailyStat {
                date,
                label: display_label(date),
                added,
                completed,
                balance: i64::from(added) - i64::from(completed),
                cumulative_balance: running_completed - running_added,
            }
        })
        .collect()
}

/// Total, completed, and pending counts with a rounded completion rate.
pub fn overall_stats(tasks: &[Task]) -> OverallStats {
    let total = tasks.len() as u32;
    let completed = tasks.iter().filter(|t| t.completed).count() as u32;
    OverallStats {
        total_tasks: total,
        completed_tasks: completed,
        pending_tasks: total - completed,
        completion_rate: percent_rounded(completed, total),
    }
}

/// `round(100 * part / whole)` with halves rounded up; `0` when `whole` is 0.
fn percent_rounded(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (u64::from(part), u64::from(whole));
    ((200 * part + whole) / (2 * whole)) as u32
}

/// Round a chart axis maximum up to the next multiple of
/// [`CHART_AXIS_STEP`]. Empty charts still get an axis of 5.
pub fn adjust_max_value(max: u32) -> u32 {
    if max == 0 {
        return CHART_AXIS_STEP;
    }
    max.div_ceil(CHART_AXIS_STEP) * CHART_AXIS_STEP
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
