//! Per-project task statistics: counts by status and their percentages.
//!
//! Counts depend only on the multiset of statuses, so any ordering of the
//! same task list yields the same result.

use serde::Serialize;

use crate::task_status::TaskStatus;

/// Number of tasks in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub to_do: u32,
    pub in_progress: u32,
    pub done: u32,
}

impl TaskStats {
    pub fn total(&self) -> u32 {
        self.to_do + self.in_progress + self.done
    }

    pub fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::ToDo => self.to_do += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::Done => self.done += 1,
        }
    }
}

/// Share of tasks in each status, in percent (0-100).
///
/// All zero when the project has no tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TaskPercentages {
    /// Share of Done tasks, i.e. overall progress.
    pub done: f64,
    pub in_progress: f64,
    pub to_do: f64,
}

/// Counts plus percentages for one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProjectAggregate {
    pub total_tasks: u32,
    pub task_stats: TaskStats,
    pub percentages: TaskPercentages,
}

/// Aggregate a collection of task statuses.
pub fn aggregate<I>(statuses: I) -> ProjectAggregate
where
    I: IntoIterator<Item = TaskStatus>,
{
    let mut stats = TaskStats::default();
    for status in statuses {
        stats.record(status);
    }
    from_stats(stats)
}

/// Derive percentages from precomputed counts.
pub fn from_stats(stats: TaskStats) -> ProjectAggregate {
    let total = stats.total();
    let percent = |count: u32| {
        if total == 0 {
            0.0
        } else {
            f64::from(count) * 100.0 / f64::from(total)
        }
    };

    ProjectAggregate {
        total_tasks: total,
        task_stats: stats,
        percentages: TaskPercentages {
            done: percent(stats.done),
            in_progress: percent(stats.in_progress),
            to_do: percent(stats.to_do),
        },
    }
}
