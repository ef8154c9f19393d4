//! Task list filtering by status and "assigned to me".

use serde::Serialize;

use crate::error::CoreError;
use crate::identity::UserIdentity;
use crate::task_status::TaskStatus;

/// Read access to the fields the filter looks at.
///
/// Implemented by the persisted task row so filtering stays independent of
/// the storage layer.
pub trait FilterableTask {
    fn status(&self) -> TaskStatus;
    fn assignee_email(&self) -> Option<&str>;
}

/// Filter selections coming from the task list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// `None` means every status.
    pub status: Option<TaskStatus>,
    pub assigned_only: bool,
}

impl TaskFilter {
    /// Build a filter from raw query values. An empty status means no filter.
    pub fn from_params(status: Option<&str>, assigned_only: bool) -> Result<Self, CoreError> {
        let status = match status.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<TaskStatus>()?),
        };
        Ok(Self {
            status,
            assigned_only,
        })
    }

    pub fn matches<T: FilterableTask>(&self, task: &T, user: &UserIdentity) -> bool {
        let status_match = self.status.is_none_or(|s| task.status() == s);
        let assigned_match =
            !self.assigned_only || task.assignee_email().is_some_and(|e| user.same_email(e));
        status_match && assigned_match
    }

    /// Keep the tasks that match, preserving their relative order.
    pub fn apply<'a, T: FilterableTask>(&self, tasks: &'a [T], user: &UserIdentity) -> Vec<&'a T> {
        tasks.iter().filter(|t| self.matches(*t, user)).collect()
    }
}

/// Counters shown next to the filter buttons, computed over the unfiltered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: u32,
    pub to_do: u32,
    pub in_progress: u32,
    pub done: u32,
    /// Tasks assigned to the requesting user.
    pub assigned: u32,
}

pub fn count_tasks<T: FilterableTask>(tasks: &[T], user: &UserIdentity) -> TaskCounts {
    tasks.iter().fold(TaskCounts::default(), |mut acc, task| {
        acc.total += 1;
        match task.status() {
            TaskStatus::ToDo => acc.to_do += 1,
            TaskStatus::InProgress => acc.in_progress += 1,
            TaskStatus::Done => acc.done += 1,
        }
        if task.assignee_email().is_some_and(|e| user.same_email(e)) {
            acc.assigned += 1;
        }
        acc
    })
}
