//! Task status values and the status lifecycle state machine.
//!
//! ```text
//! To Do <──> In Progress
//!   │            │
//!   └──(solution)┴──> Done   (terminal)
//! ```
//!
//! The discriminants match the seed order of the `task_statuses` table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::StatusId;

#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    ToDo = 1,
    #[serde(rename = "In Progress")]
    InProgress = 2,
    #[serde(rename = "Done")]
    Done = 3,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done];

    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Display label, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == TaskStatus::Done
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TaskStatus> for StatusId {
    fn from(value: TaskStatus) -> Self {
        value as StatusId
    }
}

impl TryFrom<StatusId> for TaskStatus {
    type Error = CoreError;

    fn try_from(id: StatusId) -> Result<Self, Self::Error> {
        TaskStatus::ALL
            .into_iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| CoreError::Internal(format!("Unknown task status id {id}")))
    }
}

impl FromStr for TaskStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid status '{s}'. Must be one of: To Do, In Progress, Done"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// A validated status change, ready to be written in a single update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub from: TaskStatus,
    pub to: TaskStatus,
    /// Trimmed solution text. Always `Some` when `to` is `Done`, `None` otherwise.
    pub solution: Option<String>,
}

/// Check whether a task may move from `from` to `to`.
///
/// - Done is terminal: nothing leaves it.
/// - Entering Done requires a non-blank solution.
/// - A solution is only accepted together with a move to Done.
/// - Re-selecting the current To Do / In Progress state is a no-op success.
pub fn plan_transition(
    from: TaskStatus,
    to: TaskStatus,
    solution: Option<&str>,
) -> Result<StatusChange, CoreError> {
    if from.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "Task is already {from} and cannot be changed"
        )));
    }

    let solution = solution.map(str::trim).filter(|s| !s.is_empty());

    match (to, solution) {
        (TaskStatus::Done, None) => Err(CoreError::Validation(
            "A solution description is required to close a task".into(),
        )),
        (TaskStatus::Done, Some(text)) => Ok(StatusChange {
            from,
            to,
            solution: Some(text.to_string()),
        }),
        (_, Some(_)) => Err(CoreError::Validation(format!(
            "A solution description can only be set when moving to {}",
            TaskStatus::Done
        ))),
        (_, None) => Ok(StatusChange {
            from,
            to,
            solution: None,
        }),
    }
}
