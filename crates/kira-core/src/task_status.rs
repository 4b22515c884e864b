// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task status finite state machine.

use std::fmt;
use std::str::FromStr;

/// A task's lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    Doing,
    Blocked,
    Review,
    Done,
}

impl TaskStatus {
    /// States reachable in one transition from `self`: `todo->doing`,
    /// `doing->{blocked,review,done}`, `blocked->doing`,
    /// `review->{doing,done}`, `done->doing` (reopen).
    pub fn successors(&self) -> &'static [TaskStatus] {
        use TaskStatus::*;
        match self {
            Todo => &[Doing],
            Doing => &[Blocked, Review, Done],
            Blocked => &[Doing],
            Review => &[Doing, Done],
            Done => &[Doing],
        }
    }

    pub fn can_transition_to(&self, target: TaskStatus) -> bool {
        *self == target || self.successors().contains(&target)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Doing => "doing",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
        };
        write!(f, "{s}")
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "doing" => Ok(TaskStatus::Doing),
            "blocked" => Ok(TaskStatus::Blocked),
            "review" => Ok(TaskStatus::Review),
            "done" => Ok(TaskStatus::Done),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

#[cfg(test)]
#[path = "task_status_tests.rs"]
mod tests;
