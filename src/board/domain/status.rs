//! Task status enumeration and transition rules.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical task status. Each value is one board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    Todo,
    /// Work is underway.
    InProgress,
    /// Work is finished.
    Done,
}

impl TaskStatus {
    /// All statuses in column display order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Returns the status reached by the quick-advance control.
    ///
    /// The cycle is `todo → in_progress → done → todo`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Todo => Self::InProgress,
            Self::InProgress => Self::Done,
            Self::Done => Self::Todo,
        }
    }

    /// Returns whether a task in this status may move to the given status.
    ///
    /// The board does not gate its workflow: every defined status is
    /// reachable from every other.
    #[must_use]
    pub const fn can_transition_to(self, _target: Self) -> bool {
        true
    }

    /// Returns `true` for the finished status.
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    /// Parses canonical values and the legacy spellings still found in
    /// older records (`backlog`, `in-progress`, `completed`).
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" | "backlog" => Ok(Self::Todo),
            "in_progress" | "in-progress" => Ok(Self::InProgress),
            "done" | "completed" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
