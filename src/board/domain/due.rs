//! Deadline classification.

use super::TaskStatus;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Deadline state of a task at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueState {
    /// The task has no due date.
    NoDeadline,
    /// The due date has passed and the task is not done.
    Overdue,
    /// The due date falls within the due-soon window and the task is not done.
    DueSoon,
    /// The task has a due date that needs no attention.
    OnTrack,
}

impl DueState {
    /// Classifies a deadline.
    ///
    /// Done tasks are never overdue or due soon.
    #[must_use]
    pub fn classify(
        due_date: Option<DateTime<Utc>>,
        status: TaskStatus,
        now: DateTime<Utc>,
        due_soon_window: TimeDelta,
    ) -> Self {
        let Some(due) = due_date else {
            return Self::NoDeadline;
        };
        if status.is_done() {
            return Self::OnTrack;
        }
        if due < now {
            return Self::Overdue;
        }
        if due <= now + due_soon_window {
            return Self::DueSoon;
        }
        Self::OnTrack
    }

    /// Returns `true` when the deadline needs attention.
    #[must_use]
    pub const fn needs_attention(self) -> bool {
        matches!(self, Self::Overdue | Self::DueSoon)
    }
}
