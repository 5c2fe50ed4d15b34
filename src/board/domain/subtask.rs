//! Checklist items owned by a task.

use super::{SubtaskId, TaskTitle};
use serde::{Deserialize, Serialize};

/// Checklist item. Exists only inside its owning task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    id: SubtaskId,
    title: TaskTitle,
    completed: bool,
}

impl Subtask {
    /// Creates an open subtask.
    #[must_use]
    pub fn new(title: TaskTitle) -> Self {
        Self {
            id: SubtaskId::new(),
            title,
            completed: false,
        }
    }

    /// Reconstructs a subtask from persisted storage.
    #[must_use]
    pub const fn from_parts(id: SubtaskId, title: TaskTitle, completed: bool) -> Self {
        Self {
            id,
            title,
            completed,
        }
    }

    /// Returns the subtask identifier.
    #[must_use]
    pub const fn id(&self) -> SubtaskId {
        self.id
    }

    /// Returns the subtask title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns whether the item is checked off.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    pub(crate) const fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Completion ratio of a task's subtasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Completed item count.
    pub completed: usize,
    /// Total item count.
    pub total: usize,
}

impl Progress {
    /// Counts completed items in `subtasks`.
    #[must_use]
    pub fn of(subtasks: &[Subtask]) -> Self {
        Self {
            completed: subtasks.iter().filter(|item| item.is_completed()).count(),
            total: subtasks.len(),
        }
    }

    /// Returns the completion percentage, rounded down. Zero when empty.
    #[must_use]
    pub fn percent(self) -> usize {
        self.completed
            .saturating_mul(100)
            .checked_div(self.total)
            .unwrap_or(0)
    }

    /// Returns the completion ratio in `0.0..=1.0`. Zero when empty.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "display ratio; counts never approach f64 precision limits"
    )]
    pub fn ratio(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }
}
