//! Partial field updates for tasks.

use super::{Priority, TaskTitle};
use chrono::{DateTime, Utc};

/// Validated partial update of a task's editable fields.
///
/// `None` leaves a field untouched. For clearable fields the inner `None`
/// clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<TaskTitle>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New due date; `Some(None)` clears it.
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    /// Returns `true` when the patch names no field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}
