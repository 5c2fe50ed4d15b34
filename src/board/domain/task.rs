//! Task aggregate root.

use super::{
    BoardDomainError, DueState, Priority, Progress, ProjectId, Subtask, SubtaskId, TaskId,
    TaskPatch, TaskStatus, TaskTitle,
};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated input for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Owning project.
    pub project_id: ProjectId,
    /// Task title.
    pub title: TaskTitle,
    /// Optional description.
    pub description: Option<String>,
    /// Initial status.
    pub status: TaskStatus,
    /// Initial priority.
    pub priority: Priority,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskDraft {
    /// Creates a draft in `todo` with medium priority and no deadline.
    #[must_use]
    pub const fn new(project_id: ProjectId, title: TaskTitle) -> Self {
        Self {
            project_id,
            title,
            description: None,
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            due_date: None,
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    title: TaskTitle,
    description: Option<String>,
    status: TaskStatus,
    priority: Priority,
    due_date: Option<DateTime<Utc>>,
    position: usize,
    subtasks: Vec<Subtask>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Zero-based position within the status column.
    pub position: usize,
    /// Persisted checklist, in display order.
    pub subtasks: Vec<Subtask>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task at `position` within its status column.
    #[must_use]
    pub fn new(draft: TaskDraft, position: usize, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            project_id: draft.project_id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            due_date: draft.due_date,
            position,
            subtasks: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            position: data.position,
            subtasks: data.subtasks,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Decomposes the aggregate into its persisted representation.
    #[must_use]
    pub fn into_persisted(self) -> PersistedTaskData {
        PersistedTaskData {
            id: self.id,
            project_id: self.project_id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
            position: self.position,
            subtasks: self.subtasks,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the zero-based position within the status column.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the checklist in display order.
    #[must_use]
    pub fn subtasks(&self) -> &[Subtask] {
        &self.subtasks
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns checklist progress.
    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress::of(&self.subtasks)
    }

    /// Classifies the deadline relative to `now`.
    #[must_use]
    pub fn due_state(&self, now: DateTime<Utc>, due_soon_window: TimeDelta) -> DueState {
        DueState::classify(self.due_date, self.status, now, due_soon_window)
    }

    /// Returns `true` if `needle` (already lowercased) occurs in the title
    /// or description.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.title.as_str().to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(needle))
    }

    /// Moves the task to another status.
    ///
    /// Priority and due date are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::TransitionNotAllowed`] if the transition
    /// policy rejects the change.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(BoardDomainError::TransitionNotAllowed {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Sets column and position. Used by the ordering policy only.
    pub(crate) fn place(&mut self, status: TaskStatus, position: usize, clock: &impl Clock) {
        self.status = status;
        self.position = position;
        self.touch(clock);
    }

    /// Applies a partial update and returns whether anything changed.
    ///
    /// Fields equal to their current value are not counted as changes, so an
    /// empty or no-op patch leaves `updated_at` as it was.
    pub fn apply_patch(&mut self, patch: &TaskPatch, clock: &impl Clock) -> bool {
        self.apply_patch_at(patch, clock.utc())
    }

    /// Applies a partial update stamped with `at` and returns whether
    /// anything changed.
    ///
    /// Stores use this to merge a field edit into their own copy of the
    /// task without taking the editor's other fields.
    pub fn apply_patch_at(&mut self, patch: &TaskPatch, at: DateTime<Utc>) -> bool {
        let mut changed = false;
        if let Some(title) = &patch.title {
            changed |= replace_if_different(&mut self.title, title);
        }
        if let Some(description) = &patch.description {
            changed |= replace_if_different(&mut self.description, description);
        }
        if let Some(priority) = &patch.priority {
            changed |= replace_if_different(&mut self.priority, priority);
        }
        if let Some(due_date) = &patch.due_date {
            changed |= replace_if_different(&mut self.due_date, due_date);
        }
        if changed {
            self.updated_at = at;
        }
        changed
    }

    /// Appends a checklist item.
    pub fn add_subtask(&mut self, subtask: Subtask, clock: &impl Clock) {
        self.subtasks.push(subtask);
        self.touch(clock);
    }

    /// Flips the completion flag of a checklist item and returns the item.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::SubtaskNotFound`] if the item does not
    /// belong to this task.
    pub fn toggle_subtask(
        &mut self,
        subtask_id: SubtaskId,
        clock: &impl Clock,
    ) -> Result<Subtask, BoardDomainError> {
        let task_id = self.id;
        let subtask = self
            .subtasks
            .iter_mut()
            .find(|item| item.id() == subtask_id)
            .ok_or(BoardDomainError::SubtaskNotFound {
                task_id,
                subtask_id,
            })?;
        subtask.toggle();
        let toggled = subtask.clone();
        self.touch(clock);
        Ok(toggled)
    }

    /// Removes a checklist item.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::SubtaskNotFound`] if the item does not
    /// belong to this task.
    pub fn remove_subtask(
        &mut self,
        subtask_id: SubtaskId,
        clock: &impl Clock,
    ) -> Result<Subtask, BoardDomainError> {
        let index = self.subtask_index(subtask_id)?;
        let removed = self.subtasks.remove(index);
        self.touch(clock);
        Ok(removed)
    }

    /// Moves the checklist item at `from` to index `to`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::PositionOutOfRange`] if either index is
    /// outside the checklist.
    pub fn reorder_subtasks(
        &mut self,
        from: usize,
        to: usize,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        let len = self.subtasks.len();
        for index in [from, to] {
            if index >= len {
                return Err(BoardDomainError::PositionOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }
        let item = self.subtasks.remove(from);
        self.subtasks.insert(to, item);
        self.touch(clock);
        Ok(())
    }

    fn subtask_index(&self, subtask_id: SubtaskId) -> Result<usize, BoardDomainError> {
        self.subtasks
            .iter()
            .position(|item| item.id() == subtask_id)
            .ok_or(BoardDomainError::SubtaskNotFound {
                task_id: self.id,
                subtask_id,
            })
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Overwrites `field` when `value` differs and reports whether it did.
fn replace_if_different<T: PartialEq + Clone>(field: &mut T, value: &T) -> bool {
    if field == value {
        return false;
    }
    field.clone_from(value);
    true
}
