//! Persistence gateway ports for tasks, subtasks and projects.

use crate::board::domain::{
    Priority, Project, ProjectId, Subtask, SubtaskId, Task, TaskId, TaskPatch, TaskStatus,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Query parameters for listing tasks. Set fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Restrict to one project.
    pub project_id: Option<ProjectId>,
    /// Restrict to one status.
    pub status: Option<TaskStatus>,
    /// Restrict to one priority.
    pub priority: Option<Priority>,
    /// Case-insensitive text matched against title and description.
    pub search: Option<String>,
}

impl TaskFilter {
    /// Returns a filter selecting every task of `project_id`.
    #[must_use]
    pub fn for_project(project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            ..Self::default()
        }
    }

    /// Returns `true` if `task` satisfies every set field.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let needle = self
            .search
            .as_deref()
            .map(|query| query.trim().to_lowercase())
            .unwrap_or_default();
        self.project_id.is_none_or(|id| task.project_id() == id)
            && self.status.is_none_or(|status| task.status() == status)
            && self.priority.is_none_or(|priority| task.priority() == priority)
            && task.matches_search(&needle)
    }
}

/// Reference to a stored record, used in gateway errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordRef {
    /// A task record.
    Task(TaskId),
    /// A subtask record under its parent task.
    Subtask {
        /// Parent task.
        task_id: TaskId,
        /// Subtask.
        subtask_id: SubtaskId,
    },
    /// A project record.
    Project(ProjectId),
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task(id) => write!(f, "task {id}"),
            Self::Subtask {
                task_id,
                subtask_id,
            } => write!(f, "subtask {subtask_id} of task {task_id}"),
            Self::Project(id) => write!(f, "project {id}"),
        }
    }
}

/// Errors reported by gateway implementations.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The record does not exist (or no longer exists).
    #[error("{0} not found")]
    NotFound(RecordRef),

    /// A record with the same identifier already exists.
    #[error("{0} already exists")]
    Duplicate(RecordRef),

    /// The backend rejected the write (constraint or authorization failure).
    #[error("rejected by backend: {0}")]
    Rejected(String),

    /// Transport or transient backend failure.
    #[error("network error: {0}")]
    Network(Arc<dyn std::error::Error + Send + Sync>),
}

impl GatewayError {
    /// Wraps a transport error.
    pub fn network(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Network(Arc::new(err))
    }

    /// Returns `true` for failures worth retrying.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Task and subtask persistence contract.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Duplicate`] when the id is taken or
    /// [`GatewayError::NotFound`] when the owning project does not exist.
    async fn create_task(&self, task: &Task) -> GatewayResult<()>;

    /// Persists the current state of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the task does not exist.
    async fn update_task(&self, task: &Task) -> GatewayResult<()>;

    /// Merges a partial field update into the stored task.
    ///
    /// Only the fields `patch` names are written; the rest keep their stored
    /// values. `touched_at` becomes the task's `updated_at` when anything
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the task does not exist.
    async fn update_task_fields(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        touched_at: DateTime<Utc>,
    ) -> GatewayResult<()>;

    /// Persists several tasks as one atomic write: all or none are stored.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] naming the first missing task, in
    /// which case nothing is written.
    async fn update_tasks(&self, tasks: &[Task]) -> GatewayResult<()>;

    /// Deletes a task and its subtasks.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the task does not exist.
    async fn delete_task(&self, id: TaskId) -> GatewayResult<()>;

    /// Finds a task by id. Returns `None` when it does not exist.
    async fn find_task(&self, id: TaskId) -> GatewayResult<Option<Task>>;

    /// Lists tasks matching `filter`, ordered by status then position.
    async fn list_tasks(&self, filter: &TaskFilter) -> GatewayResult<Vec<Task>>;

    /// Appends a subtask to a task's checklist.
    ///
    /// `touched_at` is the parent's new `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the task does not exist or
    /// [`GatewayError::Duplicate`] when the subtask id is taken.
    async fn create_subtask(
        &self,
        task_id: TaskId,
        subtask: &Subtask,
        touched_at: DateTime<Utc>,
    ) -> GatewayResult<()>;

    /// Replaces a stored subtask.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the task or subtask does not
    /// exist.
    async fn update_subtask(
        &self,
        task_id: TaskId,
        subtask: &Subtask,
        touched_at: DateTime<Utc>,
    ) -> GatewayResult<()>;

    /// Removes a subtask.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the task or subtask does not
    /// exist.
    async fn delete_subtask(
        &self,
        task_id: TaskId,
        subtask_id: SubtaskId,
        touched_at: DateTime<Utc>,
    ) -> GatewayResult<()>;
}

/// Project persistence contract.
#[async_trait]
pub trait ProjectGateway: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Duplicate`] when the id is taken.
    async fn create_project(&self, project: &Project) -> GatewayResult<()>;

    /// Persists the current state of an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the project does not exist.
    async fn update_project(&self, project: &Project) -> GatewayResult<()>;

    /// Deletes a project together with its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the project does not exist.
    async fn delete_project(&self, id: ProjectId) -> GatewayResult<()>;

    /// Finds a project by id. Returns `None` when it does not exist.
    async fn find_project(&self, id: ProjectId) -> GatewayResult<Option<Project>>;

    /// Lists all projects, oldest first.
    async fn list_projects(&self) -> GatewayResult<Vec<Project>>;
}
