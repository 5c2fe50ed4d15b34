//! Project aggregate and derived statistics.

use super::{Progress, ProjectId, ProjectName, Task};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Project aggregate root. Tasks reference projects by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: ProjectName,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project.
    #[must_use]
    pub fn new(name: ProjectName, description: Option<String>, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ProjectId::new(),
            name,
            description,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a project from persisted fields.
    #[must_use]
    pub const fn from_parts(
        id: ProjectId,
        name: ProjectName,
        description: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            created_at,
            updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
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

    /// Renames the project. Returns whether the name changed.
    pub fn rename(&mut self, name: ProjectName, clock: &impl Clock) -> bool {
        if self.name == name {
            return false;
        }
        self.name = name;
        self.updated_at = clock.utc();
        true
    }

    /// Replaces the description. Returns whether it changed.
    pub fn set_description(&mut self, description: Option<String>, clock: &impl Clock) -> bool {
        if self.description == description {
            return false;
        }
        self.description = description;
        self.updated_at = clock.utc();
        true
    }
}

/// Aggregate task statistics for a project.
///
/// Always recomputed from the project's tasks; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    /// Project the statistics describe.
    pub project_id: ProjectId,
    /// Number of tasks in the project.
    pub task_count: usize,
    /// Number of tasks in `done`.
    pub completed_task_count: usize,
}

impl ProjectStats {
    /// Computes statistics over the tasks that belong to `project_id`.
    #[must_use]
    pub fn compute<'a>(project_id: ProjectId, tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let (task_count, completed_task_count) = tasks
            .into_iter()
            .filter(|task| task.project_id() == project_id)
            .fold((0_usize, 0_usize), |(total, done), task| {
                let finished = usize::from(task.status().is_done());
                (total.saturating_add(1), done.saturating_add(finished))
            });
        Self {
            project_id,
            task_count,
            completed_task_count,
        }
    }

    /// Returns task completion progress.
    #[must_use]
    pub const fn progress(self) -> Progress {
        Progress {
            completed: self.completed_task_count,
            total: self.task_count,
        }
    }
}
