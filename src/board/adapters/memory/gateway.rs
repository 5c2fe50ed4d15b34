//! In-memory gateway for tests and embedders without a backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{
    domain::{Project, ProjectId, Subtask, SubtaskId, Task, TaskId, TaskPatch},
    ports::{GatewayError, GatewayResult, ProjectGateway, RecordRef, TaskFilter, TaskGateway},
};

/// Thread-safe in-memory task and project store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardGateway {
    state: Arc<RwLock<InMemoryBoardState>>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    tasks: HashMap<TaskId, Task>,
    projects: HashMap<ProjectId, Project>,
}

impl InMemoryBoardGateway {
    /// Creates an empty in-memory gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> GatewayResult<RwLockReadGuard<'_, InMemoryBoardState>> {
        self.state
            .read()
            .map_err(|err| GatewayError::network(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> GatewayResult<RwLockWriteGuard<'_, InMemoryBoardState>> {
        self.state
            .write()
            .map_err(|err| GatewayError::network(std::io::Error::other(err.to_string())))
    }
}

/// Rewrites a stored task's checklist and bumps its timestamp.
fn edit_subtasks(
    state: &mut InMemoryBoardState,
    task_id: TaskId,
    touched_at: DateTime<Utc>,
    edit: impl FnOnce(&mut Vec<Subtask>) -> GatewayResult<()>,
) -> GatewayResult<()> {
    let stored = state
        .tasks
        .remove(&task_id)
        .ok_or(GatewayError::NotFound(RecordRef::Task(task_id)))?;
    let original = stored.clone();
    let mut data = stored.into_persisted();
    match edit(&mut data.subtasks) {
        Ok(()) => {
            data.updated_at = touched_at;
            state.tasks.insert(task_id, Task::from_persisted(data));
            Ok(())
        }
        Err(err) => {
            state.tasks.insert(task_id, original);
            Err(err)
        }
    }
}

fn subtask_not_found(task_id: TaskId, subtask_id: SubtaskId) -> GatewayError {
    GatewayError::NotFound(RecordRef::Subtask {
        task_id,
        subtask_id,
    })
}

#[async_trait]
impl TaskGateway for InMemoryBoardGateway {
    async fn create_task(&self, task: &Task) -> GatewayResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(GatewayError::Duplicate(RecordRef::Task(task.id())));
        }
        if !state.projects.contains_key(&task.project_id()) {
            return Err(GatewayError::NotFound(RecordRef::Project(task.project_id())));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> GatewayResult<()> {
        let mut state = self.write()?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(GatewayError::NotFound(RecordRef::Task(task.id())))?;
        *stored = task.clone();
        Ok(())
    }

    async fn update_task_fields(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        touched_at: DateTime<Utc>,
    ) -> GatewayResult<()> {
        let mut state = self.write()?;
        let stored = state
            .tasks
            .get_mut(&id)
            .ok_or(GatewayError::NotFound(RecordRef::Task(id)))?;
        stored.apply_patch_at(patch, touched_at);
        Ok(())
    }

    async fn update_tasks(&self, tasks: &[Task]) -> GatewayResult<()> {
        let mut state = self.write()?;
        if let Some(missing) = tasks
            .iter()
            .find(|task| !state.tasks.contains_key(&task.id()))
        {
            return Err(GatewayError::NotFound(RecordRef::Task(missing.id())));
        }
        for task in tasks {
            state.tasks.insert(task.id(), task.clone());
        }
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> GatewayResult<()> {
        let mut state = self.write()?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(GatewayError::NotFound(RecordRef::Task(id)))
    }

    async fn find_task(&self, id: TaskId) -> GatewayResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> GatewayResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| {
            a.status()
                .cmp(&b.status())
                .then_with(|| a.position().cmp(&b.position()))
                .then_with(|| a.created_at().cmp(&b.created_at()))
        });
        Ok(tasks)
    }

    async fn create_subtask(
        &self,
        task_id: TaskId,
        subtask: &Subtask,
        touched_at: DateTime<Utc>,
    ) -> GatewayResult<()> {
        let mut state = self.write()?;
        edit_subtasks(&mut state, task_id, touched_at, |subtasks| {
            if subtasks.iter().any(|item| item.id() == subtask.id()) {
                return Err(GatewayError::Duplicate(RecordRef::Subtask {
                    task_id,
                    subtask_id: subtask.id(),
                }));
            }
            subtasks.push(subtask.clone());
            Ok(())
        })
    }

    async fn update_subtask(
        &self,
        task_id: TaskId,
        subtask: &Subtask,
        touched_at: DateTime<Utc>,
    ) -> GatewayResult<()> {
        let mut state = self.write()?;
        edit_subtasks(&mut state, task_id, touched_at, |subtasks| {
            let stored = subtasks
                .iter_mut()
                .find(|item| item.id() == subtask.id())
                .ok_or_else(|| subtask_not_found(task_id, subtask.id()))?;
            *stored = subtask.clone();
            Ok(())
        })
    }

    async fn delete_subtask(
        &self,
        task_id: TaskId,
        subtask_id: SubtaskId,
        touched_at: DateTime<Utc>,
    ) -> GatewayResult<()> {
        let mut state = self.write()?;
        edit_subtasks(&mut state, task_id, touched_at, |subtasks| {
            let before = subtasks.len();
            subtasks.retain(|item| item.id() != subtask_id);
            if subtasks.len() == before {
                return Err(subtask_not_found(task_id, subtask_id));
            }
            Ok(())
        })
    }
}

#[async_trait]
impl ProjectGateway for InMemoryBoardGateway {
    async fn create_project(&self, project: &Project) -> GatewayResult<()> {
        let mut state = self.write()?;
        if state.projects.contains_key(&project.id()) {
            return Err(GatewayError::Duplicate(RecordRef::Project(project.id())));
        }
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update_project(&self, project: &Project) -> GatewayResult<()> {
        let mut state = self.write()?;
        let stored = state
            .projects
            .get_mut(&project.id())
            .ok_or(GatewayError::NotFound(RecordRef::Project(project.id())))?;
        *stored = project.clone();
        Ok(())
    }

    async fn delete_project(&self, id: ProjectId) -> GatewayResult<()> {
        let mut state = self.write()?;
        if state.projects.remove(&id).is_none() {
            return Err(GatewayError::NotFound(RecordRef::Project(id)));
        }
        state.tasks.retain(|_, task| task.project_id() != id);
        Ok(())
    }

    async fn find_project(&self, id: ProjectId) -> GatewayResult<Option<Project>> {
        let state = self.read()?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn list_projects(&self) -> GatewayResult<Vec<Project>> {
        let state = self.read()?;
        let mut projects: Vec<Project> = state.projects.values().cloned().collect();
        projects.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(projects)
    }
}
