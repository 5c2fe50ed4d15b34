//! Board session service: intent handlers over one project's tasks.
//!
//! Each handler validates its input, computes the resulting task states with
//! the domain rules, optionally applies them to the session state, asks the
//! gateway to persist them, and then reconciles: confirmed results are kept,
//! failures are rolled back. Updates to one task are serialised, and every
//! read-modify-write on the collection runs under a single commit lock so
//! column renumbering never interleaves.

use crate::board::{
    config::{BoardConfig, ConcurrentUpdatePolicy},
    domain::{
        BoardDomainError, BoardQuery, BoardSnapshot, MovePlan, Priority, ProjectId, Subtask,
        SubtaskId, Task, TaskDraft, TaskId, TaskPatch, TaskStatus, TaskTitle, ordering,
    },
    ports::{GatewayError, GatewayResult, RecordRef, TaskFilter, TaskGateway},
    services::state::{BoardAction, BoardState},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info, warn};

/// Request payload for creating a task on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: None,
            priority: None,
            due_date: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status (defaults to `todo`).
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the priority (defaults to `medium`).
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Request payload for a partial task update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskFieldsRequest {
    title: Option<String>,
    description: Option<Option<String>>,
    priority: Option<String>,
    due_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateTaskFieldsRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Clears the description.
    #[must_use]
    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    /// Sets a new priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets a new deadline.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(Some(due_date));
        self
    }

    /// Clears the deadline.
    #[must_use]
    pub const fn clear_due_date(mut self) -> Self {
        self.due_date = Some(None);
        self
    }

    /// Returns `true` when the request names no field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum BoardServiceError {
    /// Input validation failed; nothing was sent to the gateway.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// The gateway reported a failure; the board kept its last-known-good state.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// The task no longer exists and has been dropped from the board.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// Another update to the task has not settled yet.
    #[error("task {0} has an update in flight")]
    Busy(TaskId),
    /// The board session was detached; the result was discarded.
    #[error("board session has been detached")]
    Detached,
}

impl BoardServiceError {
    /// Returns `true` for errors raised before any gateway call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Domain(_))
    }

    fn from_domain(err: BoardDomainError) -> Self {
        match err {
            BoardDomainError::TaskNotOnBoard(id) => Self::NotFound(id),
            other => Self::Domain(other),
        }
    }
}

/// Result type for board service operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Gateway write that persists a [`Mutation`].
#[derive(Debug, Clone)]
enum PendingWrite {
    Tasks,
    Fields(TaskPatch),
    SubtaskCreated(Subtask),
    SubtaskUpdated(Subtask),
    SubtaskDeleted(SubtaskId),
}

/// Task states before and after a change, plus how to persist it.
#[derive(Debug, Clone)]
struct Mutation {
    before: Vec<Task>,
    after: Vec<Task>,
    write: PendingWrite,
}

/// Where a relocated task ends up.
#[derive(Debug, Clone, Copy)]
enum Destination {
    At(TaskStatus, usize),
    EndOfNextStatus,
}

type TaskLocks = Mutex<HashMap<TaskId, Arc<Mutex<()>>>>;

/// Board session service for one project.
pub struct BoardService<G, C>
where
    G: TaskGateway,
    C: Clock + Send + Sync,
{
    gateway: Arc<G>,
    clock: Arc<C>,
    config: BoardConfig,
    project_id: ProjectId,
    state: Arc<RwLock<BoardState>>,
    task_locks: Arc<TaskLocks>,
    commit_lock: Arc<Mutex<()>>,
}

impl<G, C> Clone for BoardService<G, C>
where
    G: TaskGateway,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
            project_id: self.project_id,
            state: Arc::clone(&self.state),
            task_locks: Arc::clone(&self.task_locks),
            commit_lock: Arc::clone(&self.commit_lock),
        }
    }
}

impl<G, C> BoardService<G, C>
where
    G: TaskGateway,
    C: Clock + Send + Sync,
{
    /// Creates a board session for `project_id` with default configuration.
    #[must_use]
    pub fn new(gateway: Arc<G>, clock: Arc<C>, project_id: ProjectId) -> Self {
        Self {
            gateway,
            clock,
            config: BoardConfig::default(),
            project_id,
            state: Arc::new(RwLock::new(BoardState::new())),
            task_locks: Arc::new(Mutex::new(HashMap::new())),
            commit_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: BoardConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Returns the project this session shows.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Replaces the session's tasks with the project's persisted tasks.
    ///
    /// Transient gateway failures are retried per
    /// [`BoardConfig::list_retry`]; the commit lock is released while
    /// backing off. Returns the number of tasks loaded.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Gateway`] once retries are exhausted or
    /// on a non-transient failure, and [`BoardServiceError::Detached`] if the
    /// session ended meanwhile.
    pub async fn load(&self) -> BoardServiceResult<usize> {
        self.ensure_attached().await?;
        let filter = TaskFilter::for_project(self.project_id);
        let policy = self.config.list_retry;
        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 1_u32;
        loop {
            let commit = self.commit_lock.lock().await;
            let failure = match self.gateway.list_tasks(&filter).await {
                Ok(tasks) => return self.apply_listing(tasks).await,
                Err(err) => err,
            };
            drop(commit);
            if !failure.is_transient() || attempt >= max_attempts {
                return Err(failure.into());
            }
            let delay = policy.backoff_for(attempt);
            warn!(
                attempt,
                max_attempts,
                delay = ?delay,
                error = %failure,
                "listing tasks failed; retrying"
            );
            tokio::time::sleep(delay).await;
            attempt = attempt.saturating_add(1);
        }
    }

    /// Returns the current board projection as an owned snapshot.
    pub async fn board(&self, query: &BoardQuery) -> BoardSnapshot {
        let state = self.state.read().await;
        state
            .view(query, self.clock.utc(), self.config.due_soon_window())
            .to_snapshot()
    }

    /// Returns a task from the session state.
    pub async fn task(&self, task_id: TaskId) -> Option<Task> {
        self.state.read().await.task(task_id).cloned()
    }

    /// Collapses or expands a column. Returns whether it is now expanded.
    pub async fn toggle_column(&self, status: TaskStatus) -> bool {
        let mut state = self.state.write().await;
        state.apply(BoardAction::ColumnToggled(status));
        state.is_expanded(status)
    }

    /// Ends the session. Gateway results that settle later are discarded.
    pub async fn detach(&self) {
        self.state.write().await.apply(BoardAction::Detached);
        info!(project_id = %self.project_id, "board session detached");
    }

    /// Creates a task at the end of its status column.
    ///
    /// The task appears on the board only after the gateway stores it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] for invalid input and
    /// [`BoardServiceError::Gateway`] when the gateway rejects the write.
    pub async fn create_task(&self, request: CreateTaskRequest) -> BoardServiceResult<Task> {
        let draft = self.validate_create(request)?;
        let _commit = self.commit_lock.lock().await;
        self.ensure_attached().await?;

        let position = {
            let state = self.state.read().await;
            ordering::next_position(state.tasks(), draft.status)
        };
        let task = Task::new(draft, position, &*self.clock);
        let result = self.gateway.create_task(&task).await;

        let mut state = self.state.write().await;
        if state.is_detached() {
            debug!(task_id = %task.id(), "discarding created task for detached board");
            return Err(BoardServiceError::Detached);
        }
        result?;
        state.apply(BoardAction::Upserted(vec![task.clone()]));
        info!(task_id = %task.id(), status = %task.status(), "task created");
        Ok(task)
    }

    /// Moves a task to `to_index` in the `to` column.
    ///
    /// Both affected columns are renumbered and persisted in one write.
    /// Indices past the end of the column append.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::NotFound`] if the task is gone,
    /// [`BoardServiceError::Busy`] under the reject policy, and gateway
    /// failures after rolling the board back.
    pub async fn move_task(
        &self,
        task_id: TaskId,
        to: TaskStatus,
        to_index: usize,
    ) -> BoardServiceResult<Task> {
        self.relocate(task_id, Destination::At(to, to_index)).await
    }

    /// Advances a task along `todo → in_progress → done → todo`, placing it
    /// at the end of the target column.
    ///
    /// # Errors
    ///
    /// See [`BoardService::move_task`].
    pub async fn advance_status(&self, task_id: TaskId) -> BoardServiceResult<Task> {
        self.relocate(task_id, Destination::EndOfNextStatus).await
    }

    /// Applies a partial update to a task's editable fields.
    ///
    /// An empty request, or one that matches the current values, returns
    /// the task unchanged without calling the gateway.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] for invalid input,
    /// [`BoardServiceError::NotFound`] if the task is gone, and gateway
    /// failures after rolling the board back.
    pub async fn update_task_fields(
        &self,
        task_id: TaskId,
        request: UpdateTaskFieldsRequest,
    ) -> BoardServiceResult<Task> {
        if request.is_empty() {
            return self.current_task(task_id).await;
        }
        let patch = self.validate_patch(request)?;
        let clock = &*self.clock;
        self.edit_task(task_id, |task| {
            Ok(task
                .apply_patch(&patch, clock)
                .then(|| PendingWrite::Fields(patch.clone())))
        })
        .await
    }

    /// Deletes a task.
    ///
    /// The task leaves the board only after the gateway confirms; the column
    /// it leaves is then renumbered.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::NotFound`] if the task is already gone,
    /// and gateway failures (the task stays on the board).
    pub async fn delete_task(&self, task_id: TaskId) -> BoardServiceResult<()> {
        let _task_guard = self.acquire(task_id).await?;
        let _commit = self.commit_lock.lock().await;
        self.ensure_attached().await?;
        if self.state.read().await.task(task_id).is_none() {
            return Err(BoardServiceError::NotFound(task_id));
        }

        let result = self.gateway.delete_task(task_id).await;
        let renumber = {
            let mut state = self.state.write().await;
            if state.is_detached() {
                debug!(task_id = %task_id, "discarding delete result for detached board");
                return Err(BoardServiceError::Detached);
            }
            if let Err(err) = result {
                let (error, renumbered) = self.reconcile_failure(&mut state, err);
                drop(state);
                self.persist_renumbering(&renumbered).await;
                return Err(error);
            }
            let placements = ordering::plan_removal(state.tasks(), task_id)
                .map_err(BoardServiceError::from_domain)?;
            state.apply(BoardAction::Removed(task_id));
            self.placement_mutation(&state, None, &placements)?
        };
        self.task_locks.lock().await.remove(&task_id);
        info!(task_id = %task_id, "task deleted");

        if renumber.after.is_empty() {
            return Ok(());
        }
        if let Err(err) = self.commit(renumber).await {
            warn!(task_id = %task_id, error = %err, "task deleted but column renumbering failed");
            return Err(err);
        }
        Ok(())
    }

    /// Appends a checklist item to a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] for an invalid title,
    /// [`BoardServiceError::NotFound`] if the task is gone, and gateway
    /// failures after rolling the board back.
    pub async fn add_subtask(
        &self,
        task_id: TaskId,
        title: impl Into<String>,
    ) -> BoardServiceResult<Subtask> {
        let subtask = Subtask::new(self.validate_title(title.into())?);
        let subtask_id = subtask.id();
        let created = subtask.clone();
        let clock = &*self.clock;
        let task = self
            .edit_task(task_id, move |task| {
                task.add_subtask(subtask, clock);
                Ok(Some(PendingWrite::SubtaskCreated(created)))
            })
            .await?;
        find_subtask(&task, subtask_id)
    }

    /// Flips a checklist item's completion flag.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::SubtaskNotFound`] for an unknown item,
    /// [`BoardServiceError::NotFound`] if the task is gone, and gateway
    /// failures after rolling the board back.
    pub async fn toggle_subtask(
        &self,
        task_id: TaskId,
        subtask_id: SubtaskId,
    ) -> BoardServiceResult<Subtask> {
        let clock = &*self.clock;
        let task = self
            .edit_task(task_id, |task| {
                let toggled = task.toggle_subtask(subtask_id, clock)?;
                Ok(Some(PendingWrite::SubtaskUpdated(toggled)))
            })
            .await?;
        find_subtask(&task, subtask_id)
    }

    /// Removes a checklist item.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::SubtaskNotFound`] for an unknown item,
    /// [`BoardServiceError::NotFound`] if the task is gone, and gateway
    /// failures after rolling the board back.
    pub async fn remove_subtask(
        &self,
        task_id: TaskId,
        subtask_id: SubtaskId,
    ) -> BoardServiceResult<Task> {
        let clock = &*self.clock;
        self.edit_task(task_id, |task| {
            let removed = task.remove_subtask(subtask_id, clock)?;
            Ok(Some(PendingWrite::SubtaskDeleted(removed.id())))
        })
        .await
    }

    /// Moves the checklist item at `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::PositionOutOfRange`] for bad indices,
    /// [`BoardServiceError::NotFound`] if the task is gone, and gateway
    /// failures after rolling the board back.
    pub async fn reorder_subtasks(
        &self,
        task_id: TaskId,
        from: usize,
        to: usize,
    ) -> BoardServiceResult<Task> {
        let clock = &*self.clock;
        self.edit_task(task_id, |task| {
            task.reorder_subtasks(from, to, clock)?;
            Ok((from != to).then_some(PendingWrite::Tasks))
        })
        .await
    }

    async fn relocate(
        &self,
        task_id: TaskId,
        destination: Destination,
    ) -> BoardServiceResult<Task> {
        let _task_guard = self.acquire(task_id).await?;
        let _commit = self.commit_lock.lock().await;
        self.ensure_attached().await?;

        let mutation = {
            let state = self.state.read().await;
            let current = state
                .task(task_id)
                .ok_or(BoardServiceError::NotFound(task_id))?;
            let (to, to_index) = match destination {
                Destination::At(status, index) => (status, index),
                Destination::EndOfNextStatus => {
                    let next = current.status().next();
                    (next, ordering::next_position(state.tasks(), next))
                }
            };
            let plan = ordering::plan_move(state.tasks(), task_id, to, to_index)
                .map_err(BoardServiceError::from_domain)?;
            if plan.is_noop() {
                return Ok(current.clone());
            }
            self.placement_mutation(&state, Some(&plan), &plan.changes)?
        };

        let after = self.commit(mutation).await?;
        let moved = after
            .into_iter()
            .find(|task| task.id() == task_id)
            .ok_or(BoardServiceError::NotFound(task_id))?;
        info!(
            task_id = %task_id,
            status = %moved.status(),
            position = moved.position(),
            "task moved"
        );
        Ok(moved)
    }

    /// Runs a single-task edit through the commit pipeline.
    ///
    /// `edit` returns `None` when it changed nothing; the task is then
    /// returned as is without a gateway call.
    async fn edit_task<F>(&self, task_id: TaskId, edit: F) -> BoardServiceResult<Task>
    where
        F: FnOnce(&mut Task) -> Result<Option<PendingWrite>, BoardDomainError> + Send,
    {
        let _task_guard = self.acquire(task_id).await?;
        let _commit = self.commit_lock.lock().await;
        self.ensure_attached().await?;

        let mutation = {
            let state = self.state.read().await;
            let before = state
                .task(task_id)
                .cloned()
                .ok_or(BoardServiceError::NotFound(task_id))?;
            let mut after = before.clone();
            let Some(write) = edit(&mut after)? else {
                return Ok(before);
            };
            Mutation {
                before: vec![before],
                after: vec![after],
                write,
            }
        };

        self.commit(mutation)
            .await?
            .into_iter()
            .next()
            .ok_or(BoardServiceError::NotFound(task_id))
    }

    /// Builds the mutation that applies `placements`. When `plan` is given,
    /// the moved task also goes through the transition rules.
    fn placement_mutation(
        &self,
        state: &BoardState,
        plan: Option<&MovePlan>,
        placements: &[ordering::Placement],
    ) -> BoardServiceResult<Mutation> {
        let before = state.snapshot_of(placements.iter().map(|placement| placement.task_id));
        let mut after = before.clone();
        for task in &mut after {
            let Some(placement) = placements
                .iter()
                .find(|placement| placement.task_id == task.id())
            else {
                continue;
            };
            if let Some(plan) = plan.filter(|plan| plan.task_id == task.id() && plan.from != plan.to)
            {
                task.transition_to(plan.to, &*self.clock)?;
            }
            task.place(placement.status, placement.position, &*self.clock);
        }
        Ok(Mutation {
            before,
            after,
            write: PendingWrite::Tasks,
        })
    }

    /// Applies a mutation optimistically (if configured), persists it and
    /// reconciles the session state with the outcome.
    async fn commit(&self, mutation: Mutation) -> BoardServiceResult<Vec<Task>> {
        if self.config.optimistic_updates {
            let mut state = self.state.write().await;
            if state.is_detached() {
                return Err(BoardServiceError::Detached);
            }
            state.apply(BoardAction::Upserted(mutation.after.clone()));
        }

        let result = self.dispatch(&mutation).await;

        let mut state = self.state.write().await;
        if state.is_detached() {
            debug!(tasks = mutation.after.len(), "discarding gateway result for detached board");
            return Err(BoardServiceError::Detached);
        }
        match result {
            Ok(()) => {
                state.apply(BoardAction::Upserted(mutation.after.clone()));
                Ok(mutation.after)
            }
            Err(err) => {
                if self.config.optimistic_updates {
                    state.apply(BoardAction::Upserted(mutation.before));
                    warn!(error = %err, "gateway write failed; rolled back optimistic update");
                }
                let (error, renumbered) = self.reconcile_failure(&mut state, err);
                drop(state);
                self.persist_renumbering(&renumbered).await;
                Err(error)
            }
        }
    }

    async fn dispatch(&self, mutation: &Mutation) -> GatewayResult<()> {
        let Some(parent) = mutation.after.first() else {
            return Ok(());
        };
        match &mutation.write {
            PendingWrite::Tasks => match mutation.after.as_slice() {
                [task] => self.gateway.update_task(task).await,
                tasks => self.gateway.update_tasks(tasks).await,
            },
            PendingWrite::Fields(patch) => {
                self.gateway
                    .update_task_fields(parent.id(), patch, parent.updated_at())
                    .await
            }
            PendingWrite::SubtaskCreated(subtask) => {
                self.gateway
                    .create_subtask(parent.id(), subtask, parent.updated_at())
                    .await
            }
            PendingWrite::SubtaskUpdated(subtask) => {
                self.gateway
                    .update_subtask(parent.id(), subtask, parent.updated_at())
                    .await
            }
            PendingWrite::SubtaskDeleted(subtask_id) => {
                self.gateway
                    .delete_subtask(parent.id(), *subtask_id, parent.updated_at())
                    .await
            }
        }
    }

    /// Maps a gateway failure to a service error.
    ///
    /// A vanished task is dropped from the session and the column it leaves
    /// is closed up locally. The renumbered neighbours are returned so the
    /// caller can persist them once the state lock is released.
    fn reconcile_failure(
        &self,
        state: &mut BoardState,
        err: GatewayError,
    ) -> (BoardServiceError, Vec<Task>) {
        let id = match err {
            GatewayError::NotFound(RecordRef::Task(id)) => id,
            other => return (BoardServiceError::Gateway(other), Vec::new()),
        };
        let placements = ordering::plan_removal(state.tasks(), id).unwrap_or_default();
        state.apply(BoardAction::Removed(id));
        let mut renumbered =
            state.snapshot_of(placements.iter().map(|placement| placement.task_id));
        for task in &mut renumbered {
            if let Some(placement) = placements
                .iter()
                .find(|placement| placement.task_id == task.id())
            {
                task.place(placement.status, placement.position, &*self.clock);
            }
        }
        state.apply(BoardAction::Upserted(renumbered.clone()));
        warn!(
            task_id = %id,
            renumbered = renumbered.len(),
            "task no longer exists; dropped from board"
        );
        (BoardServiceError::NotFound(id), renumbered)
    }

    /// Writes positions closed up after a vanished task. Failures are logged;
    /// the next load reads whatever the store holds.
    async fn persist_renumbering(&self, tasks: &[Task]) {
        if tasks.is_empty() {
            return;
        }
        if let Err(err) = self.gateway.update_tasks(tasks).await {
            warn!(tasks = tasks.len(), error = %err, "persisting renumbered column failed");
        }
    }

    /// Replaces the session's tasks with a fresh listing. Called with the
    /// commit lock held.
    async fn apply_listing(&self, tasks: Vec<Task>) -> BoardServiceResult<usize> {
        let count = tasks.len();
        let mut state = self.state.write().await;
        if state.is_detached() {
            debug!(project_id = %self.project_id, "discarding task list for detached board");
            return Err(BoardServiceError::Detached);
        }
        state.apply(BoardAction::Loaded(tasks));
        info!(project_id = %self.project_id, tasks = count, "board loaded");
        Ok(count)
    }

    async fn acquire(&self, task_id: TaskId) -> BoardServiceResult<OwnedMutexGuard<()>> {
        let lock = {
            let mut locks = self.task_locks.lock().await;
            Arc::clone(locks.entry(task_id).or_default())
        };
        match self.config.update_policy {
            ConcurrentUpdatePolicy::Queue => Ok(lock.lock_owned().await),
            ConcurrentUpdatePolicy::RejectStale => lock.try_lock_owned().map_err(|_| {
                debug!(task_id = %task_id, "rejecting overlapping update");
                BoardServiceError::Busy(task_id)
            }),
        }
    }

    async fn ensure_attached(&self) -> BoardServiceResult<()> {
        if self.state.read().await.is_detached() {
            return Err(BoardServiceError::Detached);
        }
        Ok(())
    }

    async fn current_task(&self, task_id: TaskId) -> BoardServiceResult<Task> {
        self.task(task_id)
            .await
            .ok_or(BoardServiceError::NotFound(task_id))
    }

    fn validate_title(&self, raw: String) -> Result<TaskTitle, BoardDomainError> {
        let title = TaskTitle::new(raw)?;
        let length = title.char_count();
        let max = self.config.max_title_length;
        if length > max {
            return Err(BoardDomainError::TitleTooLong { length, max });
        }
        Ok(title)
    }

    fn validate_create(&self, request: CreateTaskRequest) -> Result<TaskDraft, BoardDomainError> {
        let mut draft = TaskDraft::new(self.project_id, self.validate_title(request.title)?);
        draft.description = request.description;
        draft.due_date = request.due_date;
        if let Some(status) = request.status {
            draft.status = TaskStatus::try_from(status.as_str())?;
        }
        if let Some(priority) = request.priority {
            draft.priority = Priority::try_from(priority.as_str())?;
        }
        Ok(draft)
    }

    fn validate_patch(
        &self,
        request: UpdateTaskFieldsRequest,
    ) -> Result<TaskPatch, BoardDomainError> {
        Ok(TaskPatch {
            title: request
                .title
                .map(|title| self.validate_title(title))
                .transpose()?,
            description: request.description,
            priority: request
                .priority
                .map(|priority| Priority::try_from(priority.as_str()))
                .transpose()?,
            due_date: request.due_date,
        })
    }
}

fn find_subtask(task: &Task, subtask_id: SubtaskId) -> BoardServiceResult<Subtask> {
    task.subtasks()
        .iter()
        .find(|item| item.id() == subtask_id)
        .cloned()
        .ok_or_else(|| {
            BoardServiceError::Domain(BoardDomainError::SubtaskNotFound {
                task_id: task.id(),
                subtask_id,
            })
        })
}
