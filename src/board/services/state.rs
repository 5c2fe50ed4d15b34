//! Session-owned task collection and its reducer.

use crate::board::domain::{
    BoardQuery, BoardView, ProjectionContext, Task, TaskId, TaskStatus, projection::project_board,
};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::BTreeSet;

/// State change applied to a [`BoardState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardAction {
    /// Replace the collection with a freshly listed one.
    Loaded(Vec<Task>),
    /// Insert or replace tasks by id.
    Upserted(Vec<Task>),
    /// Drop a task.
    Removed(TaskId),
    /// Flip a column's collapsed flag.
    ColumnToggled(TaskStatus),
    /// End the session; later results are discarded.
    Detached,
}

/// In-memory task collection for one board session.
///
/// Only [`BoardState::apply`] mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    tasks: Vec<Task>,
    collapsed: BTreeSet<TaskStatus>,
    detached: bool,
}

impl BoardState {
    /// Creates an empty, attached state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one action.
    pub fn apply(&mut self, action: BoardAction) {
        match action {
            BoardAction::Loaded(tasks) => self.tasks = tasks,
            BoardAction::Upserted(tasks) => {
                for task in tasks {
                    match self.tasks.iter_mut().find(|stored| stored.id() == task.id()) {
                        Some(stored) => *stored = task,
                        None => self.tasks.push(task),
                    }
                }
            }
            BoardAction::Removed(id) => self.tasks.retain(|task| task.id() != id),
            BoardAction::ColumnToggled(status) => {
                if !self.collapsed.remove(&status) {
                    self.collapsed.insert(status);
                }
            }
            BoardAction::Detached => self.detached = true,
        }
    }

    /// Returns all tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns a task by id.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Returns clones of the tasks with the given ids, skipping unknown ids.
    #[must_use]
    pub fn snapshot_of(&self, ids: impl IntoIterator<Item = TaskId>) -> Vec<Task> {
        ids.into_iter()
            .filter_map(|id| self.task(id).cloned())
            .collect()
    }

    /// Returns whether `status`'s column is expanded.
    #[must_use]
    pub fn is_expanded(&self, status: TaskStatus) -> bool {
        !self.collapsed.contains(&status)
    }

    /// Returns `true` once the session has been detached.
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        self.detached
    }

    /// Projects the collection into board columns.
    #[must_use]
    pub fn view(
        &self,
        query: &BoardQuery,
        now: DateTime<Utc>,
        due_soon_window: TimeDelta,
    ) -> BoardView<'_> {
        project_board(
            &self.tasks,
            query,
            ProjectionContext {
                now,
                due_soon_window,
                collapsed: &self.collapsed,
            },
        )
    }
}
