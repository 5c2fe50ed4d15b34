//! Ordering policy: display order within a column and drag-and-drop moves.
//!
//! Positions are dense, zero-based and per column. Every planner in this
//! module returns the complete set of placements needed to keep them that
//! way, so callers can persist a move as a single write.

use super::{BoardDomainError, Task, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Field used by keyed sort modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Sort by deadline. Tasks without one count as infinitely late.
    DueDate,
    /// Sort by priority rank.
    Priority,
}

/// Display order within a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "field")]
pub enum SortMode {
    /// Creation order.
    #[default]
    None,
    /// User-assigned position.
    Manual,
    /// Ascending by field; ties keep manual order.
    Ascending(SortField),
    /// Descending by field; ties keep manual order.
    Descending(SortField),
}

/// Target column and position for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Task being placed.
    pub task_id: TaskId,
    /// Column the task ends up in.
    pub status: TaskStatus,
    /// Zero-based position in that column.
    pub position: usize,
}

/// Result of planning a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    /// Task being moved.
    pub task_id: TaskId,
    /// Column the task leaves.
    pub from: TaskStatus,
    /// Column the task enters.
    pub to: TaskStatus,
    /// Effective index in the destination column.
    pub index: usize,
    /// Every task whose column or position changes, the moved task included.
    pub changes: Vec<Placement>,
}

impl MovePlan {
    /// Returns `true` when the move leaves every task where it is.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Base order used by manual mode and for tie-breaks.
fn manual_order(left: &Task, right: &Task) -> Ordering {
    left.position()
        .cmp(&right.position())
        .then_with(|| creation_order(left, right))
}

fn creation_order(left: &Task, right: &Task) -> Ordering {
    left.created_at()
        .cmp(&right.created_at())
        .then_with(|| left.id().cmp(&right.id()))
}

/// Ascending comparison by field. Missing due dates sort last.
fn field_order(field: SortField, left: &Task, right: &Task) -> Ordering {
    match field {
        SortField::Priority => left.priority().cmp(&right.priority()),
        SortField::DueDate => match (left.due_date(), right.due_date()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// Sorts one column's tasks in place.
///
/// The sort is stable: keyed modes first lay tasks out in manual order, so
/// equal keys keep their manual relative order in both directions.
pub fn sort_column(tasks: &mut [&Task], mode: SortMode) {
    match mode {
        SortMode::None => tasks.sort_by(|a, b| creation_order(a, b)),
        SortMode::Manual => tasks.sort_by(|a, b| manual_order(a, b)),
        SortMode::Ascending(field) => {
            tasks.sort_by(|a, b| manual_order(a, b));
            tasks.sort_by(|a, b| field_order(field, a, b));
        }
        SortMode::Descending(field) => {
            tasks.sort_by(|a, b| manual_order(a, b));
            tasks.sort_by(|a, b| field_order(field, b, a));
        }
    }
}

/// Returns the ids in `status`'s column in manual order, skipping `exclude`.
fn column_ids(tasks: &[Task], status: TaskStatus, exclude: Option<TaskId>) -> Vec<TaskId> {
    let mut column: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.status() == status && Some(task.id()) != exclude)
        .collect();
    sort_column(&mut column, SortMode::Manual);
    column.into_iter().map(Task::id).collect()
}

/// Returns the position a new task takes when appended to `status`.
#[must_use]
pub fn next_position(tasks: &[Task], status: TaskStatus) -> usize {
    tasks.iter().filter(|task| task.status() == status).count()
}

/// Collects placements for `ids` laid out densely in `status`, keeping only
/// those that differ from the current state.
fn changed_placements(tasks: &[Task], status: TaskStatus, ids: &[TaskId]) -> Vec<Placement> {
    ids.iter()
        .enumerate()
        .filter_map(|(position, task_id)| {
            let current = tasks.iter().find(|task| task.id() == *task_id)?;
            let unchanged = current.status() == status && current.position() == position;
            (!unchanged).then_some(Placement {
                task_id: *task_id,
                status,
                position,
            })
        })
        .collect()
}

/// Plans moving `task_id` to `to_index` within the `to` column.
///
/// The task leaves its current column, is inserted at `to_index` (clamped to
/// the end of the destination), and both columns are renumbered densely.
///
/// # Errors
///
/// Returns [`BoardDomainError::TaskNotOnBoard`] if `task_id` is not in
/// `tasks`.
pub fn plan_move(
    tasks: &[Task],
    task_id: TaskId,
    to: TaskStatus,
    to_index: usize,
) -> Result<MovePlan, BoardDomainError> {
    let moving = tasks
        .iter()
        .find(|task| task.id() == task_id)
        .ok_or(BoardDomainError::TaskNotOnBoard(task_id))?;
    let from = moving.status();

    let mut destination = column_ids(tasks, to, Some(task_id));
    let index = to_index.min(destination.len());
    destination.insert(index, task_id);

    let mut changes = changed_placements(tasks, to, &destination);
    if from != to {
        let source = column_ids(tasks, from, Some(task_id));
        changes.extend(changed_placements(tasks, from, &source));
    }

    Ok(MovePlan {
        task_id,
        from,
        to,
        index,
        changes,
    })
}

/// Plans the renumbering of the column `task_id` leaves when it is deleted.
///
/// # Errors
///
/// Returns [`BoardDomainError::TaskNotOnBoard`] if `task_id` is not in
/// `tasks`.
pub fn plan_removal(tasks: &[Task], task_id: TaskId) -> Result<Vec<Placement>, BoardDomainError> {
    let removed = tasks
        .iter()
        .find(|task| task.id() == task_id)
        .ok_or(BoardDomainError::TaskNotOnBoard(task_id))?;
    let remaining = column_ids(tasks, removed.status(), Some(task_id));
    Ok(changed_placements(tasks, removed.status(), &remaining))
}
