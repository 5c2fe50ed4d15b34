//! Board projection: tasks grouped into status columns for display.

use super::{DueState, Priority, SortMode, Task, TaskStatus, ordering::sort_column};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Deadline filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueFilter {
    /// Only overdue tasks.
    Overdue,
    /// Only tasks due within the due-soon window.
    DueSoon,
    /// Only tasks with no deadline.
    NoDeadline,
    /// Only tasks with a deadline.
    HasDeadline,
}

impl DueFilter {
    const fn accepts(self, state: DueState) -> bool {
        match self {
            Self::Overdue => matches!(state, DueState::Overdue),
            Self::DueSoon => matches!(state, DueState::DueSoon),
            Self::NoDeadline => matches!(state, DueState::NoDeadline),
            Self::HasDeadline => !matches!(state, DueState::NoDeadline),
        }
    }
}

/// Task filters. Every set filter must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardFilter {
    /// Case-insensitive text matched against title and description.
    pub search: Option<String>,
    /// Restrict to one status.
    pub status: Option<TaskStatus>,
    /// Restrict to one priority.
    pub priority: Option<Priority>,
    /// Restrict by deadline state.
    pub due: Option<DueFilter>,
}

impl BoardFilter {
    /// Returns a filter with a search query.
    #[must_use]
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    /// Returns a filter restricted to `status`.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns a filter restricted to `priority`.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns a filter restricted by deadline state.
    #[must_use]
    pub const fn with_due(mut self, due: DueFilter) -> Self {
        self.due = Some(due);
        self
    }

    fn needle(&self) -> String {
        self.search
            .as_deref()
            .map(|query| query.trim().to_lowercase())
            .unwrap_or_default()
    }

    fn accepts(
        &self,
        task: &Task,
        needle: &str,
        now: DateTime<Utc>,
        due_soon_window: TimeDelta,
    ) -> bool {
        self.status.is_none_or(|status| task.status() == status)
            && self.priority.is_none_or(|priority| task.priority() == priority)
            && self
                .due
                .is_none_or(|due| due.accepts(task.due_state(now, due_soon_window)))
            && task.matches_search(needle)
    }
}

/// Sort and filter settings for a projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardQuery {
    /// Order within each column.
    pub sort: SortMode,
    /// Filters applied before grouping.
    pub filter: BoardFilter,
}

impl BoardQuery {
    /// Returns a query with manual ordering and no filters.
    #[must_use]
    pub fn manual() -> Self {
        Self {
            sort: SortMode::Manual,
            filter: BoardFilter::default(),
        }
    }
}

/// Read-only projection context: clock reading and collapse state.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionContext<'a> {
    /// Instant used for deadline classification.
    pub now: DateTime<Utc>,
    /// Window used for the due-soon classification.
    pub due_soon_window: TimeDelta,
    /// Columns the user has collapsed.
    pub collapsed: &'a BTreeSet<TaskStatus>,
}

/// One column of a borrowed board view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn<'a> {
    /// Column status.
    pub status: TaskStatus,
    /// Ephemeral UI expansion state.
    pub expanded: bool,
    /// Tasks in display order.
    pub tasks: Vec<&'a Task>,
}

/// Borrowed board view with one column per status in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView<'a> {
    columns: Vec<BoardColumn<'a>>,
}

impl<'a> BoardView<'a> {
    /// Returns all columns in display order.
    #[must_use]
    pub fn columns(&self) -> &[BoardColumn<'a>] {
        &self.columns
    }

    /// Returns the column for `status`.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> Option<&BoardColumn<'a>> {
        self.columns.iter().find(|column| column.status == status)
    }

    /// Returns the number of tasks across all columns.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|column| column.tasks.len()).sum()
    }

    /// Clones the view into an owned snapshot.
    #[must_use]
    pub fn to_snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            columns: self
                .columns
                .iter()
                .map(|column| ColumnSnapshot {
                    status: column.status,
                    expanded: column.expanded,
                    tasks: column.tasks.iter().map(|task| (*task).clone()).collect(),
                })
                .collect(),
        }
    }
}

/// Owned column snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    /// Column status.
    pub status: TaskStatus,
    /// Ephemeral UI expansion state.
    pub expanded: bool,
    /// Tasks in display order.
    pub tasks: Vec<Task>,
}

impl ColumnSnapshot {
    /// Returns the titles in display order.
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.title().as_str()).collect()
    }
}

/// Owned board snapshot, detached from the task collection it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Columns in display order.
    pub columns: Vec<ColumnSnapshot>,
}

impl BoardSnapshot {
    /// Returns the column for `status`.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> Option<&ColumnSnapshot> {
        self.columns.iter().find(|column| column.status == status)
    }

    /// Returns the number of tasks across all columns.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|column| column.tasks.len()).sum()
    }
}

/// Groups, filters and sorts `tasks` into board columns.
///
/// Pure: the result depends only on the arguments.
#[must_use]
pub fn project_board<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    query: &BoardQuery,
    context: ProjectionContext<'_>,
) -> BoardView<'a> {
    let needle = query.filter.needle();
    let visible: Vec<&'a Task> = tasks
        .into_iter()
        .filter(|task| {
            query
                .filter
                .accepts(task, &needle, context.now, context.due_soon_window)
        })
        .collect();

    let columns = TaskStatus::ALL
        .into_iter()
        .map(|status| {
            let mut column_tasks: Vec<&'a Task> = visible
                .iter()
                .copied()
                .filter(|task| task.status() == status)
                .collect();
            sort_column(&mut column_tasks, query.sort);
            BoardColumn {
                status,
                expanded: !context.collapsed.contains(&status),
                tasks: column_tasks,
            }
        })
        .collect();

    BoardView { columns }
}
