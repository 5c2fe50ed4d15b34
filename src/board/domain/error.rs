//! Error types for board domain validation and parsing.

use super::{SubtaskId, TaskId, TaskStatus};
use thiserror::Error;

/// Validation errors raised by board domain values and aggregates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The task or subtask title is empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,

    /// The title exceeds the configured maximum length.
    #[error("title is {length} characters, maximum is {max}")]
    TitleTooLong {
        /// Title length in characters.
        length: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The status value is not part of the canonical enumeration.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),

    /// The priority value is not part of the canonical enumeration.
    #[error(transparent)]
    InvalidPriority(#[from] ParsePriorityError),

    /// The subtask does not belong to the task.
    #[error("subtask {subtask_id} not found on task {task_id}")]
    SubtaskNotFound {
        /// Owning task.
        task_id: TaskId,
        /// Missing subtask.
        subtask_id: SubtaskId,
    },

    /// A position index is outside the sequence it addresses.
    #[error("position {index} out of range for {len} items")]
    PositionOutOfRange {
        /// Requested index.
        index: usize,
        /// Sequence length.
        len: usize,
    },

    /// The transition policy rejects the status change.
    #[error("task {task_id} cannot move from {from} to {to}")]
    TransitionNotAllowed {
        /// Task being transitioned.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// The task is not part of the collection being reordered.
    #[error("task {0} is not on the board")]
    TaskNotOnBoard(TaskId),
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParsePriorityError(pub String);
