//! Domain model for the task board.
//!
//! Tasks, subtasks and projects, the status transition rules, the ordering
//! policy and the board projection. Nothing here touches storage or reads
//! the wall clock directly; time arrives through [`mockable::Clock`].

mod due;
mod error;
mod ids;
pub mod ordering;
mod patch;
mod priority;
mod project;
pub mod projection;
mod status;
mod subtask;
mod task;

pub use due::DueState;
pub use error::{BoardDomainError, ParsePriorityError, ParseTaskStatusError};
pub use ids::{ProjectId, ProjectName, SubtaskId, TaskId, TaskTitle};
pub use ordering::{MovePlan, Placement, SortField, SortMode};
pub use patch::TaskPatch;
pub use priority::Priority;
pub use project::{Project, ProjectStats};
pub use projection::{
    BoardColumn, BoardFilter, BoardQuery, BoardSnapshot, BoardView, ColumnSnapshot, DueFilter,
    ProjectionContext,
};
pub use status::TaskStatus;
pub use subtask::{Progress, Subtask};
pub use task::{PersistedTaskData, Task, TaskDraft};
