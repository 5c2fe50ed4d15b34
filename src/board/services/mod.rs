//! Application services for the task board.

mod board;
mod project;
pub mod state;

pub use board::{
    BoardService, BoardServiceError, BoardServiceResult, CreateTaskRequest,
    UpdateTaskFieldsRequest,
};
pub use project::{
    CreateProjectRequest, ProjectService, ProjectServiceError, ProjectServiceResult,
    UpdateProjectRequest,
};
pub use state::{BoardAction, BoardState};
