//! Shared fixtures for in-memory board integration tests.

use std::sync::Arc;

use commit_coach::board::{
    adapters::memory::InMemoryBoardGateway,
    domain::{BoardQuery, Project, TaskStatus},
    services::{BoardService, CreateProjectRequest, CreateTaskRequest, ProjectService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Board service type used across in-memory integration tests.
pub type TestBoard = BoardService<InMemoryBoardGateway, DefaultClock>;

/// Project service type used across in-memory integration tests.
pub type TestProjects = ProjectService<InMemoryBoardGateway, DefaultClock>;

/// Provides a fresh in-memory gateway for each test.
#[fixture]
pub fn gateway() -> InMemoryBoardGateway {
    InMemoryBoardGateway::new()
}

/// Builds a project service over `gateway`.
#[must_use]
pub fn project_service(gateway: &InMemoryBoardGateway) -> TestProjects {
    ProjectService::new(Arc::new(gateway.clone()), Arc::new(DefaultClock))
}

/// Creates a project and returns a loaded board session for it.
///
/// # Errors
///
/// Returns an error if the project cannot be created or the board cannot be
/// loaded.
pub async fn open_board(
    gateway: &InMemoryBoardGateway,
    name: &str,
) -> Result<(Project, TestBoard), eyre::Report> {
    let project = project_service(gateway)
        .create_project(CreateProjectRequest::new(name))
        .await?;
    let board = BoardService::new(
        Arc::new(gateway.clone()),
        Arc::new(DefaultClock),
        project.id(),
    );
    board.load().await?;
    Ok((project, board))
}

/// Creates one task per `(title, status)` pair, in order.
///
/// # Errors
///
/// Returns the first creation failure.
pub async fn seed_tasks(board: &TestBoard, tasks: &[(&str, &str)]) -> Result<(), eyre::Report> {
    for (title, status) in tasks {
        board
            .create_task(CreateTaskRequest::new(*title).with_status(*status))
            .await?;
    }
    Ok(())
}

/// Returns a column's titles in manual order.
pub async fn column_titles(board: &TestBoard, status: TaskStatus) -> Vec<String> {
    board
        .board(&BoardQuery::manual())
        .await
        .column(status)
        .map(|column| column.titles().into_iter().map(str::to_owned).collect())
        .unwrap_or_default()
}
