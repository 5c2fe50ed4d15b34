//! In-memory integration tests for project management.

use super::helpers::{gateway, open_board, project_service, seed_tasks};
use commit_coach::board::{
    adapters::memory::InMemoryBoardGateway,
    domain::{BoardQuery, ProjectId, TaskStatus},
    services::{CreateProjectRequest, ProjectServiceError, UpdateProjectRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stats_follow_task_completion(
    gateway: InMemoryBoardGateway,
) -> Result<(), eyre::Report> {
    let (project, board) = open_board(&gateway, "Coach").await?;
    seed_tasks(
        &board,
        &[("A", "todo"), ("B", "todo"), ("C", "in_progress"), ("D", "done")],
    )
    .await?;
    let projects = project_service(&gateway);

    let initial = projects.stats(project.id()).await?;
    eyre::ensure!(initial.task_count == 4 && initial.completed_task_count == 1);
    eyre::ensure!(initial.progress().percent() == 25);

    let c = board
        .board(&BoardQuery::manual())
        .await
        .column(TaskStatus::InProgress)
        .and_then(|column| column.tasks.first().map(|task| task.id()))
        .ok_or_else(|| eyre::eyre!("C should be in progress"))?;
    board.advance_status(c).await?;

    let after = projects.stats(project.id()).await?;
    eyre::ensure!(after.completed_task_count == 2, "stats should be recomputed");
    eyre::ensure!(after.progress().percent() == 50);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn projects_are_listed_oldest_first(
    gateway: InMemoryBoardGateway,
) -> Result<(), eyre::Report> {
    let projects = project_service(&gateway);
    let first = projects
        .create_project(CreateProjectRequest::new("Alpha"))
        .await?;
    let second = projects
        .create_project(CreateProjectRequest::new("Beta").with_description("Second"))
        .await?;

    let listed = projects.list_projects().await?;

    eyre::ensure!(listed.len() == 2, "expected two projects, found {}", listed.len());
    eyre::ensure!(listed.iter().any(|item| item.id() == first.id()));
    eyre::ensure!(listed.iter().any(|item| item.id() == second.id()));
    eyre::ensure!(
        listed
            .windows(2)
            .all(|pair| pair.first().map(|item| item.created_at())
                <= pair.last().map(|item| item.created_at())),
        "projects should be ordered by creation time"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_updates_validate_and_persist(
    gateway: InMemoryBoardGateway,
) -> Result<(), eyre::Report> {
    let projects = project_service(&gateway);
    let project = projects
        .create_project(CreateProjectRequest::new("Alpha"))
        .await?;

    let blank = projects
        .update_project(project.id(), UpdateProjectRequest::new().with_name("  "))
        .await;
    eyre::ensure!(matches!(blank, Err(ProjectServiceError::Domain(_))));

    let renamed = projects
        .update_project(
            project.id(),
            UpdateProjectRequest::new()
                .with_name("Alpha 2")
                .with_description("Renamed"),
        )
        .await?;
    let stored = projects.find_project(project.id()).await?;
    eyre::ensure!(stored.as_ref() == Some(&renamed));
    eyre::ensure!(renamed.name().as_str() == "Alpha 2");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_removes_its_board(
    gateway: InMemoryBoardGateway,
) -> Result<(), eyre::Report> {
    let (project, board) = open_board(&gateway, "Doomed").await?;
    seed_tasks(&board, &[("A", "todo")]).await?;
    let projects = project_service(&gateway);

    projects.delete_project(project.id()).await?;

    eyre::ensure!(projects.find_project(project.id()).await?.is_none());
    eyre::ensure!(board.load().await? == 0, "tasks should be deleted with the project");
    let missing = projects.stats(project.id()).await;
    eyre::ensure!(matches!(missing, Err(ProjectServiceError::NotFound(_))));
    let unknown = projects.delete_project(ProjectId::new()).await;
    eyre::ensure!(matches!(unknown, Err(ProjectServiceError::NotFound(_))));
    Ok(())
}
