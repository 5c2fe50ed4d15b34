//! In-memory integration tests for board sessions.

use std::sync::Arc;

use super::helpers::{column_titles, gateway, open_board, seed_tasks};
use chrono::{TimeDelta, Utc};
use commit_coach::board::{
    adapters::memory::InMemoryBoardGateway,
    domain::{BoardFilter, BoardQuery, DueFilter, SortField, SortMode, TaskStatus},
    services::{BoardService, CreateTaskRequest, UpdateTaskFieldsRequest},
};
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moves_survive_a_fresh_session(
    gateway: InMemoryBoardGateway,
) -> Result<(), eyre::Report> {
    let (project, board) = open_board(&gateway, "Coach").await?;
    seed_tasks(
        &board,
        &[
            ("T1", "todo"),
            ("T2", "in_progress"),
            ("T3", "in_progress"),
            ("T4", "todo"),
        ],
    )
    .await?;
    let t1 = board
        .board(&BoardQuery::manual())
        .await
        .column(TaskStatus::Todo)
        .and_then(|column| column.tasks.first().map(|task| task.id()))
        .ok_or_else(|| eyre::eyre!("todo column should start with T1"))?;

    board.move_task(t1, TaskStatus::InProgress, 1).await?;

    let reopened = BoardService::new(
        Arc::new(gateway.clone()),
        Arc::new(DefaultClock),
        project.id(),
    );
    let loaded = reopened.load().await?;
    eyre::ensure!(loaded == 4, "expected four tasks, loaded {loaded}");
    eyre::ensure!(
        column_titles(&reopened, TaskStatus::InProgress).await == ["T2", "T1", "T3"],
        "in-progress column out of order"
    );
    eyre::ensure!(column_titles(&reopened, TaskStatus::Todo).await == ["T4"]);
    let snapshot = reopened.board(&BoardQuery::manual()).await;
    for column in &snapshot.columns {
        for (expected, task) in column.tasks.iter().enumerate() {
            eyre::ensure!(
                task.position() == expected,
                "{} has position {} in {}",
                task.title().as_str(),
                task.position(),
                column.status
            );
        }
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_closes_the_gap_in_storage(
    gateway: InMemoryBoardGateway,
) -> Result<(), eyre::Report> {
    let (_project, board) = open_board(&gateway, "Coach").await?;
    seed_tasks(&board, &[("A", "todo"), ("B", "todo"), ("C", "todo")]).await?;
    let snapshot = board.board(&BoardQuery::manual()).await;
    let ids: Vec<_> = snapshot
        .column(TaskStatus::Todo)
        .map(|column| column.tasks.iter().map(|task| task.id()).collect())
        .unwrap_or_default();
    let (Some(&a), Some(&c)) = (ids.first(), ids.last()) else {
        return Err(eyre::eyre!("expected three todo tasks"));
    };

    board.delete_task(a).await?;

    eyre::ensure!(column_titles(&board, TaskStatus::Todo).await == ["B", "C"]);
    let stored = board
        .task(c)
        .await
        .ok_or_else(|| eyre::eyre!("C should remain on the board"))?;
    eyre::ensure!(stored.position() == 1, "C should move up to position 1");
    let deleted_again = board.delete_task(a).await;
    eyre::ensure!(deleted_again.is_err(), "second delete should fail");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filters_and_sorting_combine(gateway: InMemoryBoardGateway) -> Result<(), eyre::Report> {
    let (_project, board) = open_board(&gateway, "Coach").await?;
    let yesterday = Utc::now() - TimeDelta::days(1);
    board
        .create_task(
            CreateTaskRequest::new("Fix flaky CI")
                .with_priority("high")
                .with_due_date(yesterday),
        )
        .await?;
    board
        .create_task(
            CreateTaskRequest::new("Update docs")
                .with_description("Mention the CI badge")
                .with_priority("low"),
        )
        .await?;
    board
        .create_task(CreateTaskRequest::new("Refactor parser").with_priority("high"))
        .await?;

    let by_priority = BoardQuery {
        sort: SortMode::Descending(SortField::Priority),
        filter: BoardFilter::default(),
    };
    let sorted = board.board(&by_priority).await;
    let sorted_titles = sorted
        .column(TaskStatus::Todo)
        .map(|column| column.titles())
        .unwrap_or_default();
    eyre::ensure!(
        sorted_titles == ["Fix flaky CI", "Refactor parser", "Update docs"],
        "unexpected order {sorted_titles:?}"
    );

    let searched = board
        .board(&BoardQuery {
            filter: BoardFilter::default().with_search("ci"),
            ..BoardQuery::manual()
        })
        .await;
    eyre::ensure!(searched.task_count() == 2, "search should match title and description");

    let overdue = board
        .board(&BoardQuery {
            filter: BoardFilter::default()
                .with_search("ci")
                .with_due(DueFilter::Overdue),
            ..BoardQuery::manual()
        })
        .await;
    eyre::ensure!(overdue.task_count() == 1, "filters should combine with AND");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn field_updates_are_persisted(
    gateway: InMemoryBoardGateway,
) -> Result<(), eyre::Report> {
    let (project, board) = open_board(&gateway, "Coach").await?;
    let created = board
        .create_task(CreateTaskRequest::new("Draft").with_description("First pass"))
        .await?;

    let updated = board
        .update_task_fields(
            created.id(),
            UpdateTaskFieldsRequest::new()
                .with_title("Final draft")
                .clear_description()
                .with_priority("high"),
        )
        .await?;

    eyre::ensure!(updated.title().as_str() == "Final draft");
    eyre::ensure!(updated.description().is_none());
    eyre::ensure!(updated.status() == TaskStatus::Todo, "status must not change");
    let reopened = BoardService::new(Arc::new(gateway), Arc::new(DefaultClock), project.id());
    reopened.load().await?;
    eyre::ensure!(reopened.task(created.id()).await == Some(updated));
    Ok(())
}
