//! Given steps for kanban move BDD scenarios.

use std::sync::Arc;

use super::world::{KanbanWorld, run_async};
use commit_coach::board::services::{
    BoardService, CreateProjectRequest, CreateTaskRequest, ProjectService,
};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;

#[given(r#"a board for project "{name}""#)]
fn board_for_project(world: &mut KanbanWorld, name: String) -> Result<(), eyre::Report> {
    let projects = ProjectService::new(Arc::new(world.gateway.clone()), Arc::new(DefaultClock));
    let project = run_async(projects.create_project(CreateProjectRequest::new(name)))
        .wrap_err("create project for board scenario")?;
    let board = BoardService::new(
        Arc::new(world.gateway.clone()),
        Arc::new(DefaultClock),
        project.id(),
    );
    run_async(board.load()).wrap_err("load board for scenario")?;
    world.board = Some(board);
    Ok(())
}

#[given(r#"task "{title}" in column "{status}""#)]
fn task_in_column(
    world: &mut KanbanWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let board = world.board()?;
    run_async(board.create_task(CreateTaskRequest::new(title).with_status(status)))
        .wrap_err("create task in scenario setup")?;
    Ok(())
}
