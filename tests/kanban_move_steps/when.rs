//! When steps for kanban move BDD scenarios.

use super::world::{KanbanWorld, run_async};
use commit_coach::board::domain::TaskStatus;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"task "{title}" is moved to "{status}" at index {index:usize}"#)]
fn move_task(
    world: &mut KanbanWorld,
    title: String,
    status: String,
    index: usize,
) -> Result<(), eyre::Report> {
    let target = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let task_id = world.task_id(&title)?;
    run_async(world.board()?.move_task(task_id, target, index)).wrap_err("move task")?;
    Ok(())
}

#[when(r#"task "{title}" is advanced"#)]
fn advance_task(world: &mut KanbanWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&title)?;
    run_async(world.board()?.advance_status(task_id)).wrap_err("advance task")?;
    Ok(())
}

#[when(r#"task "{title}" is deleted"#)]
fn delete_task(world: &mut KanbanWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&title)?;
    run_async(world.board()?.delete_task(task_id)).wrap_err("delete task")?;
    Ok(())
}
