//! Then steps for kanban move BDD scenarios.

use super::world::{KanbanWorld, run_async};
use commit_coach::board::domain::TaskStatus;
use rstest_bdd_macros::then;

fn parse_status(raw: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(raw).map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))
}

fn column_titles(world: &KanbanWorld, status: &str) -> Result<Vec<String>, eyre::Report> {
    let parsed = parse_status(status)?;
    let snapshot = world.snapshot()?;
    let column = snapshot
        .column(parsed)
        .ok_or_else(|| eyre::eyre!("board has no {parsed} column"))?;
    Ok(column.titles().into_iter().map(str::to_owned).collect())
}

#[then(r#"the "{status}" column reads "{titles}""#)]
fn column_reads(
    world: &KanbanWorld,
    status: String,
    titles: String,
) -> Result<(), eyre::Report> {
    let expected: Vec<&str> = titles.split(',').map(str::trim).collect();
    let actual = column_titles(world, &status)?;
    if actual != expected {
        return Err(eyre::eyre!(
            "expected {status} column {expected:?}, found {actual:?}"
        ));
    }
    Ok(())
}

#[then(r#"the "{status}" column is empty"#)]
fn column_is_empty(world: &KanbanWorld, status: String) -> Result<(), eyre::Report> {
    let actual = column_titles(world, &status)?;
    if !actual.is_empty() {
        return Err(eyre::eyre!("expected empty {status} column, found {actual:?}"));
    }
    Ok(())
}

#[then("positions in every column are dense")]
fn positions_are_dense(world: &KanbanWorld) -> Result<(), eyre::Report> {
    let snapshot = world.snapshot()?;
    for column in &snapshot.columns {
        let positions: Vec<usize> = column.tasks.iter().map(|task| task.position()).collect();
        let expected: Vec<usize> = (0..positions.len()).collect();
        if positions != expected {
            return Err(eyre::eyre!(
                "{} column has positions {positions:?}",
                column.status
            ));
        }
    }
    Ok(())
}

#[then(r#"task "{title}" has status "{status}""#)]
fn task_has_status(
    world: &KanbanWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    let task_id = world.task_id(&title)?;
    let task = run_async(world.board()?.task(task_id))
        .ok_or_else(|| eyre::eyre!("task {title:?} missing from the board"))?;
    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected {title} to be {expected}, found {}",
            task.status()
        ));
    }
    Ok(())
}
