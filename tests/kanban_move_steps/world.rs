//! Shared world state for kanban move BDD scenarios.

use commit_coach::board::{
    adapters::memory::InMemoryBoardGateway,
    domain::{BoardQuery, BoardSnapshot, TaskId},
    services::BoardService,
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestBoard = BoardService<InMemoryBoardGateway, DefaultClock>;

/// Scenario world for kanban move behaviour tests.
#[derive(Default)]
pub struct KanbanWorld {
    pub gateway: InMemoryBoardGateway,
    pub board: Option<TestBoard>,
}

impl KanbanWorld {
    /// Returns the open board session.
    ///
    /// # Errors
    ///
    /// Returns an error if no board has been opened yet.
    pub fn board(&self) -> Result<&TestBoard, eyre::Report> {
        self.board
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no board opened in scenario world"))
    }

    /// Returns the current board in manual order.
    ///
    /// # Errors
    ///
    /// Returns an error if no board has been opened yet.
    pub fn snapshot(&self) -> Result<BoardSnapshot, eyre::Report> {
        let board = self.board()?;
        Ok(run_async(board.board(&BoardQuery::manual())))
    }

    /// Finds a task by its title.
    ///
    /// # Errors
    ///
    /// Returns an error if no task has that title.
    pub fn task_id(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.snapshot()?
            .columns
            .iter()
            .flat_map(|column| column.tasks.iter())
            .find(|task| task.title().as_str() == title)
            .map(|task| task.id())
            .ok_or_else(|| eyre::eyre!("no task titled {title:?} on the board"))
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> KanbanWorld {
    KanbanWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
