//! In-memory gateway adapter.

mod gateway;

pub use gateway::InMemoryBoardGateway;
