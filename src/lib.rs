//! Commit Coach: task and project board core.
//!
//! This crate holds the domain logic behind the Commit Coach kanban board:
//! the task model, status transitions, column ordering, the board
//! projection, and the services that keep an in-memory board consistent
//! with an external data store.
//!
//! # Architecture
//!
//! Commit Coach follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`board`]: Tasks, projects, ordering and board sessions

pub mod board;
