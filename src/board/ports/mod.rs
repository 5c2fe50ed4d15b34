//! Port contracts for the task board.
//!
//! The gateway ports are the boundary to the external data store. Services
//! depend on these traits only.

pub mod gateway;

pub use gateway::{
    GatewayError, GatewayResult, ProjectGateway, RecordRef, TaskFilter, TaskGateway,
};
