//! Step definitions for kanban move scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
