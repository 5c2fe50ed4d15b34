//! Kanban task board for Commit Coach.
//!
//! Tasks move between status columns, are ordered within them, and are
//! persisted through an external data store. The module follows hexagonal
//! architecture:
//!
//! - Domain types, transition rules, ordering policy and projection in
//!   [`domain`]
//! - Gateway contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Session and project services in [`services`]
//! - Service configuration in [`config`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
