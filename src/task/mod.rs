//! Board tasks and the client-side board cache.
//!
//! A task flows through its workspace pipeline one step at a time. This
//! module models the task record, the task-persistence port, and the
//! [`services::BoardTaskStore`] that keeps an optimistic, rollback-capable
//! projection of tasks for the board UI:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
