//! Workspace configuration and step pipelines.
//!
//! A workspace owns the ordered list of steps that forms its board columns
//! and declares whether it runs Scrum or Kanban. The board core consumes this
//! configuration read-only:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
