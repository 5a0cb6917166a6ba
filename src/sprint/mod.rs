//! Sprint lifecycle for Scrum workspaces.
//!
//! Sprints move from planning to active to closed, and a workspace has at
//! most one active sprint. Closing a sprint relocates its unfinished tasks
//! to the backlog or to another open sprint through
//! [`services::SprintCloseMigrator`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
