//! Sprintboard: sprint lifecycle and board task orchestration.
//!
//! This crate holds the core of a project board: workspaces whose step
//! pipeline defines the board columns, tasks moved between those columns,
//! and Scrum sprints that are planned, activated, and closed.
//!
//! # Architecture
//!
//! Sprintboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and notification
//! - **Adapters**: In-memory implementations of the ports
//! - **Services**: Orchestration over the ports
//!
//! # Modules
//!
//! - [`workspace`]: Workspaces, steps, and the ordered step pipeline
//! - [`task`]: Task records and the optimistic board cache
//! - [`epic`]: Epics and the epic/task association guard
//! - [`sprint`]: Sprint state machine and close-time task migration
//! - [`session`]: The UI-facing board session
//! - [`config`]: Environment-driven configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod epic;
pub mod session;
pub mod sprint;
pub mod task;
pub mod telemetry;
pub mod workspace;
