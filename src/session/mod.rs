//! Board sessions: the UI-facing entry point.
//!
//! A [`services::BoardSession`] ties one user's view of a workspace board to
//! the board cache, the sprint lifecycle, remembered preferences, and
//! user-facing notices.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
