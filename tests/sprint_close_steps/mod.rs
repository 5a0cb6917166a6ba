//! Step definitions for sprint close scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
