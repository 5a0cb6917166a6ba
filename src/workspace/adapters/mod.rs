//! Adapter implementations for workspace configuration ports.

pub mod memory;
