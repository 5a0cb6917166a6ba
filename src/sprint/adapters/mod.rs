//! Adapter implementations for sprint persistence ports.

pub mod memory;
