//! Adapter implementations for epic persistence ports.

pub mod memory;
