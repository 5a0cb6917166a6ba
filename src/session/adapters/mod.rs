//! Adapter implementations for session ports.

pub mod log_notifier;
pub mod memory;

pub use log_notifier::TracingNotifier;
