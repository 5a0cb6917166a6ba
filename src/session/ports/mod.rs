//! Port contracts for session collaborators.

pub mod notifier;
pub mod preferences;

#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::Notifier;
#[cfg(test)]
pub use preferences::MockPreferenceStore;
pub use preferences::{PreferenceStore, PreferenceStoreError, PreferenceStoreResult};
