//! In-memory session adapters.

mod notifier;
mod preferences;

pub use notifier::RecordingNotifier;
pub use preferences::InMemoryPreferenceStore;
