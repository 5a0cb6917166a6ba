//! Session-level values: users, remembered selections, and notices.

mod ids;
mod notice;
mod preferences;

pub use ids::UserId;
pub use notice::{Notice, NoticeLevel};
pub use preferences::SessionPreferences;
