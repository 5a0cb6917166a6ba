//! Application services for board task orchestration.

mod board;
mod projection;

pub use board::{BoardError, BoardResult, BoardTaskStore, DragEndEvent, LoadedScope};
pub use projection::TasksByStep;
