//! Application services for board sessions.

mod board;
mod view;

pub use board::{
    BoardSession, BoardSessionError, BoardSessionPorts, BoardSessionResult, SprintTransition,
};
pub use view::{BoardColumn, BoardView};
