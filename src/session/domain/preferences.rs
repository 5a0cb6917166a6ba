//! Selections remembered between board sessions.

use crate::sprint::domain::SprintId;
use crate::workspace::domain::WorkspaceId;
use serde::{Deserialize, Serialize};

/// The workspace and sprint a user last looked at.
///
/// `sprint` is `None` for the backlog view or for Kanban workspaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPreferences {
    /// Last opened workspace.
    pub workspace: Option<WorkspaceId>,
    /// Last opened sprint within that workspace.
    pub sprint: Option<SprintId>,
}

impl SessionPreferences {
    /// Remembers a workspace and optional sprint.
    #[must_use]
    pub const fn new(workspace: WorkspaceId, sprint: Option<SprintId>) -> Self {
        Self {
            workspace: Some(workspace),
            sprint,
        }
    }
}
