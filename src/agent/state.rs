//! Per-turn state carried through the orchestration machine

use std::path::PathBuf;

use crate::agent::Intent;
use crate::providers::Message;

/// Mutable state for one turn of the agent
///
/// Holds the accumulated conversation plus the routing decision and any
/// document paths involved in this turn. History is restored from the
/// checkpoint store at the start of a turn; a fresh session starts empty.
#[derive(Debug, Clone, Default)]
pub struct TurnState {
    /// Accumulated conversation, oldest first
    pub messages: Vec<Message>,
    /// Routing label, unset until the router runs (or the convert command
    /// forces it)
    pub intent: Option<Intent>,
    /// Source document path for document turns
    pub source_path: Option<PathBuf>,
    /// CSV artifact produced this turn, if any
    pub artifact_path: Option<PathBuf>,
}

impl TurnState {
    /// Create turn state seeded with checkpointed history
    pub fn with_history(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// The content of the most recent user-originated message
    pub fn latest_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_user())
            .map(|m| m.content.as_str())
    }
}
