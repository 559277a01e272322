//! Conversation session: the ordered, append-only turn log owned by the
//! interactive front-end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Turn;

/// Ordered log of turns for one interactive session.
///
/// Turns are only ever appended. The whole log is cleared at once by
/// [`ConversationSession::reset`]; individual turns are never removed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    turns: Vec<Turn>,
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Append a turn to the end of the log.
    pub fn append(&mut self, turn: Turn) {
        tracing::trace!(session = %self.id, role = %turn.role(), "Turn appended");
        self.turns.push(turn);
    }

    /// All turns in the order they were appended.
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Clear every turn. The session keeps its id.
    pub fn reset(&mut self) {
        tracing::debug!(session = %self.id, cleared = self.turns.len(), "Session reset");
        self.turns.clear();
    }
}
