use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Author of a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Text typed or spoken by the person using the assistant.
    User,
    /// Text produced by the response selector.
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

// =============================================================================
// Turn
// =============================================================================

/// One role-tagged message in a conversation session.
///
/// Fields are private so a turn cannot be edited after it has been recorded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
    timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a turn stamped with the current time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

// =============================================================================
// SentimentScore
// =============================================================================

/// Compound polarity of one utterance, always within `[-1.0, 1.0]`.
///
/// Derived fresh for every utterance and never stored.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct SentimentScore(f64);

impl SentimentScore {
    /// Neutral score (0.0).
    pub const NEUTRAL: SentimentScore = SentimentScore(0.0);

    /// Create a score, clamping into `[-1.0, 1.0]`. NaN maps to neutral.
    pub fn new(compound: f64) -> Self {
        if compound.is_nan() {
            return Self::NEUTRAL;
        }
        Self(compound.clamp(-1.0, 1.0))
    }

    pub fn compound(&self) -> f64 {
        self.0
    }
}

impl Default for SentimentScore {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for SentimentScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
