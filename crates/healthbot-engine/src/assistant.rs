//! Turn handling around the response selector.

use tracing::{debug, info};

use healthbot_core::config::{HealthbotConfig, DEFAULT_MAX_MESSAGE_CHARS};
use healthbot_core::error::{HealthbotError, Result};
use healthbot_core::session::ConversationSession;
use healthbot_core::types::Turn;

use crate::selector::ResponseSelector;

/// Validates user input and records each exchange in the caller's session.
pub struct Assistant {
    selector: ResponseSelector,
    max_message_chars: usize,
}

impl Assistant {
    pub fn new(selector: ResponseSelector) -> Self {
        Self {
            selector,
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }

    pub fn with_max_message_chars(mut self, max_message_chars: usize) -> Self {
        self.max_message_chars = max_message_chars;
        self
    }

    pub fn from_config(config: &HealthbotConfig) -> Result<Self> {
        let selector = ResponseSelector::from_config(config)?;
        info!("Assistant initialized");
        Ok(Self::new(selector).with_max_message_chars(config.session.max_message_chars))
    }

    pub fn selector(&self) -> &ResponseSelector {
        &self.selector
    }

    /// Answer one user message.
    ///
    /// Rejected input leaves the session untouched. Accepted input always
    /// adds exactly two turns: the user's message, then the response.
    pub async fn handle_message(
        &self,
        session: &mut ConversationSession,
        message: &str,
    ) -> Result<String> {
        if message.trim().is_empty() {
            return Err(HealthbotError::EmptyUtterance);
        }
        if message.chars().count() > self.max_message_chars {
            return Err(HealthbotError::MessageTooLong(self.max_message_chars));
        }

        session.append(Turn::user(message));
        let response = self.selector.select(message).await;
        session.append(Turn::assistant(response.clone()));

        debug!(session_id = %session.id(), turns = session.len(), "Message handled");
        Ok(response)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use healthbot_core::types::Role;

    use crate::escalation::EscalationPolicy;
    use crate::generator::{GenerationParams, MockTextGenerator};
    use crate::intent::{IntentMatcher, APPOINTMENT_RESPONSE, BOOKING_DETAILS_RESPONSE};
    use crate::sentiment::MockSentimentScorer;

    fn assistant() -> Assistant {
        Assistant::new(ResponseSelector::new(
            IntentMatcher::new(),
            Arc::new(MockSentimentScorer::fixed(0.2)),
            EscalationPolicy::default(),
            Arc::new(MockTextGenerator::replying("Generated advice.")),
            GenerationParams::default(),
        ))
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let mut session = ConversationSession::new();
        let err = assistant().handle_message(&mut session, "").await.unwrap_err();
        assert!(matches!(err, HealthbotError::EmptyUtterance));
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_message_rejected() {
        let mut session = ConversationSession::new();
        let err = assistant()
            .handle_message(&mut session, "  \t\n ")
            .await
            .unwrap_err();
        assert!(matches!(err, HealthbotError::EmptyUtterance));
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_message_too_long_rejected() {
        let mut session = ConversationSession::new();
        let long_msg = "a".repeat(DEFAULT_MAX_MESSAGE_CHARS + 1);
        let err = assistant()
            .handle_message(&mut session, &long_msg)
            .await
            .unwrap_err();
        assert!(matches!(err, HealthbotError::MessageTooLong(2000)));
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_message_at_max_length_ok() {
        let mut session = ConversationSession::new();
        let msg = "a".repeat(DEFAULT_MAX_MESSAGE_CHARS);
        assert!(assistant().handle_message(&mut session, &msg).await.is_ok());
        assert_eq!(session.len(), 2);
    }

    #[tokio::test]
    async fn test_length_counts_characters_not_bytes() {
        let mut session = ConversationSession::new();
        let a = assistant().with_max_message_chars(3);
        assert!(a.handle_message(&mut session, "äöü").await.is_ok());
        assert!(a.handle_message(&mut session, "äöüß").await.is_err());
    }

    #[tokio::test]
    async fn test_turns_alternate_user_assistant() {
        let a = assistant();
        let mut session = ConversationSession::new();
        let messages = ["I need an appointment", "Yes", "how do I stay fit"];

        for msg in messages {
            a.handle_message(&mut session, msg).await.unwrap();
        }

        let history = session.history();
        assert_eq!(history.len(), 2 * messages.len());
        for (i, turn) in history.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            assert_eq!(turn.role(), expected);
        }
        assert_eq!(history[0].content(), "I need an appointment");
        assert_eq!(history[1].content(), APPOINTMENT_RESPONSE);
        assert_eq!(history[3].content(), BOOKING_DETAILS_RESPONSE);
        assert_eq!(history[5].content(), "Generated advice.");
    }

    #[tokio::test]
    async fn test_user_turn_keeps_original_casing() {
        let mut session = ConversationSession::new();
        assistant()
            .handle_message(&mut session, "Tell Me Something")
            .await
            .unwrap();
        assert_eq!(session.history()[0].content(), "Tell Me Something");
    }

    #[tokio::test]
    async fn test_rejection_between_turns_keeps_alternation() {
        let a = assistant();
        let mut session = ConversationSession::new();
        a.handle_message(&mut session, "hello").await.unwrap();
        assert!(a.handle_message(&mut session, " ").await.is_err());
        a.handle_message(&mut session, "health tips").await.unwrap();
        assert_eq!(session.len(), 4);
        assert_eq!(session.history()[2].role(), Role::User);
    }

    #[test]
    fn test_from_config() {
        let mut config = HealthbotConfig::default();
        config.session.max_message_chars = 10;
        let a = Assistant::from_config(&config).unwrap();
        assert_eq!(a.max_message_chars, 10);
        assert_eq!(a.selector().matcher().rules().len(), 6);
    }
}
