//! Healthbot speech crate - speech-to-text and text-to-speech adapters.
//!
//! Provides trait-based abstractions for listening and speaking, adapters
//! that delegate to external programs, a scoped voice session, and mock
//! implementations for testing without audio hardware.

pub mod command;
pub mod mock;
pub mod session;

use std::future::Future;
use std::time::Duration;

use healthbot_core::error::HealthbotError;

pub use command::{CommandRecognizer, CommandSynthesizer};
pub use mock::{MockRecognizer, MockSynthesizer};
pub use session::VoiceSession;

/// Shown (and spoken) when nothing intelligible was heard.
pub const UNRECOGNIZED_MESSAGE: &str = "Sorry, I couldn't understand your speech.";
/// Shown (and spoken) when the recognition backend itself failed.
pub const SERVICE_ERROR_MESSAGE: &str = "Error with speech recognition service.";
pub const SYNTHESIS_ERROR_MESSAGE: &str = "Text-to-speech is unavailable.";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    /// Audio was captured but no transcript came out of it.
    #[error("speech not recognized")]
    Unrecognized,

    #[error("speech recognition service error: {0}")]
    ServiceError(String),

    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("voice session is closed")]
    SessionClosed,
}

impl SpeechError {
    /// Fixed message for the user; never includes backend details.
    pub fn user_message(&self) -> &'static str {
        match self {
            SpeechError::Unrecognized => UNRECOGNIZED_MESSAGE,
            SpeechError::ServiceError(_) => SERVICE_ERROR_MESSAGE,
            SpeechError::Synthesis(_) | SpeechError::SessionClosed => SYNTHESIS_ERROR_MESSAGE,
        }
    }
}

impl From<SpeechError> for HealthbotError {
    fn from(err: SpeechError) -> Self {
        HealthbotError::Speech(err.to_string())
    }
}

// =============================================================================
// Traits
// =============================================================================

/// Captures one spoken utterance and returns its transcript.
pub trait SpeechInput: Send + Sync {
    /// Wait up to `timeout` for speech to start. Finishing the utterance
    /// and transcribing it may take longer.
    ///
    /// # Errors
    /// `SpeechError::Unrecognized` when nothing intelligible was heard in
    /// time, `SpeechError::ServiceError` when the recognizer could not run.
    fn listen(
        &self,
        timeout: Duration,
    ) -> impl Future<Output = Result<String, SpeechError>> + Send;
}

/// Plays text as speech, returning once playback has finished.
pub trait SpeechOutput: Send + Sync {
    fn speak(&self, text: &str) -> impl Future<Output = Result<(), SpeechError>> + Send;
}

// =============================================================================
// Tests
// =============================================================================
