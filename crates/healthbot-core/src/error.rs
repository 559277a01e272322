use thiserror::Error;

/// Top-level error type for the Healthbot system.
///
/// Adapter crates define their own error types where they need a richer
/// taxonomy and implement `From<SubsystemError> for HealthbotError` so that
/// the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HealthbotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Utterance cannot be empty")]
    EmptyUtterance,

    #[error("Utterance exceeds maximum length of {0} characters")]
    MessageTooLong(usize),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Speech error: {0}")]
    Speech(String),
}

impl From<toml::de::Error> for HealthbotError {
    fn from(err: toml::de::Error) -> Self {
        HealthbotError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for HealthbotError {
    fn from(err: toml::ser::Error) -> Self {
        HealthbotError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for HealthbotError {
    fn from(err: serde_json::Error) -> Self {
        HealthbotError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Healthbot operations.
pub type Result<T> = std::result::Result<T, HealthbotError>;
