use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HealthbotError, Result};

/// Compound sentiment below which the escalation message is returned.
pub const DEFAULT_ESCALATION_THRESHOLD: f64 = -0.3;

/// Token cap requested from the generative model.
pub const DEFAULT_MAX_LENGTH: usize = 100;

/// Number of candidates requested from the generative model. Fixed: the
/// first candidate is always the answer.
pub const NUM_RETURN_SEQUENCES: usize = 1;

/// Speech capture listen window in seconds.
pub const DEFAULT_LISTEN_TIMEOUT_SECS: u64 = 5;

/// Extra time a recognizer gets past the listen window to finish the
/// utterance and transcribe it.
pub const DEFAULT_TRANSCRIBE_TIMEOUT_SECS: u64 = 10;

/// Longest utterance accepted by the assistant, in characters.
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 2000;

pub const DEFAULT_ESCALATION_MESSAGE: &str =
    "It seems like you're feeling unwell or concerned. Please seek professional help if needed.";

pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "I'm sorry, I couldn't come up with a response right now. Please try again.";

/// Top-level configuration for the Healthbot application.
///
/// Loaded from `~/.healthbot/config.toml` by default. Every section falls
/// back to its defaults when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthbotConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub escalation: EscalationConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl HealthbotConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HealthbotConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| HealthbotError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Sentiment-triggered escalation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Escalate when the compound score is strictly below this value.
    pub threshold: f64,
    /// Message returned on escalation.
    pub message: String,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_ESCALATION_THRESHOLD,
            message: DEFAULT_ESCALATION_MESSAGE.to_string(),
        }
    }
}

/// Lexicon sentiment scorer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Path to a VADER-format lexicon. Empty uses the bundled VADER lexicon.
    pub lexicon_path: String,
}

/// Generative fallback model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Text-generation endpoint URL.
    pub endpoint: String,
    /// Bearer token sent with each request. Empty sends none.
    pub api_token: String,
    /// Maximum length of the generated sequence in tokens.
    pub max_length: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Remove the prompt when the model echoes it at the start of its output.
    pub strip_echoed_prompt: bool,
    /// Apology returned when generation fails.
    pub fallback_message: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/models/distilgpt2".to_string(),
            api_token: String::new(),
            max_length: DEFAULT_MAX_LENGTH,
            timeout_secs: 30,
            strip_echoed_prompt: false,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Speech input and output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Speak every response aloud.
    pub voice_output: bool,
    /// Listen window for speech capture in seconds.
    pub listen_timeout_secs: u64,
    /// Grace period after the listen window before the recognizer is killed.
    pub transcribe_timeout_secs: u64,
    /// Recognizer program and arguments. Empty disables speech input.
    pub recognizer_command: Vec<String>,
    /// Synthesizer program and arguments; the text is appended last.
    pub synthesizer_command: Vec<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voice_output: false,
            listen_timeout_secs: DEFAULT_LISTEN_TIMEOUT_SECS,
            transcribe_timeout_secs: DEFAULT_TRANSCRIBE_TIMEOUT_SECS,
            recognizer_command: Vec::new(),
            synthesizer_command: vec!["espeak".to_string()],
        }
    }
}

/// Caller-side session limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum utterance length in characters.
    pub max_message_chars: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = HealthbotConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert!((config.escalation.threshold - -0.3).abs() < f64::EPSILON);
        assert_eq!(config.escalation.message, DEFAULT_ESCALATION_MESSAGE);
        assert!(config.sentiment.lexicon_path.is_empty());
        assert_eq!(config.generation.max_length, 100);
        assert_eq!(config.generation.timeout_secs, 30);
        assert!(!config.generation.strip_echoed_prompt);
        assert_eq!(config.generation.fallback_message, DEFAULT_FALLBACK_MESSAGE);
        assert!(!config.speech.voice_output);
        assert_eq!(config.speech.listen_timeout_secs, 5);
        assert_eq!(config.speech.transcribe_timeout_secs, 10);
        assert!(config.speech.recognizer_command.is_empty());
        assert_eq!(config.speech.synthesizer_command, vec!["espeak"]);
        assert_eq!(config.session.max_message_chars, 2000);
    }

    #[test]
    fn test_num_return_sequences_is_one() {
        assert_eq!(NUM_RETURN_SEQUENCES, 1);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[escalation]
threshold = -0.5
message = "Please talk to someone you trust."

[sentiment]
lexicon_path = "/opt/lexicons/vader.txt"

[generation]
endpoint = "http://localhost:9000/generate"
api_token = "hf_test"
max_length = 64
timeout_secs = 10
strip_echoed_prompt = true
fallback_message = "Try again later."

[speech]
voice_output = true
listen_timeout_secs = 8
transcribe_timeout_secs = 20
recognizer_command = ["healthbot-listen", "--lang", "en"]
synthesizer_command = ["say"]

[session]
max_message_chars = 500
"#;
        let file = create_temp_config(content);
        let config = HealthbotConfig::load(file.path()).unwrap();

        assert_eq!(config.general.log_level, "debug");
        assert!((config.escalation.threshold - -0.5).abs() < f64::EPSILON);
        assert_eq!(config.escalation.message, "Please talk to someone you trust.");
        assert_eq!(config.sentiment.lexicon_path, "/opt/lexicons/vader.txt");
        assert_eq!(config.generation.endpoint, "http://localhost:9000/generate");
        assert_eq!(config.generation.api_token, "hf_test");
        assert_eq!(config.generation.max_length, 64);
        assert_eq!(config.generation.timeout_secs, 10);
        assert!(config.generation.strip_echoed_prompt);
        assert_eq!(config.generation.fallback_message, "Try again later.");
        assert!(config.speech.voice_output);
        assert_eq!(config.speech.listen_timeout_secs, 8);
        assert_eq!(config.speech.transcribe_timeout_secs, 20);
        assert_eq!(
            config.speech.recognizer_command,
            vec!["healthbot-listen", "--lang", "en"]
        );
        assert_eq!(config.speech.synthesizer_command, vec!["say"]);
        assert_eq!(config.session.max_message_chars, 500);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[escalation]
threshold = -0.6
"#;
        let file = create_temp_config(content);
        let config = HealthbotConfig::load(file.path()).unwrap();
        assert!((config.escalation.threshold - -0.6).abs() < f64::EPSILON);
        // Fields missing from the section keep their defaults
        assert_eq!(config.escalation.message, DEFAULT_ESCALATION_MESSAGE);
        assert_eq!(config.generation.max_length, DEFAULT_MAX_LENGTH);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = HealthbotConfig::load(file.path()).unwrap();
        assert_eq!(config.generation.max_length, 100);
        assert_eq!(config.speech.listen_timeout_secs, 5);
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        let result = HealthbotConfig::load(file.path());
        assert!(matches!(result, Err(HealthbotError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = HealthbotConfig::load(Path::new("/nonexistent/healthbot.toml"));
        assert!(matches!(result, Err(HealthbotError::Io(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = HealthbotConfig::load_or_default(Path::new("/nonexistent/healthbot.toml"));
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.generation.max_length, DEFAULT_MAX_LENGTH);
    }

    #[test]
    fn test_save_creates_parent_dirs_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = HealthbotConfig::default();
        config.escalation.threshold = -0.45;
        config.speech.recognizer_command = vec!["listen".to_string()];
        config.save(&path).unwrap();

        assert!(path.exists());
        let reloaded = HealthbotConfig::load(&path).unwrap();
        assert!((reloaded.escalation.threshold - -0.45).abs() < f64::EPSILON);
        assert_eq!(reloaded.speech.recognizer_command, vec!["listen"]);
        assert_eq!(reloaded.generation.endpoint, config.generation.endpoint);
    }
}
