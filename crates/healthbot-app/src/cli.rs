//! CLI argument definitions for the healthbot binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use healthbot_core::config::HealthbotConfig;

/// Healthbot - a terminal health assistant with keyword intents, sentiment
/// escalation and a generative fallback.
#[derive(Parser, Debug, Default)]
#[command(name = "healthbot", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Text-generation endpoint URL.
    #[arg(short = 'e', long = "endpoint")]
    pub endpoint: Option<String>,

    /// Speak every response aloud.
    #[arg(long = "voice")]
    pub voice: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > HEALTHBOT_CONFIG env var > ~/.healthbot/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("HEALTHBOT_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value > "info".
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if !config_level.is_empty() {
            return config_level.to_string();
        }
        "info".to_string()
    }

    /// Resolve the generation endpoint.
    ///
    /// Priority: --endpoint flag > HEALTHBOT_ENDPOINT env var > config file value.
    pub fn resolve_endpoint(&self, config_endpoint: &str) -> String {
        if let Some(ref e) = self.endpoint {
            return e.clone();
        }
        if let Ok(e) = std::env::var("HEALTHBOT_ENDPOINT") {
            if !e.is_empty() {
                return e;
            }
        }
        config_endpoint.to_string()
    }

    /// Fold CLI overrides into the loaded configuration.
    pub fn apply(&self, config: &mut HealthbotConfig) {
        config.general.log_level = self.resolve_log_level(&config.general.log_level);
        config.generation.endpoint = self.resolve_endpoint(&config.generation.endpoint);
        if self.voice {
            config.speech.voice_output = true;
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".healthbot").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".healthbot").join("config.toml");
    }
    PathBuf::from("config.toml")
}
