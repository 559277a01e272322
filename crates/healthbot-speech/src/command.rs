//! Speech adapters that delegate to external programs.
//!
//! The recognizer runs a program that records from the microphone and
//! prints the transcript on stdout. The listen window only bounds the wait
//! for speech to start; the program is killed once the window plus the
//! transcription grace period has passed. The synthesizer runs a program such as
//! `espeak` with the text as its last argument.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use healthbot_core::config::{SpeechConfig, DEFAULT_TRANSCRIBE_TIMEOUT_SECS};

use crate::{SpeechError, SpeechInput, SpeechOutput};

/// Environment variable passed to the recognizer with the listen window in
/// whole seconds.
pub const LISTEN_TIMEOUT_ENV: &str = "HEALTHBOT_LISTEN_TIMEOUT_SECS";

/// Exit code a recognizer uses for "heard nothing intelligible".
const UNRECOGNIZED_EXIT_CODE: i32 = 1;

fn split_command(command: &[String]) -> Option<(String, Vec<String>)> {
    let (program, args) = command.split_first()?;
    if program.trim().is_empty() {
        return None;
    }
    Some((program.clone(), args.to_vec()))
}

// =============================================================================
// Recognizer
// =============================================================================

#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
    transcribe_timeout: Duration,
}

impl CommandRecognizer {
    /// `command` is the program followed by its arguments.
    pub fn new(command: &[String]) -> Result<Self, SpeechError> {
        let (program, args) = split_command(command).ok_or_else(|| {
            SpeechError::ServiceError("no recognizer command configured".to_string())
        })?;
        Ok(Self {
            program,
            args,
            transcribe_timeout: Duration::from_secs(DEFAULT_TRANSCRIBE_TIMEOUT_SECS),
        })
    }

    /// Time allowed past the listen window for the recognizer to finish.
    pub fn with_transcribe_timeout(mut self, grace: Duration) -> Self {
        self.transcribe_timeout = grace;
        self
    }

    pub fn from_config(config: &SpeechConfig) -> Result<Self, SpeechError> {
        let recognizer = Self::new(&config.recognizer_command)?
            .with_transcribe_timeout(Duration::from_secs(config.transcribe_timeout_secs));
        info!(
            program = %recognizer.program,
            transcribe_timeout_secs = config.transcribe_timeout_secs,
            "Speech recognizer configured"
        );
        Ok(recognizer)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn transcribe_timeout(&self) -> Duration {
        self.transcribe_timeout
    }
}

impl SpeechInput for CommandRecognizer {
    async fn listen(&self, timeout: Duration) -> Result<String, SpeechError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .env(LISTEN_TIMEOUT_ENV, timeout.as_secs().to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                SpeechError::ServiceError(format!("failed to start {}: {}", self.program, e))
            })?;

        // Dropping the pending future drops the child, which kills it.
        let deadline = timeout.saturating_add(self.transcribe_timeout);
        let output = match tokio::time::timeout(deadline, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(SpeechError::ServiceError(e.to_string())),
            Err(_) => {
                debug!(deadline_ms = deadline.as_millis() as u64, "Recognizer deadline expired");
                return Err(SpeechError::Unrecognized);
            }
        };

        match output.status.code() {
            Some(0) => {
                let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if transcript.is_empty() {
                    return Err(SpeechError::Unrecognized);
                }
                debug!(chars = transcript.len(), "Speech recognized");
                Ok(transcript)
            }
            Some(UNRECOGNIZED_EXIT_CODE) => Err(SpeechError::Unrecognized),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!(status = %output.status, "Speech recognizer failed");
                Err(SpeechError::ServiceError(format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    stderr.trim()
                )))
            }
        }
    }
}

// =============================================================================
// Synthesizer
// =============================================================================

#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
}

impl Default for CommandSynthesizer {
    fn default() -> Self {
        Self {
            program: "espeak".to_string(),
            args: Vec::new(),
        }
    }
}

impl CommandSynthesizer {
    pub fn new(command: &[String]) -> Result<Self, SpeechError> {
        let (program, args) = split_command(command).ok_or_else(|| {
            SpeechError::Synthesis("no synthesizer command configured".to_string())
        })?;
        Ok(Self { program, args })
    }

    pub fn from_config(config: &SpeechConfig) -> Result<Self, SpeechError> {
        let synthesizer = Self::new(&config.synthesizer_command)?;
        info!(program = %synthesizer.program, "Speech synthesizer configured");
        Ok(synthesizer)
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SpeechOutput for CommandSynthesizer {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                SpeechError::Synthesis(format!("failed to start {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::Synthesis(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
