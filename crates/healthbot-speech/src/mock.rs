//! Scripted speech adapters for tests and headless runs.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{SpeechError, SpeechInput, SpeechOutput};

/// Recognizer that replays a script of outcomes, then reports
/// `Unrecognized` once the script runs out.
#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    script: Arc<Mutex<VecDeque<Result<String, SpeechError>>>>,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(outcomes: Vec<Result<String, SpeechError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(outcomes.into())),
        }
    }

    /// Outcomes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl SpeechInput for MockRecognizer {
    async fn listen(&self, _timeout: Duration) -> Result<String, SpeechError> {
        let next = self
            .script
            .lock()
            .map_err(|_| SpeechError::ServiceError("mock script poisoned".to_string()))?
            .pop_front();
        next.unwrap_or(Err(SpeechError::Unrecognized))
    }
}

/// Synthesizer that records what it was asked to say.
///
/// Clones share the same record, so a test can keep one handle while the
/// other is moved into a [`VoiceSession`](crate::VoiceSession).
#[derive(Debug, Clone, Default)]
pub struct MockSynthesizer {
    spoken: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synthesizer whose every `speak` fails.
    pub fn failing() -> Self {
        Self {
            spoken: Arc::default(),
            fail: true,
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl SpeechOutput for MockSynthesizer {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        if self.fail {
            return Err(SpeechError::Synthesis("mock audio device missing".to_string()));
        }
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(text.to_string());
        }
        Ok(())
    }
}
