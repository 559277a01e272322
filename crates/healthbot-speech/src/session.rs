//! Scoped speech-synthesis resource.

use tracing::{debug, info};

use crate::{SpeechError, SpeechOutput};

/// Speech output held open for the length of one interactive session.
///
/// Opened once at startup and closed explicitly at teardown. Speaking after
/// `close` fails with `SpeechError::SessionClosed`.
#[derive(Debug)]
pub struct VoiceSession<S: SpeechOutput> {
    output: Option<S>,
    utterances: usize,
}

impl<S: SpeechOutput> VoiceSession<S> {
    pub fn open(output: S) -> Self {
        info!("Voice session opened");
        Self {
            output: Some(output),
            utterances: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.output.is_some()
    }

    /// Number of texts spoken successfully.
    pub fn utterances(&self) -> usize {
        self.utterances
    }

    pub async fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        let output = self.output.as_ref().ok_or(SpeechError::SessionClosed)?;
        output.speak(text).await?;
        self.utterances += 1;
        debug!(utterances = self.utterances, "Spoke response");
        Ok(())
    }

    /// Release the output and hand it back. Closing twice returns `None`.
    pub fn close(&mut self) -> Option<S> {
        let output = self.output.take();
        if output.is_some() {
            info!(utterances = self.utterances, "Voice session closed");
        }
        output
    }
}
