//! Interactive terminal front-end.
//!
//! Turns input lines into commands and runs them against one conversation
//! session. Rendering is returned as lines so the loop in `main` only has
//! to print them.

use std::time::Duration;

use tracing::{debug, warn};

use healthbot_core::session::ConversationSession;
use healthbot_engine::Assistant;
use healthbot_speech::{SpeechError, SpeechInput, SpeechOutput, VoiceSession};

pub const TITLE: &str = "Healthcare Assistant Chatbot";
pub const PROMPT: &str = "How can I assist you today?";

/// Sidebar tips shown at startup and on `/tips`.
pub const HEALTH_TIPS: [&str; 4] = [
    "Stay hydrated",
    "Exercise regularly",
    "Eat a balanced diet",
    "Get enough sleep",
];

const HELP: [(&str, &str); 6] = [
    ("/speak", "answer by voice instead of typing"),
    ("/history", "show this conversation"),
    ("/tips", "show general health tips"),
    ("/reset", "clear the conversation"),
    ("/help", "show this help"),
    ("/quit", "leave the chat"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Message(String),
    Speak,
    History,
    Tips,
    Reset,
    Help,
    Quit,
    Unknown(String),
    Blank,
}

/// Classify one input line. Anything not starting with `/` is a message.
pub fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Blank;
    }
    if !trimmed.starts_with('/') {
        return Command::Message(trimmed.to_string());
    }
    match trimmed.to_lowercase().as_str() {
        "/speak" => Command::Speak,
        "/history" => Command::History,
        "/tips" => Command::Tips,
        "/reset" => Command::Reset,
        "/help" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

pub fn banner() -> Vec<String> {
    let mut lines = vec![TITLE.to_string(), "=".repeat(TITLE.len()), String::new()];
    lines.extend(tips());
    lines.push(String::new());
    lines.push(format!("{} (type /help for commands)", PROMPT));
    lines
}

pub fn tips() -> Vec<String> {
    std::iter::once("Health Tips".to_string())
        .chain(HEALTH_TIPS.iter().map(|t| format!("  - {}", t)))
        .collect()
}

pub fn help() -> Vec<String> {
    HELP.iter()
        .map(|(cmd, what)| format!("  {:<10} {}", cmd, what))
        .collect()
}

pub fn history(session: &ConversationSession) -> Vec<String> {
    if session.is_empty() {
        return vec!["(no messages yet)".to_string()];
    }
    session
        .history()
        .iter()
        .map(|turn| {
            format!(
                "[{}] {}: {}",
                turn.timestamp().format("%H:%M:%S"),
                turn.role(),
                turn.content()
            )
        })
        .collect()
}

/// What the loop should do after one line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Outcome {
    fn show(lines: Vec<String>) -> Self {
        Self { lines, quit: false }
    }
}

/// One interactive conversation with optional speech in and out.
pub struct Console<I: SpeechInput, O: SpeechOutput> {
    assistant: Assistant,
    session: ConversationSession,
    recognizer: Option<I>,
    voice: Option<VoiceSession<O>>,
    listen_timeout: Duration,
}

impl<I: SpeechInput, O: SpeechOutput> Console<I, O> {
    pub fn new(assistant: Assistant, listen_timeout: Duration) -> Self {
        Self {
            assistant,
            session: ConversationSession::new(),
            recognizer: None,
            voice: None,
            listen_timeout,
        }
    }

    pub fn with_recognizer(mut self, recognizer: I) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn with_voice(mut self, voice: VoiceSession<O>) -> Self {
        self.voice = Some(voice);
        self
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    pub async fn handle_line(&mut self, line: &str) -> Outcome {
        let command = parse_line(line);
        debug!(?command, "Console command");
        match command {
            Command::Blank => Outcome::default(),
            Command::Message(text) => Outcome::show(self.converse(&text).await),
            Command::Speak => Outcome::show(self.listen_and_converse().await),
            Command::History => Outcome::show(history(&self.session)),
            Command::Tips => Outcome::show(tips()),
            Command::Reset => {
                self.session.reset();
                Outcome::show(vec!["Conversation cleared.".to_string()])
            }
            Command::Help => Outcome::show(help()),
            Command::Quit => Outcome {
                lines: vec!["Take care!".to_string()],
                quit: true,
            },
            Command::Unknown(cmd) => Outcome::show(vec![format!(
                "Unknown command: {}. Type /help for commands.",
                cmd
            )]),
        }
    }

    async fn converse(&mut self, text: &str) -> Vec<String> {
        match self.assistant.handle_message(&mut self.session, text).await {
            Ok(response) => {
                self.say(&response).await;
                vec![format!("Assistant: {}", response)]
            }
            Err(e) => vec![e.to_string()],
        }
    }

    async fn listen_and_converse(&mut self) -> Vec<String> {
        let heard = match self.recognizer {
            Some(ref recognizer) => recognizer.listen(self.listen_timeout).await,
            None => Err(SpeechError::ServiceError(
                "no recognizer command configured".to_string(),
            )),
        };

        match heard {
            Ok(text) => {
                let mut lines = vec![format!("You said: {}", text)];
                lines.extend(self.converse(&text).await);
                lines
            }
            Err(e) => {
                // Shown and spoken, but kept out of the session.
                warn!(error = %e, "Speech input failed");
                let message = e.user_message();
                self.say(message).await;
                vec![format!("Assistant: {}", message)]
            }
        }
    }

    async fn say(&mut self, text: &str) {
        if let Some(ref mut voice) = self.voice {
            if let Err(e) = voice.speak(text).await {
                warn!(error = %e, "Speech output failed");
            }
        }
    }

    /// Release the voice session, if any.
    pub fn shutdown(&mut self) {
        if let Some(ref mut voice) = self.voice {
            voice.close();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
