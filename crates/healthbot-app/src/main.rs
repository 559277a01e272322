//! Healthbot application binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Initialise logging on stderr
//! 3. Build the assistant (intent rules, VADER scorer, HTTP generator)
//! 4. Wire optional speech input and output
//! 5. Run the interactive loop over stdin until `/quit` or end of input

mod cli;
mod console;

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use healthbot_core::config::HealthbotConfig;
use healthbot_core::error::Result;
use healthbot_engine::Assistant;
use healthbot_speech::{CommandRecognizer, CommandSynthesizer, VoiceSession};

use cli::CliArgs;
use console::Console;

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}

type TerminalConsole = Console<CommandRecognizer, CommandSynthesizer>;

/// Attach the configured speech adapters. A command list that is present
/// but unusable is a configuration error.
fn attach_speech(
    mut console: TerminalConsole,
    config: &HealthbotConfig,
) -> Result<TerminalConsole> {
    if config.speech.recognizer_command.is_empty() {
        tracing::info!("No speech recognizer configured, /speak is unavailable");
    } else {
        console = console.with_recognizer(CommandRecognizer::from_config(&config.speech)?);
    }

    if config.speech.voice_output {
        let synthesizer = CommandSynthesizer::from_config(&config.speech)?;
        console = console.with_voice(VoiceSession::open(synthesizer));
    }
    Ok(console)
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = HealthbotConfig::load_or_default(&config_file);
    args.apply(&mut config);

    // Tracing on stderr so log lines stay out of the chat.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Healthbot v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    let assistant = Assistant::from_config(&config)?;

    let listen_timeout = Duration::from_secs(config.speech.listen_timeout_secs);
    let mut console = attach_speech(Console::new(assistant, listen_timeout), &config)?;

    print_lines(&console::banner());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let outcome = console.handle_line(&line).await;
        print_lines(&outcome.lines);
        if outcome.quit {
            break;
        }
        prompt()?;
    }

    console.shutdown();
    tracing::info!(turns = console.session().len(), "Healthbot stopped");
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
