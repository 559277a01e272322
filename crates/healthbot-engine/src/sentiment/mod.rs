//! Sentiment classifier adapter.
//!
//! - `VaderSentimentScorer` is the default scorer, backed by the full VADER
//!   lexicon.
//! - `LexiconSentimentScorer` applies the same rules to a lexicon file
//!   supplied through configuration.
//! - `MockSentimentScorer` returns a fixed score (or a fixed failure) and
//!   counts calls, for testing the selection pipeline.

pub mod lexicon;
pub mod vader;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use healthbot_core::config::SentimentConfig;
use healthbot_core::error::HealthbotError;
use healthbot_core::types::SentimentScore;

pub use lexicon::LexiconSentimentScorer;
pub use vader::VaderSentimentScorer;

/// Scores the polarity of one utterance.
///
/// Implementations return a compound score in `[-1.0, 1.0]`, or
/// `HealthbotError::ModelUnavailable` when the underlying model is not
/// loaded. Callers decide what a failure means; nothing is retried.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, utterance: &str) -> Result<SentimentScore, HealthbotError>;
}

/// Breakdown of an utterance's polarity.
///
/// `neg`, `neu` and `pos` are proportions of the text that sum to roughly
/// 1.0; `compound` is the normalized aggregate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: SentimentScore,
}

impl PolarityScores {
    /// Scores for text with no scorable tokens.
    pub fn neutral() -> Self {
        Self {
            neg: 0.0,
            neu: 0.0,
            pos: 0.0,
            compound: SentimentScore::NEUTRAL,
        }
    }
}

/// Build the configured scorer. An empty `lexicon_path` selects VADER; a
/// lexicon file that fails to load yields a scorer that fails every call.
pub fn scorer_from_config(config: &SentimentConfig) -> Arc<dyn SentimentScorer> {
    let path = config.lexicon_path.trim();
    if path.is_empty() {
        info!("Using built-in VADER sentiment lexicon");
        return Arc::new(VaderSentimentScorer::new());
    }
    match LexiconSentimentScorer::from_file(Path::new(path)) {
        Ok(scorer) => Arc::new(scorer),
        Err(e) => {
            warn!(error = %e, "Sentiment model unavailable; escalation disabled");
            Arc::new(LexiconSentimentScorer::unavailable(e.to_string()))
        }
    }
}

// =============================================================================
// Mock implementation
// =============================================================================

/// Scorer returning the same outcome for every utterance.
#[derive(Debug)]
pub struct MockSentimentScorer {
    outcome: Option<SentimentScore>,
    calls: AtomicUsize,
}

impl MockSentimentScorer {
    /// Always returns `compound` (clamped).
    pub fn fixed(compound: f64) -> Self {
        Self {
            outcome: Some(SentimentScore::new(compound)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails with `ModelUnavailable`.
    pub fn unavailable() -> Self {
        Self {
            outcome: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `score` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SentimentScorer for MockSentimentScorer {
    fn score(&self, _utterance: &str) -> Result<SentimentScore, HealthbotError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.ok_or_else(|| {
            HealthbotError::ModelUnavailable("mock sentiment model not loaded".to_string())
        })
    }
}
