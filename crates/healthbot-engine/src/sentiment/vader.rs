//! Built-in scorer backed by the published VADER lexicon.
//!
//! `vader_sentiment` bundles the full lexicon (roughly 7,500 words, slang
//! terms and emoticons) together with VADER's heuristics, so everyday
//! distress words such as "devastated" or "crisis" carry their published
//! valence.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use vader_sentiment::SentimentIntensityAnalyzer;

use healthbot_core::error::HealthbotError;
use healthbot_core::types::SentimentScore;

use super::{PolarityScores, SentimentScorer};

#[derive(Debug, Default, Clone, Copy)]
pub struct VaderSentimentScorer;

impl VaderSentimentScorer {
    pub fn new() -> Self {
        Self
    }

    /// Full polarity breakdown for `text`.
    pub fn polarity_scores(&self, text: &str) -> Result<PolarityScores, HealthbotError> {
        if text.trim().is_empty() {
            return Ok(PolarityScores::neutral());
        }

        // A panic inside the analyzer counts as an unavailable model.
        let raw = panic::catch_unwind(AssertUnwindSafe(|| {
            let analyzer = SentimentIntensityAnalyzer::new();
            let scores = analyzer.polarity_scores(text);
            collect_scores(&scores)
        }))
        .map_err(|_| HealthbotError::ModelUnavailable("VADER analyzer panicked".to_string()))?;

        raw.ok_or_else(|| {
            HealthbotError::ModelUnavailable("VADER analyzer returned no compound".to_string())
        })
    }
}

impl SentimentScorer for VaderSentimentScorer {
    fn score(&self, utterance: &str) -> Result<SentimentScore, HealthbotError> {
        self.polarity_scores(utterance).map(|p| p.compound)
    }
}

fn collect_scores(scores: &HashMap<&str, f64>) -> Option<PolarityScores> {
    let part = |key: &str| scores.get(key).copied().unwrap_or(0.0);
    let compound = scores.get("compound").copied()?;
    Some(PolarityScores {
        neg: part("neg"),
        neu: part("neu"),
        pos: part("pos"),
        compound: SentimentScore::new(compound),
    })
}

// =============================================================================
// Tests
// =============================================================================
