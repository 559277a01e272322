//! Response selection pipeline.
//!
//! One pass per utterance, in fixed precedence:
//! 1. keyword intent rules
//! 2. sentiment escalation (skipped if the scorer fails)
//! 3. generative fallback, replaced by an apology on failure or blank output

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use healthbot_core::config::{HealthbotConfig, DEFAULT_FALLBACK_MESSAGE};
use healthbot_core::error::Result;

use crate::escalation::EscalationPolicy;
use crate::generator::{DynTextGenerator, GenerationParams, HttpTextGenerator};
use crate::intent::IntentMatcher;
use crate::sentiment::{scorer_from_config, SentimentScorer};

/// Which step produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStage {
    Intent,
    Escalation,
    Generation,
    Fallback,
}

impl fmt::Display for SelectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionStage::Intent => write!(f, "intent"),
            SelectionStage::Escalation => write!(f, "escalation"),
            SelectionStage::Generation => write!(f, "generation"),
            SelectionStage::Fallback => write!(f, "fallback"),
        }
    }
}

/// A response together with the stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub stage: SelectionStage,
    pub response: String,
}

/// Stateless decision core. Holds only the rule set and the injected
/// adapters, so one selector can serve any number of sessions.
pub struct ResponseSelector {
    matcher: IntentMatcher,
    scorer: Arc<dyn SentimentScorer>,
    escalation: EscalationPolicy,
    generator: Arc<dyn DynTextGenerator>,
    params: GenerationParams,
    fallback: String,
}

impl ResponseSelector {
    pub fn new(
        matcher: IntentMatcher,
        scorer: Arc<dyn SentimentScorer>,
        escalation: EscalationPolicy,
        generator: Arc<dyn DynTextGenerator>,
        params: GenerationParams,
    ) -> Self {
        Self {
            matcher,
            scorer,
            escalation,
            generator,
            params,
            fallback: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }

    /// Replace the apology returned when generation fails.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        let fallback = fallback.into();
        if !fallback.trim().is_empty() {
            self.fallback = fallback;
        }
        self
    }

    /// Wire the production adapters from configuration: the sentiment scorer
    /// and the HTTP text generator.
    pub fn from_config(config: &HealthbotConfig) -> Result<Self> {
        let scorer = scorer_from_config(&config.sentiment);
        let generator = HttpTextGenerator::from_config(&config.generation)?;
        Ok(Self::new(
            IntentMatcher::new(),
            scorer,
            EscalationPolicy::from_config(&config.escalation),
            Arc::new(generator),
            GenerationParams {
                max_length: config.generation.max_length,
            },
        )
        .with_fallback(config.generation.fallback_message.clone()))
    }

    pub fn matcher(&self) -> &IntentMatcher {
        &self.matcher
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Produce exactly one non-empty response for `utterance`.
    pub async fn select(&self, utterance: &str) -> String {
        self.select_detailed(utterance).await.response
    }

    /// Like [`select`](Self::select), also reporting the deciding stage.
    pub async fn select_detailed(&self, utterance: &str) -> Selection {
        let normalized = utterance.to_lowercase();

        if let Some(hit) = self.matcher.classify(&normalized) {
            debug!(stage = %SelectionStage::Intent, intent = %hit.intent, "Response selected");
            return Selection {
                stage: SelectionStage::Intent,
                response: hit.response,
            };
        }

        match self.scorer.score(&normalized) {
            Ok(score) => {
                if let Some(message) = self.escalation.escalate(score) {
                    debug!(
                        stage = %SelectionStage::Escalation,
                        compound = %score,
                        "Response selected"
                    );
                    return Selection {
                        stage: SelectionStage::Escalation,
                        response: message,
                    };
                }
            }
            Err(e) => {
                warn!(error = %e, "Sentiment scoring failed, skipping escalation");
            }
        }

        match self.generator.generate_boxed(&normalized, &self.params).await {
            Ok(text) if !text.trim().is_empty() => {
                debug!(stage = %SelectionStage::Generation, "Response selected");
                Selection {
                    stage: SelectionStage::Generation,
                    response: text,
                }
            }
            Ok(_) => {
                debug!(stage = %SelectionStage::Fallback, "Generator returned blank text");
                self.fallback_selection()
            }
            Err(e) => {
                warn!(error = %e, "Text generation failed");
                debug!(stage = %SelectionStage::Fallback, "Response selected");
                self.fallback_selection()
            }
        }
    }

    fn fallback_selection(&self) -> Selection {
        Selection {
            stage: SelectionStage::Fallback,
            response: self.fallback.clone(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
