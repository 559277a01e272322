//! Response-selection engine for the health assistant.
//!
//! Classifies an utterance with ordered keyword rules, escalates on
//! distressed sentiment, and otherwise defers to a generative model.

pub mod assistant;
pub mod escalation;
pub mod generator;
pub mod intent;
pub mod selector;
pub mod sentiment;

pub use assistant::Assistant;
pub use escalation::EscalationPolicy;
pub use generator::{
    DynTextGenerator, GenerationParams, HttpTextGenerator, MockTextGenerator, TextGenerator,
};
pub use intent::{Intent, IntentMatch, IntentMatcher, IntentRule};
pub use selector::{ResponseSelector, Selection, SelectionStage};
pub use sentiment::{
    scorer_from_config, LexiconSentimentScorer, MockSentimentScorer, PolarityScores,
    SentimentScorer, VaderSentimentScorer,
};
