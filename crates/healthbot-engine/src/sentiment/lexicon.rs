//! Rule-based polarity scorer over a user-supplied lexicon file.
//!
//! The file uses VADER's tab-separated format. Each token is looked up in
//! the lexicon, then adjusted by nearby boosters and negations, ALL-CAPS
//! emphasis, a contrastive "but", and trailing punctuation. The summed
//! valence is normalized into a compound score in `[-1.0, 1.0]`.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use healthbot_core::error::HealthbotError;
use healthbot_core::types::SentimentScore;

use super::{PolarityScores, SentimentScorer};

const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
const C_INCR: f64 = 0.733;
const N_SCALAR: f64 = -0.74;
const NORMALIZE_ALPHA: f64 = 15.0;
const EXCLAMATION_INCR: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_INCR: f64 = 0.18;
const QUESTION_CAP: f64 = 0.96;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont", "hadnt",
    "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "neednt", "never", "none", "nope",
    "nor", "not", "nothing", "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent",
    "without", "wont", "wouldnt", "rarely", "seldom", "despite",
];

const INCREMENTS: &[&str] = &[
    "absolutely", "amazingly", "awfully", "completely", "considerably", "decidedly", "deeply",
    "enormously", "entirely", "especially", "exceptionally", "extremely", "fully", "greatly",
    "highly", "hugely", "incredibly", "intensely", "majorly", "more", "most", "particularly",
    "purely", "quite", "really", "remarkably", "so", "substantially", "thoroughly", "totally",
    "tremendously", "unbelievably", "unusually", "utterly", "very",
];

const DECREMENTS: &[&str] = &[
    "almost", "barely", "hardly", "kinda", "less", "little", "marginally", "occasionally",
    "partly", "scarcely", "slightly", "somewhat", "sorta",
];

enum LexiconState {
    Loaded(HashMap<String, f64>),
    Unavailable(String),
}

/// Lexicon polarity scorer.
pub struct LexiconSentimentScorer {
    state: LexiconState,
}

impl std::fmt::Debug for LexiconSentimentScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.state {
            LexiconState::Loaded(lexicon) => f
                .debug_struct("LexiconSentimentScorer")
                .field("entries", &lexicon.len())
                .finish(),
            LexiconState::Unavailable(reason) => f
                .debug_struct("LexiconSentimentScorer")
                .field("unavailable", reason)
                .finish(),
        }
    }
}

impl LexiconSentimentScorer {
    /// Load a lexicon file in VADER's tab-separated format.
    ///
    /// # Errors
    /// Returns `HealthbotError::ModelUnavailable` if the file cannot be read
    /// or holds no usable entries.
    pub fn from_file(path: &Path) -> Result<Self, HealthbotError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HealthbotError::ModelUnavailable(format!(
                "cannot read sentiment lexicon {}: {}",
                path.display(),
                e
            ))
        })?;
        let scorer = Self::from_lexicon_str(&content)?;
        info!(path = %path.display(), entries = scorer.len(), "Sentiment lexicon loaded");
        Ok(scorer)
    }

    /// Parse lexicon text (one `token<TAB>valence[<TAB>...]` per line).
    pub fn from_lexicon_str(content: &str) -> Result<Self, HealthbotError> {
        let lexicon = parse_lexicon(content);
        if lexicon.is_empty() {
            return Err(HealthbotError::ModelUnavailable(
                "sentiment lexicon has no entries".to_string(),
            ));
        }
        Ok(Self {
            state: LexiconState::Loaded(lexicon),
        })
    }

    /// Scorer that fails every call with `ModelUnavailable`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: LexiconState::Unavailable(reason.into()),
        }
    }

    /// Number of lexicon entries (0 when unavailable).
    pub fn len(&self) -> usize {
        match &self.state {
            LexiconState::Loaded(lexicon) => lexicon.len(),
            LexiconState::Unavailable(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full polarity breakdown for `text`.
    pub fn polarity_scores(&self, text: &str) -> Result<PolarityScores, HealthbotError> {
        let lexicon = match &self.state {
            LexiconState::Loaded(lexicon) => lexicon,
            LexiconState::Unavailable(reason) => {
                return Err(HealthbotError::ModelUnavailable(reason.clone()))
            }
        };

        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Ok(PolarityScores::neutral());
        }
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let caps_differ = caps_differ(&tokens);

        let mut sentiments = Vec::with_capacity(tokens.len());
        for i in 0..tokens.len() {
            let word = lowered[i].as_str();
            let kind_of = word == "kind" && lowered.get(i + 1).map(String::as_str) == Some("of");
            if booster(word).is_some() || kind_of {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(token_valence(lexicon, &tokens, &lowered, i, caps_differ));
        }

        apply_but(&lowered, &mut sentiments);
        Ok(score_valence(&sentiments, text))
    }
}

impl SentimentScorer for LexiconSentimentScorer {
    fn score(&self, utterance: &str) -> Result<SentimentScore, HealthbotError> {
        self.polarity_scores(utterance).map(|p| p.compound)
    }
}

// -- Private helpers --

fn parse_lexicon(content: &str) -> HashMap<String, f64> {
    let mut lexicon = HashMap::new();
    let mut skipped = 0usize;
    for line in content.lines() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split('\t');
        let token = fields.next().unwrap_or_default();
        match fields.next().map(str::trim).map(str::parse::<f64>) {
            Some(Ok(valence)) if !token.is_empty() => {
                lexicon.insert(token.to_lowercase(), valence);
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped, "Malformed sentiment lexicon lines skipped");
    }
    lexicon
}

/// Split on whitespace and strip surrounding punctuation. Tokens that would
/// shrink to two characters or fewer keep their punctuation (so emoticons
/// survive), and single-character tokens are dropped.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|raw| {
            let stripped = raw.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 {
                raw.to_string()
            } else {
                stripped.to_string()
            }
        })
        .filter(|t| t.chars().count() > 1)
        .collect()
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(|c| c.is_alphabetic()) && !token.chars().any(|c| c.is_lowercase())
}

/// True when some, but not all, tokens are shouted.
fn caps_differ(tokens: &[String]) -> bool {
    let shouted = tokens.iter().filter(|t| is_all_caps(t)).count();
    shouted > 0 && shouted < tokens.len()
}

fn booster(word: &str) -> Option<f64> {
    if INCREMENTS.contains(&word) {
        Some(B_INCR)
    } else if DECREMENTS.contains(&word) {
        Some(B_DECR)
    } else {
        None
    }
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.contains("n't")
}

/// Push `amount` away from zero in the direction of `valence`.
fn emphasize(valence: f64, amount: f64) -> f64 {
    if valence > 0.0 {
        amount
    } else {
        -amount
    }
}

fn scalar_inc_dec(token: &str, lowered: &str, valence: f64, caps_differ: bool) -> f64 {
    let Some(base) = booster(lowered) else {
        return 0.0;
    };
    let mut scalar = if valence < 0.0 { -base } else { base };
    if caps_differ && is_all_caps(token) {
        scalar += emphasize(valence, C_INCR);
    }
    scalar
}

fn token_valence(
    lexicon: &HashMap<String, f64>,
    tokens: &[String],
    lowered: &[String],
    i: usize,
    caps_differ: bool,
) -> f64 {
    let Some(&base) = lexicon.get(&lowered[i]) else {
        return 0.0;
    };
    let mut valence = base;
    if caps_differ && is_all_caps(&tokens[i]) {
        valence += emphasize(valence, C_INCR);
    }

    for distance in 1..=3usize {
        if i < distance {
            break;
        }
        let j = i - distance;
        if lexicon.contains_key(&lowered[j]) {
            continue;
        }
        let damping = match distance {
            1 => 1.0,
            2 => 0.95,
            _ => 0.9,
        };
        valence += scalar_inc_dec(&tokens[j], &lowered[j], valence, caps_differ) * damping;
        if is_negation(&lowered[j]) {
            valence *= N_SCALAR;
        }
    }
    valence
}

/// Words before the first "but" count half, words after count one and a half.
fn apply_but(lowered: &[String], sentiments: &mut [f64]) {
    let Some(pivot) = lowered.iter().position(|w| w == "but") else {
        return;
    };
    for (i, s) in sentiments.iter_mut().enumerate() {
        if i < pivot {
            *s *= 0.5;
        } else if i > pivot {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();
    let question_amp = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_INCR,
        _ => QUESTION_CAP,
    };
    exclamations as f64 * EXCLAMATION_INCR + question_amp
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZE_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn score_valence(sentiments: &[f64], text: &str) -> PolarityScores {
    let punct = punctuation_emphasis(text);
    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += punct;
    } else if sum < 0.0 {
        sum -= punct;
    }
    let compound = SentimentScore::new(round_to(normalize(sum), 4));

    let (mut pos, mut neg, mut neu) = (0.0f64, 0.0f64, 0.0f64);
    for &s in sentiments {
        if s > 0.0 {
            pos += s + 1.0;
        } else if s < 0.0 {
            neg += s - 1.0;
        } else {
            neu += 1.0;
        }
    }
    if pos > neg.abs() {
        pos += punct;
    } else if pos < neg.abs() {
        neg -= punct;
    }

    let total = pos + neg.abs() + neu;
    if total == 0.0 {
        return PolarityScores::neutral();
    }
    PolarityScores {
        neg: round_to((neg / total).abs(), 3),
        neu: round_to(neu / total, 3),
        pos: round_to(pos / total, 3),
        compound,
    }
}

// =============================================================================
// Tests
// =============================================================================
