//! Keyword intent matching.
//!
//! An ordered list of rules, each a set of lower-case trigger substrings and
//! a responder. The utterance is lower-cased and checked against the rules
//! top to bottom; the first rule with a trigger contained anywhere in the
//! utterance wins. Containment is plain substring search, so "symptoms"
//! matches "symptom" and "yesterday" matches "yes".

use std::fmt;

pub const SYMPTOM_RESPONSE: &str = "For general symptoms, try getting enough rest and staying hydrated. For severe cases, consult a doctor.";
pub const APPOINTMENT_RESPONSE: &str = "Would you like to book an appointment?";
pub const BOOKING_DETAILS_RESPONSE: &str =
    "Please enter your preferred date and time for the appointment.";
pub const MEDICATION_RESPONSE: &str =
    "Make sure to take prescribed medicines on time. Would you like a medication reminder?";
pub const HEALTH_TIPS_RESPONSE: &str =
    "Tip: Stay hydrated, exercise regularly, and get at least 7-8 hours of sleep!";
pub const EMERGENCY_RESPONSE: &str = "If this is a medical emergency, please call an ambulance or visit the nearest hospital immediately!";

/// What a matched rule is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Intent {
    /// General symptom-care advice.
    Symptom,
    /// Offer to book an appointment.
    Appointment,
    /// Ask for a preferred date and time. Fires on any "yes", whatever was
    /// said before.
    BookingDetails,
    /// Medication adherence advice.
    Medication,
    /// Static health tip.
    HealthTips,
    /// Urgent escalation to emergency services.
    Emergency,
    /// Rule supplied by the embedding application.
    Custom(String),
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Symptom => write!(f, "symptom"),
            Intent::Appointment => write!(f, "appointment"),
            Intent::BookingDetails => write!(f, "booking_details"),
            Intent::Medication => write!(f, "medication"),
            Intent::HealthTips => write!(f, "health_tips"),
            Intent::Emergency => write!(f, "emergency"),
            Intent::Custom(name) => write!(f, "custom:{}", name),
        }
    }
}

/// How a rule turns the utterance into a response.
#[derive(Clone)]
enum Responder {
    Canned(String),
    Computed(fn(&str) -> String),
}

/// A single keyword rule.
#[derive(Clone)]
pub struct IntentRule {
    intent: Intent,
    triggers: Vec<String>,
    responder: Responder,
}

impl fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentRule")
            .field("intent", &self.intent)
            .field("triggers", &self.triggers)
            .finish()
    }
}

impl IntentRule {
    /// Rule that always answers with the same text.
    pub fn canned(intent: Intent, triggers: &[&str], response: impl Into<String>) -> Self {
        Self {
            intent,
            triggers: normalize_triggers(triggers),
            responder: Responder::Canned(response.into()),
        }
    }

    /// Rule whose response is computed from the lower-cased utterance.
    pub fn computed(intent: Intent, triggers: &[&str], responder: fn(&str) -> String) -> Self {
        Self {
            intent,
            triggers: normalize_triggers(triggers),
            responder: Responder::Computed(responder),
        }
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    /// Whether any trigger is a substring of the already lower-cased text.
    pub fn matches(&self, normalized: &str) -> bool {
        self.triggers.iter().any(|t| normalized.contains(t.as_str()))
    }

    pub fn respond(&self, normalized: &str) -> String {
        match &self.responder {
            Responder::Canned(text) => text.clone(),
            Responder::Computed(f) => f(normalized),
        }
    }
}

/// Empty triggers would match every utterance, so they are dropped.
fn normalize_triggers(triggers: &[&str]) -> Vec<String> {
    triggers
        .iter()
        .map(|t| t.to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// The rule that fired and what it answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentMatch {
    /// Position of the rule in evaluation order.
    pub index: usize,
    pub intent: Intent,
    pub response: String,
}

/// Ordered, immutable rule set. First match wins.
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    rules: Vec<IntentRule>,
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentMatcher {
    /// Matcher with the built-in health assistant rules.
    pub fn new() -> Self {
        Self::with_rules(vec![
            IntentRule::canned(Intent::Symptom, &["symptom"], SYMPTOM_RESPONSE),
            IntentRule::canned(Intent::Appointment, &["appointment"], APPOINTMENT_RESPONSE),
            IntentRule::canned(Intent::BookingDetails, &["yes"], BOOKING_DETAILS_RESPONSE),
            IntentRule::canned(Intent::Medication, &["medication"], MEDICATION_RESPONSE),
            IntentRule::canned(Intent::HealthTips, &["health tips"], HEALTH_TIPS_RESPONSE),
            IntentRule::canned(Intent::Emergency, &["emergency"], EMERGENCY_RESPONSE),
        ])
    }

    /// Matcher evaluating `rules` in the given order.
    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Find the first rule matching the utterance.
    pub fn classify(&self, utterance: &str) -> Option<IntentMatch> {
        let normalized = utterance.to_lowercase();
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(&normalized))
            .map(|(index, rule)| IntentMatch {
                index,
                intent: rule.intent.clone(),
                response: rule.respond(&normalized),
            })
    }

    /// Canned response for the utterance, or `None` when no rule matches.
    pub fn respond(&self, utterance: &str) -> Option<String> {
        self.classify(utterance).map(|m| m.response)
    }
}

// =============================================================================
// Tests
// =============================================================================
