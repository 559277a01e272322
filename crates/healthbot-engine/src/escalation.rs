//! Sentiment-triggered escalation.

use healthbot_core::config::{
    EscalationConfig, DEFAULT_ESCALATION_MESSAGE, DEFAULT_ESCALATION_THRESHOLD,
};
use healthbot_core::types::SentimentScore;

/// Returns the concern message when sentiment falls below the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct EscalationPolicy {
    threshold: f64,
    message: String,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ESCALATION_THRESHOLD, DEFAULT_ESCALATION_MESSAGE)
    }
}

impl EscalationPolicy {
    pub fn new(threshold: f64, message: impl Into<String>) -> Self {
        Self {
            threshold,
            message: message.into(),
        }
    }

    pub fn from_config(config: &EscalationConfig) -> Self {
        Self::new(config.threshold, config.message.clone())
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Concern message if `score` is strictly below the threshold.
    pub fn escalate(&self, score: SentimentScore) -> Option<String> {
        if score.compound() < self.threshold {
            Some(self.message.clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        let policy = EscalationPolicy::default();
        assert!((policy.threshold() - -0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_below_threshold_escalates() {
        let policy = EscalationPolicy::default();
        let msg = policy.escalate(SentimentScore::new(-0.31)).unwrap();
        assert_eq!(msg, DEFAULT_ESCALATION_MESSAGE);
        assert!(policy.escalate(SentimentScore::new(-1.0)).is_some());
    }

    #[test]
    fn test_threshold_itself_does_not_escalate() {
        let policy = EscalationPolicy::default();
        assert!(policy.escalate(SentimentScore::new(-0.3)).is_none());
    }

    #[test]
    fn test_neutral_and_positive_do_not_escalate() {
        let policy = EscalationPolicy::default();
        assert!(policy.escalate(SentimentScore::NEUTRAL).is_none());
        assert!(policy.escalate(SentimentScore::new(0.9)).is_none());
        assert!(policy.escalate(SentimentScore::new(-0.29)).is_none());
    }

    #[test]
    fn test_from_config_uses_custom_values() {
        let policy = EscalationPolicy::from_config(&EscalationConfig {
            threshold: -0.6,
            message: "Reach out to a professional.".to_string(),
        });
        assert!(policy.escalate(SentimentScore::new(-0.5)).is_none());
        assert_eq!(
            policy.escalate(SentimentScore::new(-0.7)).unwrap(),
            "Reach out to a professional."
        );
    }
}
