//! End-to-end behaviour of the selection pipeline through the public API.
//!
//! Every test wires counting mocks so adapter calls can be asserted, plus
//! a few cases with the built-in VADER scorer.

use std::sync::Arc;

use healthbot_core::config::{DEFAULT_ESCALATION_MESSAGE, DEFAULT_FALLBACK_MESSAGE};
use healthbot_core::{ConversationSession, HealthbotError, Role};
use healthbot_engine::intent::{EMERGENCY_RESPONSE, HEALTH_TIPS_RESPONSE, SYMPTOM_RESPONSE};
use healthbot_engine::{
    Assistant, EscalationPolicy, GenerationParams, IntentMatcher, MockSentimentScorer,
    MockTextGenerator, ResponseSelector, SelectionStage, VaderSentimentScorer,
};

// =============================================================================
// Helpers
// =============================================================================

struct Pipeline {
    selector: ResponseSelector,
    scorer: Arc<MockSentimentScorer>,
    generator: Arc<MockTextGenerator>,
}

fn pipeline(scorer: MockSentimentScorer, generator: MockTextGenerator) -> Pipeline {
    let scorer = Arc::new(scorer);
    let generator = Arc::new(generator);
    let selector = ResponseSelector::new(
        IntentMatcher::new(),
        scorer.clone(),
        EscalationPolicy::default(),
        generator.clone(),
        GenerationParams::default(),
    );
    Pipeline {
        selector,
        scorer,
        generator,
    }
}

fn vader_assistant(generator: MockTextGenerator) -> Assistant {
    Assistant::new(ResponseSelector::new(
        IntentMatcher::new(),
        Arc::new(VaderSentimentScorer::new()),
        EscalationPolicy::default(),
        Arc::new(generator),
        GenerationParams::default(),
    ))
}

// =============================================================================
// Precedence
// =============================================================================

#[tokio::test]
async fn emergency_wins_regardless_of_adapter_state() {
    let adapter_states = [
        pipeline(
            MockSentimentScorer::fixed(-1.0),
            MockTextGenerator::replying("generated"),
        ),
        pipeline(
            MockSentimentScorer::unavailable(),
            MockTextGenerator::unavailable(),
        ),
        pipeline(
            MockSentimentScorer::fixed(1.0),
            MockTextGenerator::replying(""),
        ),
    ];

    for p in adapter_states {
        for text in ["Emergency", "EMERGENCY now", "is this an emergency?"] {
            assert_eq!(p.selector.select(text).await, EMERGENCY_RESPONSE);
        }
        assert_eq!(p.scorer.calls(), 0);
        assert_eq!(p.generator.calls(), 0);
    }
}

#[tokio::test]
async fn earlier_rule_beats_emergency() {
    let p = pipeline(
        MockSentimentScorer::fixed(0.0),
        MockTextGenerator::replying("generated"),
    );
    let hit = IntentMatcher::new()
        .classify("I have a symptom, is this an emergency")
        .unwrap();
    assert_eq!(hit.index, 0);
    assert_eq!(
        p.selector.select("I have a symptom, is this an emergency").await,
        SYMPTOM_RESPONSE
    );
}

#[tokio::test]
async fn health_tips_question_touches_no_adapter() {
    let p = pipeline(
        MockSentimentScorer::fixed(-0.9),
        MockTextGenerator::replying("generated"),
    );
    let selection = p.selector.select_detailed("What are some health tips?").await;
    assert_eq!(selection.stage, SelectionStage::Intent);
    assert_eq!(selection.response, HEALTH_TIPS_RESPONSE);
    assert_eq!(p.scorer.calls(), 0);
    assert_eq!(p.generator.calls(), 0);
}

#[tokio::test]
async fn negative_sentiment_without_intent_escalates() {
    let p = pipeline(
        MockSentimentScorer::fixed(-0.31),
        MockTextGenerator::replying("generated"),
    );
    assert_eq!(
        p.selector.select("nothing is going right").await,
        DEFAULT_ESCALATION_MESSAGE
    );
    assert_eq!(p.generator.calls(), 0);
}

#[tokio::test]
async fn non_negative_sentiment_calls_generator_once() {
    for compound in [-0.3, 0.0, 0.75] {
        let p = pipeline(
            MockSentimentScorer::fixed(compound),
            MockTextGenerator::replying("Try a short walk after meals."),
        );
        let response = p.selector.select("how can I improve digestion").await;
        assert_eq!(response, "Try a short walk after meals.");
        assert_eq!(p.scorer.calls(), 1);
        assert_eq!(p.generator.calls(), 1);
    }
}

#[tokio::test]
async fn generator_failure_yields_apology() {
    let p = pipeline(
        MockSentimentScorer::fixed(0.1),
        MockTextGenerator::unavailable(),
    );
    let response = p.selector.select("what should I eat").await;
    assert_eq!(response, DEFAULT_FALLBACK_MESSAGE);
    assert_eq!(p.generator.calls(), 1);
}

#[tokio::test]
async fn classification_is_stable() {
    let matcher = IntentMatcher::new();
    for text in ["book an appointment", "yes", "random chatter", "MEDICATION"] {
        let first = matcher.classify(text).map(|m| m.index);
        let second = matcher.classify(text).map(|m| m.index);
        assert_eq!(first, second);
    }
}

// =============================================================================
// VADER scorer
// =============================================================================

#[tokio::test]
async fn distressed_text_escalates_with_vader() {
    let assistant = vader_assistant(MockTextGenerator::replying("generated"));
    let mut session = ConversationSession::new();
    let response = assistant
        .handle_message(&mut session, "I feel so sad and hopeless")
        .await
        .unwrap();
    assert_eq!(response, DEFAULT_ESCALATION_MESSAGE);
}

#[tokio::test]
async fn everyday_distress_words_escalate_with_vader() {
    for text in [
        "I am devastated",
        "I am heartbroken",
        "this is a disaster",
        "I am in crisis",
    ] {
        let assistant = vader_assistant(MockTextGenerator::replying("generated"));
        let mut session = ConversationSession::new();
        let response = assistant.handle_message(&mut session, text).await.unwrap();
        assert_eq!(response, DEFAULT_ESCALATION_MESSAGE, "input {:?}", text);
    }
}

#[tokio::test]
async fn upbeat_text_reaches_generator_with_vader() {
    let assistant = vader_assistant(MockTextGenerator::replying("Glad to hear it."));
    let mut session = ConversationSession::new();
    let response = assistant
        .handle_message(&mut session, "I feel great today")
        .await
        .unwrap();
    assert_eq!(response, "Glad to hear it.");
}

// =============================================================================
// Session bookkeeping
// =============================================================================

#[tokio::test]
async fn empty_input_is_rejected_before_selection() {
    let p = pipeline(
        MockSentimentScorer::fixed(0.0),
        MockTextGenerator::replying("generated"),
    );
    let generator = Arc::clone(&p.generator);
    let assistant = Assistant::new(p.selector);
    let mut session = ConversationSession::new();

    let err = assistant.handle_message(&mut session, "   ").await.unwrap_err();
    assert!(matches!(err, HealthbotError::EmptyUtterance));
    assert!(session.is_empty());
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn history_holds_two_turns_per_interaction() {
    let assistant = vader_assistant(MockTextGenerator::unavailable());
    let mut session = ConversationSession::new();
    let inputs = [
        "I have a headache symptom",
        "Can I get an appointment?",
        "yes",
        "remind me about medication",
        "anything else?",
    ];

    for (n, text) in inputs.iter().enumerate() {
        assistant.handle_message(&mut session, text).await.unwrap();
        assert_eq!(session.len(), 2 * (n + 1));
    }

    for pair in session.history().chunks(2) {
        assert_eq!(pair[0].role(), Role::User);
        assert_eq!(pair[1].role(), Role::Assistant);
        assert!(!pair[1].content().is_empty());
    }

    session.reset();
    assert!(session.history().is_empty());
}
