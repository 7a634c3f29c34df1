//! End-to-end conversation flow over the real HTTP adapter (mocked server)
//! and the full controller pipeline: router → completion → shaper → turn.

use elderease::AssistantConfig;
use elderease::assistant::{Assistant, COMPLETION_FALLBACK_REPLY};
use elderease::care_plan::CarePlan;
use elderease::completion::GeminiProvider;
use elderease::conversation::AssistantAction;
use elderease::shaping::MAX_REPLY_CHARS;
use elderease::speech::NullSpeech;
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn assistant_against(server_uri: &str) -> Assistant {
    let mut config = AssistantConfig::default();
    config.llm.api_url = server_uri.to_owned();
    config.llm.api_key = "test-key".to_owned();
    let provider = GeminiProvider::new(&config.llm).expect("provider builds");
    Assistant::new(
        config,
        CarePlan::default(),
        Box::new(provider),
        Box::new(NullSpeech),
    )
}

fn completion_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn remote_reply_is_shaped_before_rendering() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("You should rest now. Do you need help?")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut assistant = assistant_against(&mock_server.uri());
    let outcome = assistant.handle_utterance("I feel lonely today").await;

    assert_eq!(
        outcome.turn.reply.text,
        "You should rest **now**. Do you need help."
    );
    assert!(outcome.turn.reply.text.chars().count() <= MAX_REPLY_CHARS);
    assert!(!outcome.turn.reply.text.contains('?'));
}

#[tokio::test]
async fn remote_failure_adds_exactly_one_fallback_turn() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let mut assistant = assistant_against(&mock_server.uri());
    let outcome = assistant.handle_utterance("tell me a story").await;

    assert_eq!(outcome.turn.reply.text, COMPLETION_FALLBACK_REPLY);
    assert_eq!(assistant.conversation().len(), 1);
}

#[tokio::test]
async fn local_intents_never_touch_the_network() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("unused")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut assistant = assistant_against(&mock_server.uri());

    let reminder = assistant
        .handle_utterance("remind me to take pills at 8:30 PM")
        .await;
    assert!(reminder.turn.reply.text.contains("take pills at 8:30 PM"));
    assert!(reminder.turn.reply.is_confirmable());

    let contact = assistant.handle_utterance("call my daughter").await;
    assert!(contact.turn.reply.text.contains("(555) 123-4567"));

    let emergency = assistant.handle_utterance("this is an emergency").await;
    assert!(emergency.turn.reply.text.contains("Help is on the way"));
    assert_eq!(assistant.alerts().len(), 1);
}

#[tokio::test]
async fn mixed_conversation_grows_one_turn_per_utterance() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("That sounds nice.")))
        .mount(&mock_server)
        .await;

    let mut assistant = assistant_against(&mock_server.uri());
    let utterances = [
        "remind me to water the plants",
        "I went for a walk this morning",
        "schedule a dentist appointment",
        "call my doctor",
    ];
    for (i, utterance) in utterances.iter().enumerate() {
        assistant.handle_utterance(utterance).await;
        assert_eq!(assistant.conversation().len(), i + 1);
    }

    for turn in assistant.conversation().turns() {
        assert!(!turn.reply.text.is_empty());
        assert!(!turn.reply.text.contains('?'));
    }
}

#[tokio::test]
async fn confirmed_reminder_lands_in_the_schedule() {
    let mock_server = MockServer::start().await;
    let mut assistant = assistant_against(&mock_server.uri());

    assistant
        .handle_utterance("remind me to take pills at 8:30 PM")
        .await;
    let action = assistant.confirm_last().expect("reminder is confirmable");
    match action {
        AssistantAction::Reminder { body, time } => {
            assert_eq!(body, "take pills at 8:30 PM");
            assert_eq!(time.as_deref(), Some("8:30 PM"));
        }
        other => panic!("expected reminder, got {other:?}"),
    }
    assert_eq!(assistant.schedule().len(), 1);
}
