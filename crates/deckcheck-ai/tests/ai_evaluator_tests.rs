//! AI evaluator against a simulated OpenAI-compatible server

use std::sync::Arc;

use async_trait::async_trait;
use deckcheck_ai::evaluator::{FAILURE_REASON, QUOTA_REASON, UNSTRUCTURED_REASON};
use deckcheck_ai::{
    AiCheckRequest, AiEvaluator, DeckSummary, OpenAiReasoner, ReasoningError, ReasoningService,
};
use deckcheck_core::AiCheck;
use std::sync::atomic::{AtomicUsize, Ordering};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn evaluator_for(server: &MockServer) -> AiEvaluator {
    let reasoner = OpenAiReasoner::new("test-key", "test-model")
        .with_base_url(server.uri())
        .with_timeout(5);
    AiEvaluator::new(Some(Arc::new(reasoner)))
}

fn title_check() -> AiCheck {
    AiCheck::new("ai-title", "Has a proper title slide", "Decide if slide 1 is a title slide.")
}

fn summary() -> DeckSummary {
    DeckSummary {
        page_count: Some(12),
        images_approx: Some(0),
        bullets_approx: Some(30),
        ..DeckSummary::default()
    }
}

/// Counts calls; always errors
struct CountingService {
    calls: AtomicUsize,
}

#[async_trait]
impl ReasoningService for CountingService {
    fn name(&self) -> &str {
        "counting"
    }

    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, ReasoningError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ReasoningError::Network("unreachable".to_string()))
    }
}

#[tokio::test]
async fn test_structured_verdict_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({ "model": "test-model", "temperature": 0.1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "```json\n{\"pass\": false, \"reasons\": [\"Slide 1 looks like an agenda\", 7]}\n```",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let verdict = evaluator_for(&server).evaluate(&title_check(), &summary()).await;

    assert!(!verdict.pass);
    assert!(!verdict.fallback);
    assert_eq!(verdict.reasons, vec!["⚠️ Slide 1 looks like an agenda"]);
}

#[tokio::test]
async fn test_unstructured_output_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Looks great to me!")))
        .mount(&server)
        .await;

    let verdict = evaluator_for(&server).evaluate(&title_check(), &summary()).await;

    assert!(verdict.pass);
    assert!(verdict.fallback);
    assert_eq!(verdict.reasons, vec![UNSTRUCTURED_REASON.to_string()]);
}

#[tokio::test]
async fn test_quota_error_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": { "message": "You exceeded your current quota", "type": "insufficient_quota" }
        })))
        .mount(&server)
        .await;

    let verdict = evaluator_for(&server).evaluate(&title_check(), &summary()).await;

    assert!(verdict.pass);
    assert!(verdict.fallback);
    assert_eq!(verdict.reasons, vec![QUOTA_REASON.to_string()]);
    assert!(verdict.error.is_some());
}

#[tokio::test]
async fn test_server_error_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let verdict = evaluator_for(&server).evaluate(&title_check(), &summary()).await;

    assert!(verdict.pass);
    assert!(verdict.fallback);
    assert_eq!(verdict.reasons, vec![FAILURE_REASON.to_string()]);
}

#[tokio::test]
async fn test_short_circuit_skips_service() {
    let service = Arc::new(CountingService {
        calls: AtomicUsize::new(0),
    });
    let evaluator = AiEvaluator::new(Some(service.clone()));

    let request = AiCheckRequest {
        rule_id: "custom-visuals".to_string(),
        rule_label: "Contains IMAGES".to_string(),
        prompt: "Check images".to_string(),
        deck_summary: DeckSummary {
            images_approx: Some(2),
            ..DeckSummary::default()
        },
    };
    let verdict = evaluator.evaluate_request(&request).await;

    assert!(verdict.pass);
    assert!(!verdict.fallback);
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_service_error_never_propagates() {
    let service = Arc::new(CountingService {
        calls: AtomicUsize::new(0),
    });
    let evaluator = AiEvaluator::new(Some(service.clone()));

    let verdict = evaluator.evaluate(&title_check(), &summary()).await;

    assert!(verdict.pass);
    assert!(verdict.fallback);
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
}
