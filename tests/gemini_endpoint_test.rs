//! End-to-end analysis against a mocked Gemini endpoint.

mod common;

use std::time::Duration;

use scamguard::llm::{CompletionClient, retry_with_backoff};
use scamguard::{AnalysisError, RetryPolicy, RiskLevel, UpstreamError, analyze};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_completion(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path(common::ENDPOINT_PATH))
        .and(header("x-goog-api-key", common::TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::gemini_envelope(text)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_scenario_a_prose_wrapped_completion() {
    let server = MockServer::start().await;
    let completion = common::read_fixture(common::completion_fixture("prose_wrapped.txt"));
    mount_completion(&server, &completion).await;

    let client = common::mock_client(&server);
    let result = analyze(&client, "Your account will be suspended. Verify immediately!")
        .await
        .expect("analysis should succeed");

    assert_eq!(result.risk_level(), RiskLevel::High);
    assert_eq!(result.risk_score(), 85);
    assert_eq!(result.suspicious_words(), vec!["urgent", "verify immediately"]);
    assert_eq!(result.intent_detection().targeted_action(), "credential theft");
}

#[tokio::test]
async fn test_request_body_carries_prompt_with_message() {
    let server = MockServer::start().await;
    let completion = common::read_fixture(common::completion_fixture("prose_wrapped.txt"));
    mount_completion(&server, &completion).await;

    let message = "He said \"pay now\"\nor {else}";
    let client = common::mock_client(&server);
    analyze(&client, message).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains(message));
    assert!(prompt.contains("\"riskLevel\""));
    assert!(!requests[0].url.as_str().contains(common::TEST_API_KEY));
}

#[tokio::test]
async fn test_scenario_b_refusal_is_no_payload() {
    let server = MockServer::start().await;
    let completion = common::read_fixture(common::completion_fixture("refusal.txt"));
    mount_completion(&server, &completion).await;

    let client = common::mock_client(&server);
    let err = analyze(&client, "some message").await.unwrap_err();

    assert!(matches!(err, AnalysisError::NoJsonPayloadFound { .. }));
    assert!(err.raw_completion().unwrap().contains("I cannot analyze this."));
}

#[tokio::test]
async fn test_scenario_c_missing_risk_level_is_incomplete() {
    let server = MockServer::start().await;
    let completion = common::read_fixture(common::completion_fixture("missing_risk_level.txt"));
    mount_completion(&server, &completion).await;

    let client = common::mock_client(&server);
    let err = analyze(&client, "some message").await.unwrap_err();

    match err {
        AnalysisError::IncompleteResult { issue, .. } => assert_eq!(issue.path, "riskLevel"),
        other => panic!("Expected IncompleteResult, got {:?}", other),
    }
}

#[tokio::test]
async fn test_scenario_d_http_error_is_upstream_failure() {
    let server = MockServer::start().await;
    // A body that would validate, to prove it is never parsed.
    let completion = common::read_fixture(common::completion_fixture("prose_wrapped.txt"));
    Mock::given(method("POST"))
        .and(path(common::ENDPOINT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(common::gemini_envelope(&completion)))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::mock_client(&server);
    let err = analyze(&client, "some message").await.unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::UpstreamCallFailed(UpstreamError::Status { status: 500, .. })
    ));
    assert!(err.raw_completion().is_none());
}

#[tokio::test]
async fn test_rejected_key_is_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}
        })))
        .mount(&server)
        .await;

    let client = common::mock_client(&server);
    let err = analyze(&client, "some message").await.unwrap_err();

    match err {
        AnalysisError::UpstreamCallFailed(UpstreamError::Status { status, body }) => {
            assert_eq!(status, 403);
            assert!(body.contains("API key not valid"));
        }
        other => panic!("Expected upstream status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_candidates_is_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [],
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let client = common::mock_client(&server);
    let err = analyze(&client, "some message").await.unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::UpstreamCallFailed(UpstreamError::NoCandidates)
    ));
}

#[tokio::test]
async fn test_transport_failure_is_upstream_failure() {
    // Reserve a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = scamguard::Config::default()
        .with_api_url(format!("http://{}", addr))
        .with_model(common::TEST_MODEL)
        .with_timeout(Duration::from_secs(2));
    let client = scamguard::GeminiClient::new(&config).unwrap();

    let err = client.complete("prompt").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Transport(_)));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::gemini_envelope("{}"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = scamguard::Config::default()
        .with_api_url(server.uri())
        .with_model(common::TEST_MODEL)
        .with_timeout(Duration::from_millis(200));
    let client = scamguard::GeminiClient::new(&config).unwrap();

    let err = analyze(&client, "some message").await.unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::UpstreamCallFailed(UpstreamError::Transport(_))
    ));
}

#[tokio::test]
async fn test_caller_retry_recovers_from_unavailable_endpoint() {
    let server = MockServer::start().await;
    let completion = common::read_fixture(common::completion_fixture("prose_wrapped.txt"));

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_completion(&server, &completion).await;

    let client = common::mock_client(&server);
    let policy = RetryPolicy {
        max_attempts: 3,
        initial_interval: Duration::from_millis(10),
        max_interval: Duration::from_millis(50),
    };

    let result = retry_with_backoff(policy, AnalysisError::is_upstream, || {
        analyze(&client, "some message")
    })
    .await
    .expect("third attempt should succeed");

    assert_eq!(result.risk_score(), 85);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_caller_retry_skips_content_errors() {
    let server = MockServer::start().await;
    let completion = common::read_fixture(common::completion_fixture("refusal.txt"));
    mount_completion(&server, &completion).await;

    let client = common::mock_client(&server);
    let policy = RetryPolicy {
        max_attempts: 3,
        initial_interval: Duration::from_millis(10),
        max_interval: Duration::from_millis(50),
    };

    let err = retry_with_backoff(policy, AnalysisError::is_upstream, || {
        analyze(&client, "some message")
    })
    .await
    .unwrap_err();

    assert!(matches!(err, AnalysisError::NoJsonPayloadFound { .. }));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_analyses_are_independent() {
    let server = MockServer::start().await;
    let completion = common::read_fixture(common::completion_fixture("prose_wrapped.txt"));
    mount_completion(&server, &completion).await;

    let client = common::mock_client(&server);
    let (a, b, c) = tokio::join!(
        analyze(&client, "first message here"),
        analyze(&client, "second message here"),
        analyze(&client, "third message here"),
    );

    for result in [a, b, c] {
        assert_eq!(result.unwrap().risk_level(), RiskLevel::High);
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}
