//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use scamguard::{Config, GeminiClient};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const TEST_MODEL: &str = "gemini-test";
pub const TEST_API_KEY: &str = "test-key";
pub const ENDPOINT_PATH: &str = "/v1beta/models/gemini-test:generateContent";

/// Get the path to test fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Get the path to a completion-text fixture.
pub fn completion_fixture(name: &str) -> PathBuf {
    fixtures_dir().join("completions").join(name)
}

/// Read a fixture file as a string.
pub fn read_fixture(path: PathBuf) -> String {
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {:?}: {}", path, e))
}

/// Wrap completion text in a `generateContent` response envelope.
pub fn gemini_envelope(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": text }]
            },
            "finishReason": "STOP"
        }]
    })
}

/// Client pointed at the mock server with a short timeout.
pub fn mock_client(server: &MockServer) -> GeminiClient {
    let config = Config::default()
        .with_api_url(server.uri())
        .with_model(TEST_MODEL)
        .with_api_key(TEST_API_KEY)
        .with_timeout(Duration::from_secs(5));
    GeminiClient::new(&config).expect("Failed to build client")
}
