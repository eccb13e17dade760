//! Gemini `generateContent` client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{ConfigError, UpstreamError, truncate_for_diagnostics};

use super::client::CompletionClient;

/// Header carrying the API key. Keeps the credential out of URLs and logs.
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Client for the hosted Gemini model, or a proxy exposing the same API.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Build a client from validated configuration.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            http,
            endpoint: config.endpoint(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        debug!(prompt_len = prompt.len(), endpoint = %self.endpoint, "Sending completion request");

        let response = request.send().await.map_err(UpstreamError::Transport)?;
        let status = response.status();

        if !status.is_success() {
            // Body is kept for diagnostics only.
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: truncate_for_diagnostics(&body),
            });
        }

        let bytes = response.bytes().await.map_err(UpstreamError::Transport)?;
        let text = parse_completion(&bytes)?;

        debug!(completion_len = text.len(), "Received completion");
        Ok(text)
    }
}

/// Read `candidates[0].content.parts[0].text` from a response envelope.
fn parse_completion(body: &[u8]) -> Result<String, UpstreamError> {
    let envelope: GenerateContentResponse =
        serde_json::from_slice(body).map_err(UpstreamError::Decode)?;

    let candidate = envelope
        .candidates
        .into_iter()
        .next()
        .ok_or(UpstreamError::NoCandidates)?;

    candidate
        .content
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or(UpstreamError::EmptyCompletion)
}
