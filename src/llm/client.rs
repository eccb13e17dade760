//! The one capability the analysis core needs from its environment.

use async_trait::async_trait;

use crate::error::UpstreamError;

/// Sends a prompt to a hosted language model and returns the raw completion.
///
/// Implementations make exactly one request per call: no retry, no streaming,
/// no partial results. The returned text is untrusted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError>;
}
