//! The single entry point: message in, validated analysis out.

use tracing::{debug, info, warn};

use crate::analysis::{AnalysisResult, build_prompt, extract_and_validate};
use crate::error::AnalysisError;
use crate::llm::CompletionClient;

/// Analyze `message` for fraud risk using `client` as the remote model.
///
/// Builds the prompt, makes exactly one completion call and validates the
/// reply. Holds no state between calls, so independent callers may run it
/// concurrently. Length limits are the caller's concern.
///
/// # Errors
/// [`AnalysisError::UpstreamCallFailed`] if the remote call fails (nothing is
/// parsed in that case), otherwise any error from
/// [`extract_and_validate`].
pub async fn analyze<C>(client: &C, message: &str) -> Result<AnalysisResult, AnalysisError>
where
    C: CompletionClient + ?Sized,
{
    let prompt = build_prompt(message);
    debug!(message_len = message.len(), prompt_len = prompt.len(), "Built analysis prompt");

    let completion = client.complete(&prompt).await.map_err(|e| {
        warn!(kind = "upstream_call_failed", "Completion call failed: {}", e);
        AnalysisError::UpstreamCallFailed(e)
    })?;

    let result = extract_and_validate(&completion)?;

    info!(
        risk_level = %result.risk_level(),
        risk_score = result.risk_score(),
        confidence = result.confidence(),
        "Analysis complete"
    );
    Ok(result)
}
