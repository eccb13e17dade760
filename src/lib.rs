//! scamguard - Fraud-risk assessment of short messages by a hosted language model.
//!
//! # Overview
//!
//! scamguard builds a prompt that embeds the message and the exact JSON shape
//! expected back, sends it to a Gemini-compatible endpoint, then extracts and
//! strictly validates the JSON found in the free-form completion. All of the
//! judgement lives in the remote model; this crate owns the request/response
//! contract.

pub mod analysis;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;

// Re-export commonly used types
pub use analysis::{AnalysisResult, RiskLevel, build_prompt, extract_and_validate};
pub use analyzer::analyze;
pub use config::Config;
pub use error::{AnalysisError, ConfigError, InputError, IssueKind, UpstreamError, ValidationIssue};
pub use llm::{CompletionClient, GeminiClient, RetryPolicy};
