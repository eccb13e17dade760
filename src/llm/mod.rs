//! Remote model access: the completion trait, the Gemini client and
//! caller-side retry.

pub mod client;
pub mod gemini;
pub mod retry;

pub use client::CompletionClient;
pub use gemini::GeminiClient;
pub use retry::{RetryPolicy, retry_with_backoff};
