//! Message risk analysis: prompt construction, completion extraction and
//! validation.

pub mod extract;
pub mod prompt;
pub mod types;
pub mod validate;

pub use extract::candidate_span;
pub use prompt::build_prompt;
pub use types::{
    AiAdviser, AnalysisResult, CategoryShare, ComponentScore, GraphData, IntentDetection,
    KeywordFrequency, LinguisticAnalysis, RiskLevel,
};
pub use validate::extract_and_validate;
