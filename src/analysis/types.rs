//! The validated risk-assessment record and its nested parts.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationIssue;

use super::validate::read_value;

/// Overall risk bucket reported by the model.
///
/// Serializes to the upper-case literals the prompt asks for (`"HIGH"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// Literals accepted on the wire, in severity order.
    pub const LITERALS: &'static [&'static str] = &["CRITICAL", "HIGH", "MEDIUM", "LOW"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Exact match against the wire literals, no case folding.
    pub fn from_literal(s: &str) -> Option<Self> {
        match s {
            "CRITICAL" => Some(Self::Critical),
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the sender of the message is trying to achieve.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentDetection {
    pub(crate) primary_intent: String,
    pub(crate) sub_intents: Vec<String>,
    pub(crate) targeted_action: String,
}

impl IntentDetection {
    pub fn primary_intent(&self) -> &str {
        &self.primary_intent
    }

    pub fn sub_intents(&self) -> &[String] {
        &self.sub_intents
    }

    /// May be empty when the message asks for nothing.
    pub fn targeted_action(&self) -> &str {
        &self.targeted_action
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinguisticAnalysis {
    pub(crate) tone: Vec<String>,
    pub(crate) manipulation_tactics: Vec<String>,
    pub(crate) urgency_level: u8,
    pub(crate) emotional_triggers: Vec<String>,
}

impl LinguisticAnalysis {
    pub fn tone(&self) -> &[String] {
        &self.tone
    }

    pub fn manipulation_tactics(&self) -> &[String] {
        &self.manipulation_tactics
    }

    /// 0..=100
    pub fn urgency_level(&self) -> u8 {
        self.urgency_level
    }

    pub fn emotional_triggers(&self) -> &[String] {
        &self.emotional_triggers
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordFrequency {
    pub(crate) keyword: String,
    pub(crate) count: u64,
}

impl KeywordFrequency {
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub(crate) category: String,
    pub(crate) percentage: f64,
}

impl CategoryShare {
    pub fn category(&self) -> &str {
        &self.category
    }

    /// 0.0..=100.0
    pub fn percentage(&self) -> f64 {
        self.percentage
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentScore {
    pub(crate) component: String,
    pub(crate) score: f64,
}

impl ComponentScore {
    pub fn component(&self) -> &str {
        &self.component
    }

    /// 0.0..=100.0
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Chart-ready series. Every sequence may be empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphData {
    pub(crate) keyword_frequency: Vec<KeywordFrequency>,
    pub(crate) category_breakdown: Vec<CategoryShare>,
    pub(crate) component_scores: Vec<ComponentScore>,
}

impl GraphData {
    pub fn keyword_frequency(&self) -> &[KeywordFrequency] {
        &self.keyword_frequency
    }

    pub fn category_breakdown(&self) -> &[CategoryShare] {
        &self.category_breakdown
    }

    pub fn component_scores(&self) -> &[ComponentScore] {
        &self.component_scores
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAdviser {
    pub(crate) summary: String,
    pub(crate) verdict: String,
    pub(crate) action_plan: Vec<String>,
}

impl AiAdviser {
    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn verdict(&self) -> &str {
        &self.verdict
    }

    pub fn action_plan(&self) -> &[String] {
        &self.action_plan
    }
}

/// A fully validated fraud-risk assessment.
///
/// Records are only built by the validator: [`crate::analysis::extract_and_validate`]
/// for completion text, or `Deserialize`, which runs the same checks on the
/// parsed JSON. Outside the crate the record is read-only:
///
/// ```compile_fail
/// fn bump(result: &mut scamguard::AnalysisResult) {
///     result.risk_score = 250;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Value")]
pub struct AnalysisResult {
    pub(crate) risk_score: u8,
    pub(crate) risk_level: RiskLevel,
    pub(crate) reason: String,
    pub(crate) suspicious_words: Vec<String>,
    pub(crate) suspicious_patterns: Vec<String>,
    pub(crate) recommendations: Vec<String>,
    pub(crate) confidence: u8,
    pub(crate) detection_factors: Vec<String>,
    pub(crate) intent_detection: IntentDetection,
    pub(crate) linguistic_analysis: LinguisticAnalysis,
    pub(crate) graph_data: GraphData,
    pub(crate) ai_adviser: AiAdviser,
}

impl AnalysisResult {
    /// 0..=100
    pub fn risk_score(&self) -> u8 {
        self.risk_score
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn suspicious_words(&self) -> &[String] {
        &self.suspicious_words
    }

    pub fn suspicious_patterns(&self) -> &[String] {
        &self.suspicious_patterns
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    /// 0..=100
    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    pub fn detection_factors(&self) -> &[String] {
        &self.detection_factors
    }

    pub fn intent_detection(&self) -> &IntentDetection {
        &self.intent_detection
    }

    pub fn linguistic_analysis(&self) -> &LinguisticAnalysis {
        &self.linguistic_analysis
    }

    pub fn graph_data(&self) -> &GraphData {
        &self.graph_data
    }

    pub fn ai_adviser(&self) -> &AiAdviser {
        &self.ai_adviser
    }
}

impl TryFrom<Value> for AnalysisResult {
    type Error = ValidationIssue;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        read_value(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_serializes_uppercase() {
        let json = serde_json::to_string(&RiskLevel::Critical).unwrap();
        assert_eq!(json, r#""CRITICAL""#);
    }

    #[test]
    fn test_risk_level_literals_match_as_str() {
        for literal in RiskLevel::LITERALS {
            let level = RiskLevel::from_literal(literal).unwrap();
            assert_eq!(level.as_str(), *literal);
        }
    }

    #[test]
    fn test_risk_level_rejects_lowercase() {
        assert_eq!(RiskLevel::from_literal("high"), None);
    }

    fn valid_json() -> Value {
        serde_json::json!({
            "riskScore": 40,
            "riskLevel": "MEDIUM",
            "reason": "Unsolicited link",
            "suspiciousWords": [],
            "suspiciousPatterns": [],
            "recommendations": [],
            "confidence": 70,
            "detectionFactors": [],
            "intentDetection": {"primaryIntent": "marketing", "subIntents": [], "targetedAction": ""},
            "linguisticAnalysis": {"tone": [], "manipulationTactics": [], "urgencyLevel": 10, "emotionalTriggers": []},
            "graphData": {"keywordFrequency": [], "categoryBreakdown": [], "componentScores": []},
            "aiAdviser": {"summary": "Probably spam", "verdict": "Medium risk", "actionPlan": []}
        })
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let mut payload = valid_json();
        payload["riskScore"] = serde_json::json!(200);
        payload["confidence"] = serde_json::json!(255);
        payload["reason"] = serde_json::json!("");

        let err = serde_json::from_value::<AnalysisResult>(payload.clone()).unwrap_err();
        assert!(err.to_string().contains("riskScore"), "{}", err);

        let err = serde_json::from_str::<AnalysisResult>(&payload.to_string()).unwrap_err();
        assert!(err.to_string().contains("outside 0..=100"), "{}", err);
    }

    #[test]
    fn test_deserialize_rejects_lowercase_level() {
        let mut payload = valid_json();
        payload["riskLevel"] = serde_json::json!("medium");
        assert!(serde_json::from_value::<AnalysisResult>(payload).is_err());
    }

    #[test]
    fn test_deserialize_matches_validator() {
        let text = valid_json().to_string();
        let via_serde: AnalysisResult = serde_json::from_str(&text).unwrap();
        let via_validator = crate::analysis::extract_and_validate(&text).unwrap();

        assert_eq!(via_serde, via_validator);
        assert_eq!(via_serde.risk_level(), RiskLevel::Medium);
        assert_eq!(via_serde.intent_detection().targeted_action(), "");
    }
}
