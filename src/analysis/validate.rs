//! Response extraction and strict schema validation.
//!
//! The completion is untrusted text. Validation is all-or-nothing: the first
//! missing field, wrong type, out-of-range number or empty required string
//! rejects the whole completion. Nothing is coerced.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{AnalysisError, IssueKind, ValidationIssue};

use super::extract::candidate_span;
use super::types::{
    AiAdviser, AnalysisResult, CategoryShare, ComponentScore, GraphData, IntentDetection,
    KeywordFrequency, LinguisticAnalysis, RiskLevel,
};

const PERCENT_RANGE: &str = "0..=100";

/// Turn a raw completion into a validated [`AnalysisResult`].
///
/// # Errors
/// - [`AnalysisError::NoJsonPayloadFound`] when no `{ ... }` span exists.
/// - [`AnalysisError::MalformedJson`] when the span is not valid JSON.
/// - [`AnalysisError::IncompleteResult`] when any field of the record is
///   missing, mistyped, out of range or empty where it must not be.
pub fn extract_and_validate(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    let outcome = validate_completion(raw);

    if let Err(ref err) = outcome {
        warn!(kind = err.kind(), "Rejected completion: {}", err);
        debug!(raw_len = raw.len(), "Rejected completion text: {}", raw);
    }

    outcome
}

fn validate_completion(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    let candidate = candidate_span(raw).ok_or_else(|| AnalysisError::no_payload(raw))?;

    let value: Value =
        serde_json::from_str(candidate).map_err(|e| AnalysisError::malformed(e, raw))?;

    read_value(&value).map_err(|issue| AnalysisError::incomplete(issue, raw))
}

/// Validate an already parsed JSON value against the full record schema.
pub(crate) fn read_value(value: &Value) -> Result<AnalysisResult, ValidationIssue> {
    let Value::Object(map) = value else {
        return Err(ValidationIssue::new(
            "<root>",
            IssueKind::WrongType { expected: "object" },
        ));
    };

    read_result(Fields::root(map))
}

fn read_result(fields: Fields<'_>) -> Result<AnalysisResult, ValidationIssue> {
    // The headline fields go first so their failures are reported ahead of
    // problems in the detail sections.
    let risk_score = fields.percent_int("riskScore")?;
    let risk_level = fields.risk_level("riskLevel")?;
    let reason = fields.non_empty_string("reason")?;

    let suspicious_words = fields.string_list("suspiciousWords")?;
    let suspicious_patterns = fields.string_list("suspiciousPatterns")?;
    let recommendations = fields.string_list("recommendations")?;
    let confidence = fields.percent_int("confidence")?;
    let detection_factors = fields.string_list("detectionFactors")?;

    let intent = fields.object("intentDetection")?;
    let intent_detection = IntentDetection {
        primary_intent: intent.non_empty_string("primaryIntent")?,
        sub_intents: intent.string_list("subIntents")?,
        targeted_action: intent.string("targetedAction")?,
    };

    let linguistic = fields.object("linguisticAnalysis")?;
    let linguistic_analysis = LinguisticAnalysis {
        tone: linguistic.string_list("tone")?,
        manipulation_tactics: linguistic.string_list("manipulationTactics")?,
        urgency_level: linguistic.percent_int("urgencyLevel")?,
        emotional_triggers: linguistic.string_list("emotionalTriggers")?,
    };

    let graph = fields.object("graphData")?;
    let graph_data = GraphData {
        keyword_frequency: graph.list_of("keywordFrequency", |item| {
            Ok(KeywordFrequency {
                keyword: item.string("keyword")?,
                count: item.count("count")?,
            })
        })?,
        category_breakdown: graph.list_of("categoryBreakdown", |item| {
            Ok(CategoryShare {
                category: item.string("category")?,
                percentage: item.percent_number("percentage")?,
            })
        })?,
        component_scores: graph.list_of("componentScores", |item| {
            Ok(ComponentScore {
                component: item.string("component")?,
                score: item.percent_number("score")?,
            })
        })?,
    };

    let adviser = fields.object("aiAdviser")?;
    let ai_adviser = AiAdviser {
        summary: adviser.non_empty_string("summary")?,
        verdict: adviser.non_empty_string("verdict")?,
        action_plan: adviser.string_list("actionPlan")?,
    };

    Ok(AnalysisResult {
        risk_score,
        risk_level,
        reason,
        suspicious_words,
        suspicious_patterns,
        recommendations,
        confidence,
        detection_factors,
        intent_detection,
        linguistic_analysis,
        graph_data,
        ai_adviser,
    })
}

/// Typed, path-aware access to one JSON object.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    prefix: String,
}

impl<'a> Fields<'a> {
    fn root(map: &'a Map<String, Value>) -> Self {
        Self {
            map,
            prefix: String::new(),
        }
    }

    fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.prefix, key)
        }
    }

    fn issue(&self, key: &str, kind: IssueKind) -> ValidationIssue {
        ValidationIssue::new(self.path(key), kind)
    }

    /// A present, non-null value.
    fn get(&self, key: &str) -> Result<&'a Value, ValidationIssue> {
        match self.map.get(key) {
            None | Some(Value::Null) => Err(self.issue(key, IssueKind::Missing)),
            Some(value) => Ok(value),
        }
    }

    fn string(&self, key: &str) -> Result<String, ValidationIssue> {
        match self.get(key)? {
            Value::String(s) => Ok(s.clone()),
            _ => Err(self.issue(key, IssueKind::WrongType { expected: "string" })),
        }
    }

    fn non_empty_string(&self, key: &str) -> Result<String, ValidationIssue> {
        let s = self.string(key)?;
        if s.trim().is_empty() {
            return Err(self.issue(key, IssueKind::Empty));
        }
        Ok(s)
    }

    fn string_list(&self, key: &str) -> Result<Vec<String>, ValidationIssue> {
        let Value::Array(items) = self.get(key)? else {
            return Err(self.issue(key, IssueKind::WrongType { expected: "array of strings" }));
        };

        items
            .iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(ValidationIssue::new(
                    format!("{}[{}]", self.path(key), idx),
                    IssueKind::WrongType { expected: "string" },
                )),
            })
            .collect()
    }

    /// Integer in 0..=100. Floats such as `85.0` are rejected, not truncated.
    fn percent_int(&self, key: &str) -> Result<u8, ValidationIssue> {
        let Value::Number(number) = self.get(key)? else {
            return Err(self.issue(key, IssueKind::WrongType { expected: "integer" }));
        };
        if number.is_f64() {
            return Err(self.issue(key, IssueKind::WrongType { expected: "integer" }));
        }

        match number.as_i64() {
            Some(n) if (0..=100).contains(&n) => Ok(n as u8),
            _ => Err(self.issue(key, IssueKind::OutOfRange { expected: PERCENT_RANGE })),
        }
    }

    /// Number (integer or float) in 0..=100.
    fn percent_number(&self, key: &str) -> Result<f64, ValidationIssue> {
        let Value::Number(number) = self.get(key)? else {
            return Err(self.issue(key, IssueKind::WrongType { expected: "number" }));
        };

        match number.as_f64() {
            Some(n) if (0.0..=100.0).contains(&n) => Ok(n),
            _ => Err(self.issue(key, IssueKind::OutOfRange { expected: PERCENT_RANGE })),
        }
    }

    /// Non-negative integer.
    fn count(&self, key: &str) -> Result<u64, ValidationIssue> {
        let Value::Number(number) = self.get(key)? else {
            return Err(self.issue(key, IssueKind::WrongType { expected: "integer" }));
        };
        if number.is_f64() {
            return Err(self.issue(key, IssueKind::WrongType { expected: "integer" }));
        }

        number
            .as_u64()
            .ok_or_else(|| self.issue(key, IssueKind::OutOfRange { expected: ">= 0" }))
    }

    fn risk_level(&self, key: &str) -> Result<RiskLevel, ValidationIssue> {
        let Value::String(s) = self.get(key)? else {
            return Err(self.issue(key, IssueKind::WrongType { expected: "string" }));
        };

        RiskLevel::from_literal(s).ok_or_else(|| {
            self.issue(
                key,
                IssueKind::UnknownLiteral {
                    allowed: RiskLevel::LITERALS,
                },
            )
        })
    }

    fn object(&self, key: &str) -> Result<Fields<'a>, ValidationIssue> {
        let Value::Object(map) = self.get(key)? else {
            return Err(self.issue(key, IssueKind::WrongType { expected: "object" }));
        };
        Ok(Fields {
            map,
            prefix: self.path(key),
        })
    }

    fn list_of<T>(
        &self,
        key: &str,
        read_item: impl Fn(Fields<'a>) -> Result<T, ValidationIssue>,
    ) -> Result<Vec<T>, ValidationIssue> {
        let Value::Array(items) = self.get(key)? else {
            return Err(self.issue(key, IssueKind::WrongType { expected: "array of objects" }));
        };

        items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let item_path = format!("{}[{}]", self.path(key), idx);
                match item {
                    Value::Object(map) => read_item(Fields {
                        map,
                        prefix: item_path,
                    }),
                    _ => Err(ValidationIssue::new(
                        item_path,
                        IssueKind::WrongType { expected: "object" },
                    )),
                }
            })
            .collect()
    }
}
