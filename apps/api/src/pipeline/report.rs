//! Rendering of the two JSON-shaped stage results (evaluation, skill gap).
//!
//! Producers are not guaranteed to emit valid JSON. Parsing is best-effort and
//! never fails: anything that does not come out as a JSON object is handed
//! back as raw text.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::llm_client::strip_json_fences;

/// Either the parsed object or the untouched model output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", content = "content", rename_all = "snake_case")]
pub enum StructuredOutput {
    Json(Value),
    Raw(String),
}

impl StructuredOutput {
    pub fn from_stage_output(raw: &str) -> Self {
        match parse_loose(raw) {
            Some(value) => StructuredOutput::Json(value),
            None => StructuredOutput::Raw(raw.to_string()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            StructuredOutput::Json(value) => Some(value),
            StructuredOutput::Raw(_) => None,
        }
    }

    /// Typed view of the parsed object; `None` for raw output or a shape mismatch.
    pub fn typed<T: DeserializeOwned>(&self) -> Option<T> {
        self.as_json()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

/// Parses loosely-formed JSON objects.
///
/// Tries the text as-is (minus markdown fences), then once more with every
/// `'` swapped for `"`. The swap handles Python-dict style output but breaks
/// apostrophes inside values, in which case `None` is returned.
pub fn parse_loose(raw: &str) -> Option<Value> {
    let text = strip_json_fences(raw);

    let parsed = serde_json::from_str::<Value>(text)
        .or_else(|_| serde_json::from_str::<Value>(&text.replace('\'', "\"")))
        .ok()?;

    parsed.is_object().then_some(parsed)
}

/// Expected shape of the evaluation stage. Every field is optional in practice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationReport {
    pub overall_score: Option<Value>,
    pub breakdown: Value,
    pub missing_keywords: Vec<Value>,
    pub quick_wins: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityGap {
    pub skill: String,
    pub reason: String,
}

/// Expected shape of the skill-gap stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGapReport {
    pub matched_skills: Vec<Value>,
    pub missing_skills: Vec<Value>,
    pub weak_skills: Vec<Value>,
    pub priority_gaps: Vec<PriorityGap>,
    pub recommendations: Vec<Value>,
}

/// Headline such as `"85/100"` when the evaluation carries an `overall_score`.
pub fn score_headline(evaluation: &Value) -> Option<String> {
    let score = evaluation.get("overall_score")?;
    match score {
        Value::Number(n) => Some(format!("{n}/100")),
        Value::String(s) if !s.trim().is_empty() => Some(format!("{}/100", s.trim())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_json_object() {
        let raw = r#"{"overall_score": 82, "missing_keywords": ["Go"], "quick_wins": []}"#;
        let value = parse_loose(raw).unwrap();
        assert_eq!(value["overall_score"], 82);
    }

    #[test]
    fn test_fenced_json() {
        let raw = "```json\n{\"matched_skills\": [\"Rust\"]}\n```";
        assert!(parse_loose(raw).is_some());
    }

    #[test]
    fn test_python_dict_style_is_repaired() {
        let raw = "{'overall_score': 74, 'quick_wins': ['Add metrics']}";
        let value = parse_loose(raw).unwrap();
        assert_eq!(value["quick_wins"][0], "Add metrics");
    }

    #[test]
    fn test_apostrophe_inside_single_quotes_falls_back_to_raw() {
        let raw = "{'quick_wins': ['Mention the candidate's Go work']}";
        assert!(parse_loose(raw).is_none());
        assert_eq!(
            StructuredOutput::from_stage_output(raw),
            StructuredOutput::Raw(raw.to_string())
        );
    }

    #[test]
    fn test_prose_falls_back_to_raw() {
        let raw = "Overall the resume scores about 80 out of 100.";
        assert_eq!(
            StructuredOutput::from_stage_output(raw),
            StructuredOutput::Raw(raw.to_string())
        );
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        assert!(parse_loose("[1, 2, 3]").is_none());
        assert!(parse_loose("42").is_none());
    }

    #[test]
    fn test_structured_output_serializes_with_tag() {
        let out = StructuredOutput::Raw("oops".into());
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["format"], "raw");
        assert_eq!(json["content"], "oops");
    }

    #[test]
    fn test_score_headline() {
        let value: Value = serde_json::json!({"overall_score": 85});
        assert_eq!(score_headline(&value).as_deref(), Some("85/100"));

        let value: Value = serde_json::json!({"overall_score": "72"});
        assert_eq!(score_headline(&value).as_deref(), Some("72/100"));

        let value: Value = serde_json::json!({"breakdown": {}});
        assert!(score_headline(&value).is_none());
    }

    #[test]
    fn test_partial_skill_gap_report_deserializes() {
        let value = parse_loose(
            r#"{"missing_skills": ["Go"], "priority_gaps": [{"skill": "Go"}]}"#,
        )
        .unwrap();
        let report: SkillGapReport = serde_json::from_value(value).unwrap();
        assert_eq!(report.missing_skills.len(), 1);
        assert_eq!(report.priority_gaps[0].skill, "Go");
        assert!(report.priority_gaps[0].reason.is_empty());
        assert!(report.matched_skills.is_empty());
    }

    #[test]
    fn test_typed_view_of_raw_output_is_none() {
        let out = StructuredOutput::from_stage_output("not json");
        assert!(out.typed::<EvaluationReport>().is_none());
    }

    #[test]
    fn test_partial_evaluation_report_deserializes() {
        let value = parse_loose(r#"{"overall_score": 61}"#).unwrap();
        let report: EvaluationReport = serde_json::from_value(value).unwrap();
        assert_eq!(report.overall_score, Some(Value::from(61)));
        assert!(report.quick_wins.is_empty());
    }
}
