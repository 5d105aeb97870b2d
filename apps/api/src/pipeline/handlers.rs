//! Axum route handlers for extraction and pipeline runs.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{self, Document, DocumentKind};
use crate::pipeline::report::{score_headline, EvaluationReport, SkillGapReport, StructuredOutput};
use crate::pipeline::runner::{run_pipeline, PipelineOutput};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Multipart form of a run request. Every field is optional at this level;
/// the handler decides what is required.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file_name: Option<String>,
    pub file: Option<Bytes>,
    pub job_title: Option<String>,
    pub job_description: Option<String>,
}

impl UploadForm {
    fn take_file(&mut self) -> Result<(String, Bytes), AppError> {
        match (self.file_name.take(), self.file.take()) {
            (Some(name), Some(bytes)) => Ok((name, bytes)),
            _ => Err(AppError::Validation(
                "Please upload a resume file.".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub kind: DocumentKind,
    pub char_count: usize,
    pub text: String,
}

/// Headline numbers pulled from the two JSON-shaped artifacts.
#[derive(Debug, Default, Serialize)]
pub struct Highlights {
    pub overall_score: Option<String>,
    pub missing_keywords: Vec<Value>,
    pub quick_wins: Vec<Value>,
    pub missing_skills: Vec<Value>,
    pub priority_gaps: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub document_kind: DocumentKind,
    pub artifacts: PipelineOutput,
    pub evaluation: StructuredOutput,
    pub skill_gap: StructuredOutput,
    pub highlights: Highlights,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/extract
///
/// Extracts the text of an uploaded resume without running the pipeline.
pub async fn handle_extract(multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    let mut form = read_upload_form(multipart).await?;
    let (file_name, file) = form.take_file()?;
    let document = extract_upload(file_name, file).await?;

    Ok(Json(ExtractResponse {
        kind: document.kind,
        char_count: document.text.chars().count(),
        text: document.text,
    }))
}

/// POST /api/v1/pipeline/run
///
/// Upload → extract → six sequential stages. Returns every artifact plus the
/// parsed (or raw, if unparseable) evaluation and skill-gap reports.
pub async fn handle_run(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<RunResponse>, AppError> {
    let mut form = read_upload_form(multipart).await?;

    let (file_name, file) = form.take_file()?;
    let job_title = required_field(form.job_title.as_deref(), "job title")?;
    let job_description = required_field(form.job_description.as_deref(), "job description")?;

    let document = extract_upload(file_name, file).await?;
    if document.is_blank() {
        return Err(AppError::UnprocessableEntity(
            "Could not extract any text from the file.".to_string(),
        ));
    }

    let run_id = Uuid::new_v4();
    info!(
        "Run {run_id}: {} resume, {} chars, target '{job_title}'",
        document.kind.as_str(),
        document.text.chars().count()
    );

    let artifacts = run_pipeline(
        state.runtime.as_ref(),
        &document.text,
        &job_title,
        &job_description,
    )
    .await?;

    let evaluation = StructuredOutput::from_stage_output(&artifacts.evaluation);
    let skill_gap = StructuredOutput::from_stage_output(&artifacts.skill_gap);
    let highlights = collect_highlights(&evaluation, &skill_gap);

    Ok(Json(RunResponse {
        run_id,
        generated_at: Utc::now(),
        document_kind: document.kind,
        artifacts,
        evaluation,
        skill_gap,
        highlights,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                form.file_name = Some(field.file_name().unwrap_or("resume.txt").to_string());
                form.file = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Invalid file: {e}")))?,
                );
            }
            "job_title" | "job_description" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid {name}: {e}")))?;
                if name == "job_title" {
                    form.job_title = Some(value);
                } else {
                    form.job_description = Some(value);
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Extraction is CPU-bound; it runs on the blocking pool.
async fn extract_upload(file_name: String, bytes: Bytes) -> Result<Document, AppError> {
    tokio::task::spawn_blocking(move || extract::extract(&file_name, &bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Extraction task failed: {e}")))
}

fn required_field(value: Option<&str>, label: &str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::Validation(format!(
            "Please provide a target {label}."
        ))),
    }
}

fn collect_highlights(evaluation: &StructuredOutput, skill_gap: &StructuredOutput) -> Highlights {
    let mut highlights = Highlights {
        overall_score: evaluation.as_json().and_then(score_headline),
        ..Default::default()
    };

    if let Some(report) = evaluation.typed::<EvaluationReport>() {
        highlights.missing_keywords = report.missing_keywords;
        highlights.quick_wins = report.quick_wins;
    }

    if let Some(report) = skill_gap.typed::<SkillGapReport>() {
        highlights.missing_skills = report.missing_skills;
        highlights.priority_gaps = report
            .priority_gaps
            .into_iter()
            .map(|gap| {
                if gap.reason.is_empty() {
                    gap.skill
                } else {
                    format!("{}: {}", gap.skill, gap.reason)
                }
            })
            .collect();
    }

    highlights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field_trims() {
        assert_eq!(
            required_field(Some("  Backend Engineer \n"), "job title").unwrap(),
            "Backend Engineer"
        );
    }

    #[test]
    fn test_required_field_rejects_blank_and_missing() {
        assert!(matches!(
            required_field(Some("   "), "job title"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            required_field(None, "job description"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_highlights_from_parsed_reports() {
        let evaluation = StructuredOutput::from_stage_output(
            r#"{"overall_score": 88, "missing_keywords": ["Kafka"], "quick_wins": ["Add metrics"]}"#,
        );
        let skill_gap = StructuredOutput::from_stage_output(
            r#"{"missing_skills": ["Go"], "priority_gaps": [{"skill": "Go", "reason": "core stack"}]}"#,
        );
        let highlights = collect_highlights(&evaluation, &skill_gap);

        assert_eq!(highlights.overall_score.as_deref(), Some("88/100"));
        assert_eq!(highlights.missing_keywords, vec![Value::from("Kafka")]);
        assert_eq!(highlights.priority_gaps, vec!["Go: core stack".to_string()]);
    }

    #[test]
    fn test_highlights_from_raw_reports_are_empty() {
        let evaluation = StructuredOutput::from_stage_output("The resume is decent.");
        let skill_gap = StructuredOutput::from_stage_output("{'gaps': 'candidate's Go'}");
        let highlights = collect_highlights(&evaluation, &skill_gap);

        assert!(highlights.overall_score.is_none());
        assert!(highlights.missing_skills.is_empty());
        assert!(highlights.priority_gaps.is_empty());
    }

    #[test]
    fn test_form_without_file_is_rejected() {
        let mut form = UploadForm {
            job_title: Some("SRE".into()),
            ..Default::default()
        };
        assert!(matches!(form.take_file(), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_extract_upload_plain_text() {
        let document = extract_upload("cv.txt".into(), Bytes::from_static(b"John Doe"))
            .await
            .unwrap();
        assert_eq!(document.kind, DocumentKind::PlainText);
        assert_eq!(document.text, "John Doe");
    }
}
