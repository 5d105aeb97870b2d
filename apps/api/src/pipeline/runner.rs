//! Pipeline runner. Executes the six stages strictly in sequence.
//!
//! Flow: clean → rewrite → refine → cover_letter → skill_gap → evaluate.
//! Cover letter, skill gap and evaluate each read the refine output plus job
//! metadata and do not depend on one another.
//!
//! No retries and no timeout of its own: the runtime enforces each profile's
//! execution-time ceiling. The first failing stage aborts the run and the
//! results of earlier stages are dropped.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::AgentRuntime;
use crate::pipeline::agents::AgentProfile;
use crate::pipeline::prompts::{
    build_clean_request, build_cover_letter_request, build_evaluate_request,
    build_refine_request, build_rewrite_request, build_skill_gap_request, StageRequest,
};

/// The six textual artifacts of one run. Nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineOutput {
    pub cleaned: String,
    pub rewritten: String,
    pub final_resume: String,
    pub evaluation: String,
    pub cover_letter: String,
    pub skill_gap: String,
}

/// Runs the full pipeline over the extracted resume text.
///
/// Job title and description are passed through as given; checking that they
/// are non-empty is the caller's job.
pub async fn run_pipeline(
    runtime: &dyn AgentRuntime,
    document_text: &str,
    job_title: &str,
    job_description: &str,
) -> Result<PipelineOutput, AppError> {
    let started = Instant::now();

    let cleaned = run_stage(runtime, build_clean_request(document_text)).await?;

    let rewritten = run_stage(
        runtime,
        build_rewrite_request(&cleaned, job_title, job_description),
    )
    .await?;

    let final_resume = run_stage(runtime, build_refine_request(&rewritten)).await?;

    let cover_letter = run_stage(
        runtime,
        build_cover_letter_request(&final_resume, job_title, job_description),
    )
    .await?;

    let skill_gap = run_stage(
        runtime,
        build_skill_gap_request(&final_resume, job_title, job_description),
    )
    .await?;

    let evaluation = run_stage(
        runtime,
        build_evaluate_request(&final_resume, job_title, job_description),
    )
    .await?;

    info!(
        "Pipeline finished for '{}' in {}ms",
        job_title,
        started.elapsed().as_millis()
    );

    Ok(PipelineOutput {
        cleaned,
        rewritten,
        final_resume,
        evaluation,
        cover_letter,
        skill_gap,
    })
}

/// One blocking stage call; the result is trimmed of surrounding whitespace.
async fn run_stage(runtime: &dyn AgentRuntime, request: StageRequest) -> Result<String, AppError> {
    let profile = AgentProfile::for_stage(request.stage);
    let started = Instant::now();
    debug!(
        "Stage {} starting: temperature={}, max_iter={}, budget={}s, instruction={} chars",
        request.stage,
        profile.temperature,
        profile.max_iter,
        profile.max_execution_time.as_secs(),
        request.instruction.chars().count()
    );

    let output = runtime
        .execute(profile, &request)
        .await
        .map_err(|e| AppError::Llm(format!("{} stage failed: {e}", request.stage)))?;

    info!(
        "Stage {} ({}) completed in {}ms, {} chars",
        request.stage,
        profile.role,
        started.elapsed().as_millis(),
        output.trim().chars().count()
    );

    Ok(output.trim().to_string())
}
