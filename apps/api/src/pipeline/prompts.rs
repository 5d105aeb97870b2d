//! Stage prompt builders: one pure template function per stage.
//!
//! Every upstream text is truncated independently to a fixed character
//! ceiling before it is interpolated; truncation may cut mid-word.

use std::fmt;

use serde::Serialize;

/// Appended to any text that was cut at its ceiling.
pub const ELLIPSIS: &str = "...";

pub const CLEAN_RESUME_CEILING: usize = 1500;
pub const REWRITE_RESUME_CEILING: usize = 1200;
pub const REWRITE_JD_CEILING: usize = 300;
pub const REFINE_RESUME_CEILING: usize = 1000;
pub const EVALUATE_RESUME_CEILING: usize = 800;
pub const EVALUATE_JD_CEILING: usize = 200;
pub const COVER_LETTER_JD_CEILING: usize = 400;
pub const COVER_LETTER_RESUME_CEILING: usize = 800;
pub const SKILL_GAP_JD_CEILING: usize = 400;
pub const SKILL_GAP_RESUME_CEILING: usize = 800;

/// One discrete step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Clean,
    Rewrite,
    Refine,
    CoverLetter,
    SkillGap,
    Evaluate,
}

impl Stage {
    /// Execution order.
    pub const ALL: [Stage; 6] = [
        Stage::Clean,
        Stage::Rewrite,
        Stage::Refine,
        Stage::CoverLetter,
        Stage::SkillGap,
        Stage::Evaluate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Clean => "clean",
            Stage::Rewrite => "rewrite",
            Stage::Refine => "refine",
            Stage::CoverLetter => "cover_letter",
            Stage::SkillGap => "skill_gap",
            Stage::Evaluate => "evaluate",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable instruction for one stage invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRequest {
    pub stage: Stage,
    pub instruction: String,
    /// Advisory only; nothing checks the answer against it.
    pub expected_output: &'static str,
}

/// First `ceiling` characters of `text` plus `ELLIPSIS` when longer,
/// otherwise `text` unchanged. Counts characters, not bytes.
pub fn truncate(text: &str, ceiling: usize) -> String {
    match text.char_indices().nth(ceiling) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn build_clean_request(raw_resume: &str) -> StageRequest {
    let resume = truncate(raw_resume, CLEAN_RESUME_CEILING);
    StageRequest {
        stage: Stage::Clean,
        instruction: format!(
            "Clean this resume text quickly:\n\n{resume}\n\n\
             Remove artifacts, normalize bullets to '-', keep all content. Be fast and direct."
        ),
        expected_output: "Clean resume text with proper structure.",
    }
}

pub fn build_rewrite_request(
    cleaned_resume: &str,
    job_title: &str,
    job_description: &str,
) -> StageRequest {
    let resume = truncate(cleaned_resume, REWRITE_RESUME_CEILING);
    let jd = truncate(job_description, REWRITE_JD_CEILING);
    StageRequest {
        stage: Stage::Rewrite,
        instruction: format!(
            "Rewrite resume for {job_title}:\n\n\
             JOB: {jd}\n\n\
             RESUME: {resume}\n\n\
             Match keywords, use action verbs, add metrics. Target 80+ ATS score. Be direct and fast."
        ),
        expected_output: "ATS-optimized resume with keyword placement and metrics.",
    }
}

pub fn build_refine_request(rewritten_resume: &str) -> StageRequest {
    let resume = truncate(rewritten_resume, REFINE_RESUME_CEILING);
    StageRequest {
        stage: Stage::Refine,
        instruction: format!(
            "Polish these bullets with action verbs and metrics:\n\n{resume}\n\n\
             Add strong verbs and numbers. Be fast and direct."
        ),
        expected_output: "Resume with enhanced bullet points and metrics.",
    }
}

pub fn build_cover_letter_request(
    final_resume: &str,
    job_title: &str,
    job_description: &str,
) -> StageRequest {
    let jd = truncate(job_description, COVER_LETTER_JD_CEILING);
    let resume = truncate(final_resume, COVER_LETTER_RESUME_CEILING);
    StageRequest {
        stage: Stage::CoverLetter,
        instruction: format!(
            "Write a professional, personalized cover letter for the role of {job_title}.\n\n\
             JOB DESCRIPTION:\n{jd}\n\n\
             RESUME:\n{resume}\n\n\
             Output a clean, formal cover letter with:\n\
             - Strong opening\n\
             - Key accomplishments\n\
             - Fit for role\n\
             - Closing paragraph\n\
             Keep it 3-4 paragraphs."
        ),
        expected_output: "A well-structured, polished cover letter.",
    }
}

pub fn build_skill_gap_request(
    final_resume: &str,
    job_title: &str,
    job_description: &str,
) -> StageRequest {
    let jd = truncate(job_description, SKILL_GAP_JD_CEILING);
    let resume = truncate(final_resume, SKILL_GAP_RESUME_CEILING);
    StageRequest {
        stage: Stage::SkillGap,
        instruction: format!(
            "Analyze skill gaps for the role: {job_title}.\n\n\
             JOB DESCRIPTION:\n{jd}\n\n\
             RESUME:\n{resume}\n\n\
             Compare skills between RESUME and JOB DESCRIPTION.\n\
             Return result STRICTLY as JSON with fields:\n\
             {{\n  \"matched_skills\": [...],\n  \"missing_skills\": [...],\n  \"weak_skills\": [...],\n  \
             \"priority_gaps\": [ {{ \"skill\": \"\", \"reason\": \"\" }} ],\n  \"recommendations\": [...]\n}}\n\
             Keep the JSON clean. No extra text."
        ),
        expected_output: "JSON describing skill gaps and recommendations.",
    }
}

pub fn build_evaluate_request(
    final_resume: &str,
    job_title: &str,
    job_description: &str,
) -> StageRequest {
    let resume = truncate(final_resume, EVALUATE_RESUME_CEILING);
    let jd = truncate(job_description, EVALUATE_JD_CEILING);
    StageRequest {
        stage: Stage::Evaluate,
        instruction: format!(
            "Score this resume for {job_title}:\n\n\
             JOB: {jd}\n\n\
             RESUME: {resume}\n\n\
             Rate 1-5: keywords, structure, metrics, verbs, format. \
             Return JSON with overall_score (0-100), breakdown, missing_keywords, quick_wins."
        ),
        expected_output: "JSON evaluation with scores and recommendations.",
    }
}
