//! Agent profiles: one role-configured worker per stage.
//!
//! Profiles are plain constants handed to the runtime on each call; nothing
//! is registered globally and nothing survives between runs.

use std::time::Duration;

use crate::pipeline::prompts::Stage;

/// Role, objective, tone and sampling parameters for one stage's agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentProfile {
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
    /// 0.0 for deterministic stages (clean, evaluate), higher for creative ones.
    pub temperature: f32,
    /// Advisory. `LlmClient` issues exactly one completion per stage call, so
    /// every profile runs a single iteration; the value is only logged.
    pub max_iter: u32,
    /// Ceiling enforced by the runtime, not by the pipeline.
    pub max_execution_time: Duration,
}

const STAGE_TIME_BUDGET: Duration = Duration::from_secs(120);

pub const PARSER: AgentProfile = AgentProfile {
    role: "Resume Parsing Specialist",
    goal: "Extract clean, structured text from a resume suitable for ATS optimization.",
    backstory: "You efficiently clean resume text by removing artifacts and normalizing formatting. \
        Focus on speed and accuracy - preserve all important content while removing noise.",
    temperature: 0.0,
    max_iter: 1,
    max_execution_time: STAGE_TIME_BUDGET,
};

pub const ATS_WRITER: AgentProfile = AgentProfile {
    role: "ATS Optimization Writer",
    goal: "Create a high-scoring ATS-optimized resume that matches job requirements perfectly.",
    backstory: "You are an expert at transforming resumes into ATS-friendly formats that score 80+ points. \
        You strategically place keywords, use strong action verbs, and quantify all achievements. \
        You work quickly and deliver results that pass ATS systems.",
    temperature: 0.3,
    max_iter: 1,
    max_execution_time: STAGE_TIME_BUDGET,
};

pub const BULLET_REFINER: AgentProfile = AgentProfile {
    role: "Bullet Point Refiner",
    goal: "Transform bullet points into high-impact, ATS-optimized statements with strong metrics.",
    backstory: "You excel at creating powerful bullet points that combine action verbs, specific \
        achievements, and quantified results. You work efficiently to maximize impact.",
    temperature: 0.2,
    max_iter: 1,
    max_execution_time: STAGE_TIME_BUDGET,
};

pub const COVER_LETTER_WRITER: AgentProfile = AgentProfile {
    role: "Cover Letter Writer",
    goal: "Generate a professional, personalized cover letter based on the user's resume and job description.",
    backstory: "You are an expert cover letter writer. You craft concise, compelling, job-specific \
        cover letters that highlight the candidate's strengths, achievements, and alignment \
        with the company's needs.",
    temperature: 0.5,
    max_iter: 1,
    max_execution_time: STAGE_TIME_BUDGET,
};

pub const SKILL_GAP_ANALYST: AgentProfile = AgentProfile {
    role: "Skill Gap Analyst",
    goal: "Identify missing and weak skills by comparing the resume with the job description.",
    backstory: "You are an expert in job market skill analysis. You compare job descriptions \
        with resumes and produce clear insights on missing skills and improvement areas.",
    temperature: 0.3,
    max_iter: 1,
    max_execution_time: STAGE_TIME_BUDGET,
};

pub const EVALUATOR: AgentProfile = AgentProfile {
    role: "ATS Evaluator",
    goal: "Provide accurate ATS scores and actionable improvement recommendations.",
    backstory: "You are a precise ATS scoring expert who quickly identifies gaps and provides specific, \
        actionable recommendations. You focus on keyword density, section structure, and measurable achievements.",
    temperature: 0.0,
    max_iter: 1,
    max_execution_time: STAGE_TIME_BUDGET,
};

impl AgentProfile {
    pub fn for_stage(stage: Stage) -> &'static AgentProfile {
        match stage {
            Stage::Clean => &PARSER,
            Stage::Rewrite => &ATS_WRITER,
            Stage::Refine => &BULLET_REFINER,
            Stage::CoverLetter => &COVER_LETTER_WRITER,
            Stage::SkillGap => &SKILL_GAP_ANALYST,
            Stage::Evaluate => &EVALUATOR,
        }
    }
}
