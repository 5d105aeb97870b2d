// Prompt framing shared by every stage: the agent persona goes into the
// system message, the stage instruction plus its expected output into the
// user message. Stage-specific wording lives in pipeline::prompts.

use crate::pipeline::agents::AgentProfile;
use crate::pipeline::prompts::StageRequest;

/// Persona framing for one agent.
pub fn system_prompt(profile: &AgentProfile) -> String {
    format!(
        "You are {role}. {backstory}\nYour personal goal is: {goal}",
        role = profile.role,
        backstory = profile.backstory,
        goal = profile.goal.trim(),
    )
}

/// The task message: instruction followed by the criterion for the final answer.
pub fn task_prompt(request: &StageRequest) -> String {
    format!(
        "{instruction}\n\nThis is the expected criteria for your final answer: {expected}\n\
         You MUST return the actual complete content as the final answer, not a summary.",
        instruction = request.instruction,
        expected = request.expected_output,
    )
}
