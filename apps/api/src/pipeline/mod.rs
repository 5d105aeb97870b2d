// Resume pipeline: agent profiles, stage prompts, the sequential runner and
// rendering of the JSON-shaped artifacts.
// All agent calls go through llm_client::AgentRuntime.

pub mod agents;
pub mod handlers;
pub mod prompts;
pub mod report;
pub mod runner;
