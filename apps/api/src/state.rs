use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::AgentRuntime;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Agent runtime for every stage. Default: `LlmClient`; tests inject a scripted one.
    pub runtime: Arc<dyn AgentRuntime>,
    pub config: Config,
}
