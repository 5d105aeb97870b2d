use axum::Json;
use serde_json::{json, Value};

use crate::llm_client::MODEL;
use crate::pipeline::prompts::Stage;

/// GET /health
/// Returns a simple status object with service version, the model and the stage order.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "ats-api",
        "model": MODEL,
        "stages": Stage::ALL
    }))
}
