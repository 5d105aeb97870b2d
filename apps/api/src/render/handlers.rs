//! Axum route handler for artifact downloads.

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::render::docx::{self, DOCX_MIME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Txt,
    Docx,
}

impl ExportFormat {
    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Docx => "docx",
        }
    }

    fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "text/plain; charset=utf-8",
            ExportFormat::Docx => DOCX_MIME,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub text: String,
    pub format: ExportFormat,
    /// Base name without extension, e.g. `final_resume` or `cover_letter`.
    pub file_name: Option<String>,
}

/// POST /api/v1/export
///
/// Returns one artifact as a `.txt` or `.docx` attachment.
pub async fn handle_export(Json(request): Json<ExportRequest>) -> Result<Response, AppError> {
    let file_name = attachment_name(request.file_name.as_deref(), request.format);

    let body = match request.format {
        ExportFormat::Txt => request.text.into_bytes(),
        ExportFormat::Docx => {
            let text = request.text;
            tokio::task::spawn_blocking(move || docx::encode(&text))
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("DOCX task failed: {e}")))??
        }
    };

    debug!("Exporting {file_name} ({} bytes)", body.len());

    Ok((
        [
            (header::CONTENT_TYPE, request.format.mime().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}

/// Keeps `[A-Za-z0-9_-]` of the requested base name and appends the extension.
fn attachment_name(requested: Option<&str>, format: ExportFormat) -> String {
    let base: String = requested
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    let base = if base.is_empty() { "artifact" } else { base.as_str() };
    format!("{base}.{}", format.extension())
}
