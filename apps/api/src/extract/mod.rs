//! Text extraction: turns an uploaded resume into plain text.
//!
//! The extraction method is chosen solely by filename suffix. There is no
//! magic-byte sniffing: a `.pdf` that is really a DOCX yields empty text.
//! Extraction never fails from the caller's point of view; parser errors are
//! logged and surface as a `Document` with empty text.

pub mod docx;
pub mod pdf;
pub mod text;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("content is not decodable text")]
    NotText,
}

/// File kind tag, as reported across the upload boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    #[serde(rename = "pdf")]
    Pdf,
    #[serde(rename = "docx")]
    Docx,
    #[serde(rename = "txt")]
    PlainText,
    #[serde(rename = "bin")]
    Unknown,
}

impl DocumentKind {
    /// Case-insensitive suffix match. Everything that is not `.pdf` or
    /// `.docx` is treated as plain text until decoding proves otherwise.
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            DocumentKind::Pdf
        } else if lower.ends_with(".docx") {
            DocumentKind::Docx
        } else {
            DocumentKind::PlainText
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::PlainText => "txt",
            DocumentKind::Unknown => "bin",
        }
    }
}

/// An uploaded resume after extraction. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub kind: DocumentKind,
    pub text: String,
}

impl Document {
    /// True when extraction produced nothing a pipeline could work with.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A single format handler. Register new formats in `ExtractorRegistry`
/// without touching call sites.
pub trait TextExtractor: Send + Sync {
    fn kind(&self) -> DocumentKind;
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: vec![
                Box::new(pdf::PdfExtractor),
                Box::new(docx::DocxExtractor),
                Box::new(text::PlainTextExtractor),
            ],
        }
    }

    /// Adds a format handler, replacing any existing one for the same kind.
    #[allow(dead_code)] // extension point; the service ships with the defaults
    pub fn register(&mut self, extractor: Box<dyn TextExtractor>) {
        self.extractors.retain(|e| e.kind() != extractor.kind());
        self.extractors.push(extractor);
    }

    fn find(&self, kind: DocumentKind) -> Option<&dyn TextExtractor> {
        self.extractors
            .iter()
            .find(|e| e.kind() == kind)
            .map(|e| e.as_ref())
    }

    /// Detects the kind from `filename` and extracts the text of `bytes`.
    pub fn extract(&self, filename: &str, bytes: &[u8]) -> Document {
        let kind = DocumentKind::from_filename(filename);

        let Some(extractor) = self.find(kind) else {
            warn!("No extractor registered for {}", kind.as_str());
            return Document {
                kind: DocumentKind::Unknown,
                text: String::new(),
            };
        };

        match extractor.extract(bytes) {
            Ok(text) => {
                debug!(
                    "Extracted {} chars from {filename} ({})",
                    text.chars().count(),
                    kind.as_str()
                );
                Document { kind, text }
            }
            Err(ExtractError::NotText) => Document {
                kind: DocumentKind::Unknown,
                text: String::new(),
            },
            Err(e) => {
                warn!("{e} for {filename}");
                Document {
                    kind,
                    text: String::new(),
                }
            }
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts with the default set of extractors.
pub fn extract(filename: &str, bytes: &[u8]) -> Document {
    ExtractorRegistry::new().extract(filename, bytes)
}
