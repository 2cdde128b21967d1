pub mod docx;
pub mod file_extractor;
pub mod html;
pub mod markdown;
pub mod mhtml;
pub mod output_manager;

pub use file_extractor::{ExtractionProgress, FileProcessor, ProcessOutcome};
pub use html::html_to_text;
pub use output_manager::{ExtractionReport, OutputManager};

use crate::error::ExtractionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Extensions the tool knows how to read, lowercased and without the dot.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["mhtml", "docx", "md", "html"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Mhtml,
    Docx,
    Markdown,
    Html,
    Unsupported,
}

impl DocumentKind {
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_lowercase().as_str() {
            "mhtml" => DocumentKind::Mhtml,
            "docx" => DocumentKind::Docx,
            "md" => DocumentKind::Markdown,
            "html" => DocumentKind::Html,
            _ => DocumentKind::Unsupported,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(DocumentKind::Unsupported)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, DocumentKind::Unsupported)
    }

    /// Cargo feature that compiles in the parser for this kind, if any.
    pub fn feature_name(&self) -> Option<&'static str> {
        match self {
            DocumentKind::Docx => Some("docx"),
            DocumentKind::Markdown => Some("markdown"),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        match self {
            DocumentKind::Docx => cfg!(feature = "docx"),
            DocumentKind::Markdown => cfg!(feature = "markdown"),
            DocumentKind::Unsupported => false,
            DocumentKind::Mhtml | DocumentKind::Html => true,
        }
    }

    /// Run the extractor for this kind against `path`.
    pub fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        match self {
            DocumentKind::Mhtml => mhtml::extract_mhtml(path),
            DocumentKind::Docx => docx::extract_docx(path),
            DocumentKind::Markdown => markdown::extract_markdown(path),
            DocumentKind::Html => html::extract_html(path),
            DocumentKind::Unsupported => {
                Err(ExtractionError::MissingCapability { kind: *self })
            }
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DocumentKind::Mhtml => "MHTML",
            DocumentKind::Docx => "DOCX",
            DocumentKind::Markdown => "Markdown",
            DocumentKind::Html => "HTML",
            DocumentKind::Unsupported => "unsupported",
        };
        f.write_str(label)
    }
}

/// Read a file as text, replacing invalid UTF-8 sequences instead of failing.
pub(crate) fn read_lossy(path: &Path) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
