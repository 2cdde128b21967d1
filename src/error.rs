use crate::extractor::DocumentKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractTextError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("No parser available for {kind} files")]
    MissingCapability { kind: DocumentKind },

    #[error("Failed to read confirmation: {message}")]
    Prompt { message: String },
}

/// Failure of a single extractor call. The dispatcher logs these and still
/// writes an (empty) output file, except for `MissingCapability`.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {kind} content: {message}")]
    Parse { kind: DocumentKind, message: String },

    #[cfg(feature = "docx")]
    #[error("invalid DOCX package: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[cfg(feature = "docx")]
    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("no parser available for {kind} files")]
    MissingCapability { kind: DocumentKind },
}

impl ExtractionError {
    pub fn parse<S: Into<String>>(kind: DocumentKind, message: S) -> Self {
        ExtractionError::Parse {
            kind,
            message: message.into(),
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ExtractTextError {
    fn user_message(&self) -> String {
        match self {
            ExtractTextError::Io(e) => format!("File operation failed: {}", e),
            ExtractTextError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ExtractTextError::InvalidPath { path } => format!("Invalid path: {}", path),
            ExtractTextError::MissingCapability { kind } => format!(
                "This build cannot read {} files, so none of them can be processed",
                kind
            ),
            ExtractTextError::Prompt { message } => {
                format!("Could not read your answer: {}", message)
            }
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ExtractTextError::Config { .. } => Some(
                "Check your configuration file syntax or regenerate one with --generate-config."
                    .to_string(),
            ),
            ExtractTextError::InvalidPath { .. } => {
                Some("Make sure the directory exists and is readable.".to_string())
            }
            ExtractTextError::MissingCapability { kind } => Some(format!(
                "Rebuild with the `{}` cargo feature enabled.",
                kind.feature_name().unwrap_or("default")
            )),
            ExtractTextError::Prompt { .. } => {
                Some("Pass --yes to process all files without a prompt.".to_string())
            }
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ExtractTextError {
    fn from(error: toml::de::Error) -> Self {
        ExtractTextError::Config {
            message: error.to_string(),
        }
    }
}

impl From<regex::Error> for ExtractTextError {
    fn from(error: regex::Error) -> Self {
        ExtractTextError::Config {
            message: format!("invalid exclude pattern: {}", error),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractTextError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = ExtractTextError::Config {
            message: "bad extension".to_string(),
        };
        assert!(error.user_message().contains("bad extension"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_missing_capability_suggests_feature() {
        let error = ExtractTextError::MissingCapability {
            kind: DocumentKind::Docx,
        };
        assert!(error.user_message().contains("DOCX"));
        assert!(error.suggestion().unwrap().contains("docx"));
    }

    #[test]
    fn test_parse_error_display() {
        let error = ExtractionError::parse(DocumentKind::Mhtml, "not a MIME message");
        assert_eq!(
            error.to_string(),
            "failed to parse MHTML content: not a MIME message"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: ExtractTextError = io.into();
        assert!(matches!(error, ExtractTextError::Io(_)));
    }
}
