use crate::extractor::{DocumentKind, ExtractionProgress, ProcessOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Decides where extracted text goes and writes it there.
///
/// Outputs sit next to their input with the extension swapped
/// (`page.mhtml` -> `page.txt`). An existing output is never replaced:
/// writes use `create_new`, so even a file that appears between the
/// existence check and the write is left alone.
#[derive(Debug, Clone)]
pub struct OutputManager {
    extension: String,
    buffer_size: usize,
}

impl OutputManager {
    pub fn new<S: Into<String>>(extension: S) -> Self {
        let extension = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            buffer_size: 64 * 1024, // 64KB buffer
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        input.with_extension(&self.extension)
    }

    pub fn output_exists(&self, output: &Path) -> bool {
        output.exists()
    }

    /// Write `text` as UTF-8 to a new file, returning the byte count.
    pub fn write_text(&self, output: &Path, text: &str) -> io::Result<u64> {
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(output)?;

        let mut writer = BufWriter::with_capacity(self.buffer_size, file);
        writer.write_all(text.as_bytes())?;
        writer.flush()?;

        Ok(text.len() as u64)
    }
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new("txt")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Written,
    Skipped,
    Missing,
    Unsupported,
    WriteFailed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub kind: DocumentKind,
    pub status: FileStatus,
    pub output: Option<String>,
    pub bytes: u64,
    pub message: Option<String>,
}

impl FileRecord {
    pub fn from_outcome(path: &Path, outcome: &ProcessOutcome) -> Self {
        let kind = DocumentKind::from_path(path);
        let path = path.display().to_string();

        match outcome {
            ProcessOutcome::Written {
                output,
                bytes,
                warning,
                ..
            } => Self {
                path,
                kind,
                status: FileStatus::Written,
                output: Some(output.display().to_string()),
                bytes: *bytes,
                message: warning.clone(),
            },
            ProcessOutcome::Skipped { output } => Self {
                path,
                kind,
                status: FileStatus::Skipped,
                output: Some(output.display().to_string()),
                bytes: 0,
                message: None,
            },
            ProcessOutcome::Missing => Self {
                path,
                kind,
                status: FileStatus::Missing,
                output: None,
                bytes: 0,
                message: Some("file does not exist".to_string()),
            },
            ProcessOutcome::Unsupported { extension } => Self {
                path,
                kind,
                status: FileStatus::Unsupported,
                output: None,
                bytes: 0,
                message: Some(format!("unsupported extension '{}'", extension)),
            },
            ProcessOutcome::WriteFailed { output, error, .. } => Self {
                path,
                kind,
                status: FileStatus::WriteFailed,
                output: Some(output.display().to_string()),
                bytes: 0,
                message: Some(error.clone()),
            },
        }
    }
}

/// End-of-run summary, printed in full in JSON mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub generated_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub total_files: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub warnings: usize,
    pub bytes_written: u64,
    pub files: Vec<FileRecord>,
    pub errors: Vec<String>,
}

impl ExtractionReport {
    pub fn from_progress(progress: &ExtractionProgress) -> Self {
        Self {
            generated_at: Utc::now(),
            duration_ms: progress.elapsed().as_millis() as u64,
            total_files: progress.total_files,
            written: progress.written,
            skipped: progress.skipped,
            failed: progress.failed,
            warnings: progress.warnings,
            bytes_written: progress.bytes_written,
            files: progress.records.clone(),
            errors: progress.errors.clone(),
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
