use crate::config::Config;
use crate::error::{ExtractTextError, ExtractionError, Result};
use crate::extractor::output_manager::FileRecord;
use crate::extractor::{DocumentKind, OutputManager};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// Text was written; `warning` carries the extractor error when the
    /// written text is empty because extraction failed.
    Written {
        kind: DocumentKind,
        output: PathBuf,
        bytes: u64,
        warning: Option<String>,
    },
    Skipped {
        output: PathBuf,
    },
    Missing,
    Unsupported {
        extension: String,
    },
    WriteFailed {
        kind: DocumentKind,
        output: PathBuf,
        error: String,
    },
}

impl ProcessOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ProcessOutcome::Missing
                | ProcessOutcome::Unsupported { .. }
                | ProcessOutcome::WriteFailed { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub warnings: usize,
    pub bytes_written: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub errors: Vec<String>,
    pub records: Vec<FileRecord>,
}

impl ExtractionProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            written: 0,
            skipped: 0,
            failed: 0,
            warnings: 0,
            bytes_written: 0,
            current_file: None,
            start_time: Instant::now(),
            errors: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn record(&mut self, path: &Path, outcome: &ProcessOutcome) {
        self.files_processed += 1;
        self.current_file = Some(path.display().to_string());

        match outcome {
            ProcessOutcome::Written { bytes, warning, .. } => {
                self.written += 1;
                self.bytes_written += bytes;
                if let Some(warning) = warning {
                    self.warnings += 1;
                    self.errors
                        .push(format!("{}: {}", path.display(), warning));
                }
            }
            ProcessOutcome::Skipped { .. } => self.skipped += 1,
            ProcessOutcome::Missing => {
                self.failed += 1;
                self.errors
                    .push(format!("{}: file does not exist", path.display()));
            }
            ProcessOutcome::Unsupported { .. } => {
                self.failed += 1;
                self.errors
                    .push(format!("{}: not a supported file type", path.display()));
            }
            ProcessOutcome::WriteFailed { output, error, .. } => {
                self.failed += 1;
                self.errors
                    .push(format!("{}: {}", output.display(), error));
            }
        }

        self.records.push(FileRecord::from_outcome(path, outcome));
    }

    pub fn percentage(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.files_processed as f64 / self.total_files as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        if self.files_processed == 0 {
            return Duration::from_secs(0);
        }

        let elapsed = self.elapsed();
        let rate = self.files_processed as f64 / elapsed.as_secs_f64();
        let remaining_files = self.total_files.saturating_sub(self.files_processed);

        if rate > 0.0 {
            Duration::from_secs_f64(remaining_files as f64 / rate)
        } else {
            Duration::from_secs(0)
        }
    }
}

/// Drives one file at a time through: existence check, skip-if-output-exists,
/// extractor selection, extraction and writing.
pub struct FileProcessor {
    output: OutputManager,
}

impl FileProcessor {
    pub fn new(output: OutputManager) -> Self {
        Self { output }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(OutputManager::new(config.output.extension.clone()))
    }

    pub fn output_manager(&self) -> &OutputManager {
        &self.output
    }

    /// Process a single file.
    ///
    /// Per-file problems are reported through the returned outcome. The only
    /// `Err` is a missing parser for a supported kind, which no later file of
    /// that kind could get past either.
    pub fn process_file(&self, path: &Path) -> Result<ProcessOutcome> {
        if !path.exists() {
            warn!(path = %path.display(), "input file does not exist");
            return Ok(ProcessOutcome::Missing);
        }

        let output = self.output.output_path_for(path);
        if self.output.output_exists(&output) {
            debug!(path = %path.display(), output = %output.display(), "output exists, skipping");
            return Ok(ProcessOutcome::Skipped { output });
        }

        let kind = DocumentKind::from_path(path);
        if !kind.is_supported() {
            let extension = path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            warn!(path = %path.display(), extension = %extension, "unsupported file type");
            return Ok(ProcessOutcome::Unsupported { extension });
        }

        if !kind.is_available() {
            return Err(ExtractTextError::MissingCapability { kind });
        }

        let (text, warning) = match kind.extract(path) {
            Ok(text) => (text, None),
            Err(ExtractionError::MissingCapability { kind }) => {
                return Err(ExtractTextError::MissingCapability { kind });
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "extraction failed, writing empty output");
                (String::new(), Some(e.to_string()))
            }
        };

        match self.output.write_text(&output, &text) {
            Ok(bytes) => {
                debug!(output = %output.display(), bytes, "wrote extracted text");
                Ok(ProcessOutcome::Written {
                    kind,
                    output,
                    bytes,
                    warning,
                })
            }
            Err(e) => {
                warn!(output = %output.display(), error = %e, "failed to write output");
                Ok(ProcessOutcome::WriteFailed {
                    kind,
                    output,
                    error: e.to_string(),
                })
            }
        }
    }

    /// Process files in order. `on_outcome` runs after each file, before the
    /// next one starts. A missing parser stops the batch.
    pub fn process_all<P, F>(&self, files: &[P], mut on_outcome: F) -> Result<ExtractionProgress>
    where
        P: AsRef<Path>,
        F: FnMut(&Path, &ProcessOutcome, &ExtractionProgress),
    {
        let mut progress = ExtractionProgress::new(files.len());

        for file in files {
            let path = file.as_ref();
            let outcome = self.process_file(path)?;
            progress.record(path, &outcome);
            on_outcome(path, &outcome, &progress);
        }

        Ok(progress)
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new(OutputManager::default())
    }
}
