use crate::error::{ExtractTextError, UserFriendlyError};
use crate::extractor::{ExtractionProgress, ExtractionReport, ProcessOutcome};
use crate::scanner::DocumentFile;
use console::{style, Emoji, Term};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

static DONE: Emoji = Emoji("✅ ", "✓ ");
static FAILED: Emoji = Emoji("❌ ", "✗ ");
static NOTE: Emoji = Emoji("ℹ️  ", "i ");
static CAUTION: Emoji = Emoji("⚠️  ", "! ");
static PAGE: Emoji = Emoji("📄 ", "> ");
static PASSED_OVER: Emoji = Emoji("⏭️  ", "- ");

/// Kind of a single operator message.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Level {
    Success,
    Error,
    Warning,
    Info,
    Skip,
    Debug,
    Hint,
}

impl Level {
    /// Verbosity needed to see the message. `None` is shown even when quiet.
    fn min_verbosity(self) -> Option<u8> {
        match self {
            Level::Error | Level::Hint => None,
            Level::Debug => Some(1),
            _ => Some(0),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Level::Error | Level::Hint)
    }

    fn tag(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Skip => "skip",
            Level::Debug => "debug",
            Level::Hint => "suggestion",
        }
    }

    fn plain_label(self) -> &'static str {
        match self {
            Level::Skip => "SKIPPED",
            Level::Hint => "SUGGESTION",
            Level::Success => "SUCCESS",
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }

    /// Prefix for terminals without colour.
    fn symbol(self) -> &'static str {
        match self {
            Level::Success => "✓",
            Level::Error => "✗",
            Level::Warning => "!",
            Level::Info => "i",
            Level::Skip => "-",
            Level::Debug => "  DEBUG:",
            Level::Hint => "Suggestion:",
        }
    }

    fn decorate(self, message: &str) -> String {
        let (emoji, styled) = match self {
            Level::Success => (&DONE, style(message).green()),
            Level::Error => (&FAILED, style(message).red().bold()),
            Level::Warning => (&CAUTION, style(message).yellow().bold()),
            Level::Info => (&NOTE, style(message).cyan()),
            Level::Skip => (&PASSED_OVER, style(message).dim()),
            Level::Debug => return format!("  {}", style(message).dim()),
            Level::Hint => (&NOTE, style(message).cyan().italic()),
        };
        format!("{}{}", emoji, styled)
    }
}

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = mode == OutputMode::Human
            && !quiet
            && Term::stdout().features().colors_supported();

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        self.emit(Level::Success, message);
    }

    pub fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.emit(Level::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.emit(Level::Debug, message);
    }

    fn emit(&self, level: Level, message: &str) {
        if let Some(min) = level.min_verbosity() {
            if !self.should_show_message(min) {
                return;
            }
        }

        let line = match self.mode {
            OutputMode::Json => {
                self.print_json_message(level.tag(), message);
                return;
            }
            OutputMode::Plain => format!("{}: {}", level.plain_label(), message),
            OutputMode::Human if self.use_colors => level.decorate(message),
            OutputMode::Human => format!("{} {}", level.symbol(), message),
        };

        if level.to_stderr() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    pub fn print_user_friendly_error(&self, error: &ExtractTextError) {
        self.emit(Level::Error, &error.user_message());

        if let Some(suggestion) = error.suggestion() {
            self.emit(Level::Hint, &suggestion);
        }
    }

    /// Listing shown before the batch confirmation prompt.
    pub fn print_file_list(&self, files: &[DocumentFile]) {
        match self.mode {
            OutputMode::Json => {
                let listing: Vec<_> = files
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "path": f.display_path(),
                            "kind": f.kind,
                            "size": f.size,
                        })
                    })
                    .collect();
                self.print_json_object(&serde_json::json!({
                    "type": "files",
                    "count": files.len(),
                    "files": listing,
                }));
            }
            _ => {
                println!(
                    "Found {} supported files in the directory and its subdirectories:",
                    files.len()
                );
                for file in files {
                    println!(" - {}", file.display_path());
                }
            }
        }
    }

    /// One line per processed file, in the order files are handled.
    pub fn print_outcome(&self, path: &Path, outcome: &ProcessOutcome) {
        let path_display = path.display();

        match outcome {
            ProcessOutcome::Written {
                kind,
                output,
                warning,
                ..
            } => {
                self.info(&format!("Processing {}: {} ...", kind, path_display));
                if let Some(warning) = warning {
                    self.warning(&format!(
                        "Failed to extract from {}: {} (writing empty output)",
                        path_display, warning
                    ));
                }
                self.success(&format!(
                    "Extracted text written to {}",
                    output.display()
                ));
            }
            ProcessOutcome::Skipped { output } => {
                self.emit(
                    Level::Skip,
                    &format!(
                        "Skipping {} (output {} already exists).",
                        path_display,
                        output.display()
                    ),
                );
            }
            ProcessOutcome::Missing => {
                self.error(&format!("File '{}' does not exist.", path_display));
            }
            ProcessOutcome::Unsupported { .. } => {
                self.error(&format!(
                    "'{}' is not a supported file type (.mhtml, .docx, .md, .html).",
                    path_display
                ));
            }
            ProcessOutcome::WriteFailed { output, error, .. } => {
                self.error(&format!(
                    "Failed to write output file {}: {}",
                    output.display(),
                    error
                ));
            }
        }
    }

    pub fn print_plan_entry(&self, file: &DocumentFile, output: &Path, action: &str) {
        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "plan",
                "path": file.display_path(),
                "kind": file.kind,
                "output": output.display().to_string(),
                "action": action,
            })),
            OutputMode::Human if self.use_colors => println!(
                "{}{} [{}] -> {} ({})",
                PAGE,
                file.display_path(),
                style(file.kind).cyan(),
                output.display(),
                action
            ),
            _ => println!(
                "{} [{}] -> {} ({})",
                file.display_path(),
                file.kind,
                output.display(),
                action
            ),
        }
    }

    pub fn print_extraction_summary(&self, progress: &ExtractionProgress) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => self.print_human_summary(progress),
            OutputMode::Json => {}
            OutputMode::Plain => self.print_plain_summary(progress),
        }
    }

    pub fn print_extraction_report(&self, report: &ExtractionReport) {
        if self.mode == OutputMode::Json {
            let json_output =
                serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json_output);
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => println!("{}", "-".repeat(60)),
            OutputMode::Json => {} // No separator in JSON mode
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(&self, progress: &ExtractionProgress) {
        println!();
        self.print_separator();

        let highlight = |value: String| {
            if self.use_colors {
                style(value).cyan().bold().to_string()
            } else {
                value
            }
        };

        println!("  Files written:   {}", highlight(progress.written.to_string()));
        println!("  Files skipped:   {}", highlight(progress.skipped.to_string()));
        println!(
            "  Bytes written:   {}",
            highlight(format_bytes(progress.bytes_written))
        );
        println!(
            "  Time taken:      {}",
            highlight(format_duration(progress.elapsed()))
        );

        if progress.warnings > 0 {
            println!("  Empty outputs:   {}", progress.warnings);
        }
        if progress.failed > 0 {
            println!("  Failures:        {}", progress.failed);
        }

        self.print_separator();
    }

    fn print_plain_summary(&self, progress: &ExtractionProgress) {
        println!("COMPLETED: Text extraction");
        println!("Files written: {}", progress.written);
        println!("Files skipped: {}", progress.skipped);
        println!("Bytes written: {}", progress.bytes_written);
        println!("Duration: {:?}", progress.elapsed());
        if progress.failed > 0 {
            println!("Failures: {}", progress.failed);
        }
    }
}

fn format_bytes(bytes: u64) -> String {
    crate::scanner::document_scanner::format_bytes(bytes)
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

pub struct ProgressAwareOutput<'a> {
    formatter: &'a OutputFormatter,
    progress_manager: Option<&'a crate::ui::ProgressManager>,
}

impl<'a> ProgressAwareOutput<'a> {
    pub fn new(
        formatter: &'a OutputFormatter,
        progress_manager: Option<&'a crate::ui::ProgressManager>,
    ) -> Self {
        Self {
            formatter,
            progress_manager,
        }
    }

    pub fn suspend_and_print<F>(&self, f: F)
    where
        F: FnOnce(&OutputFormatter),
    {
        if let Some(pm) = self.progress_manager {
            pm.suspend(|| f(self.formatter));
        } else {
            f(self.formatter);
        }
    }

    pub fn outcome(&self, path: &Path, outcome: &ProcessOutcome) {
        self.suspend_and_print(|f| f.print_outcome(path, outcome));
    }
}
