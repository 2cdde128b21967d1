pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, OutputConfig, ScanConfig};
pub use error::{ExtractTextError, ExtractionError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    html_to_text, DocumentKind, ExtractionProgress, ExtractionReport, FileProcessor,
    OutputManager, ProcessOutcome,
};
pub use scanner::{DocumentFile, DocumentScanner, FileFilter};
pub use ui::{OutputFormatter, OutputMode, ProgressAwareOutput, ProgressManager};

use std::path::Path;

/// Main library interface tying configuration, extraction and output together.
pub struct TextExtract {
    config: Config,
    processor: FileProcessor,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl TextExtract {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);
        let processor = FileProcessor::from_config(&config);

        Self {
            config,
            processor,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;

        Ok(Self::new(
            config,
            cli_args.output_mode(),
            cli_args.verbose,
            cli_args.quiet,
        ))
    }

    /// Extract one file named on the command line. No prompt, no progress bar.
    pub fn process_single(&self, path: &Path) -> Result<ExtractionProgress> {
        self.processor
            .process_all(&[path], |path, outcome, _| {
                self.output_formatter.print_outcome(path, outcome)
            })
    }

    /// Supported files under `root`, sorted by relative path.
    pub fn discover(&self, root: &Path) -> Result<Vec<DocumentFile>> {
        let scanner = DocumentScanner::new(&self.config.scan)?;
        let documents = scanner.scan_directory(root)?;

        let stats = scanner.get_statistics(&documents);
        self.output_formatter.debug(&stats.display_summary());

        Ok(documents)
    }

    /// Extract every file in order. A failing file is reported and the batch
    /// moves on; only a missing parser aborts it.
    pub fn process_batch(&self, documents: &[DocumentFile]) -> Result<ExtractionProgress> {
        let bar = self.progress_manager.batch(documents.len());
        let output = ProgressAwareOutput::new(&self.output_formatter, Some(&self.progress_manager));

        let result = self.processor.process_all(documents, |path, outcome, progress| {
            output.outcome(path, outcome);
            bar.advance(progress);
        });

        let progress = match result {
            Ok(progress) => progress,
            Err(e) => {
                bar.abandon();
                return Err(e);
            }
        };

        bar.finish(&progress);
        self.progress_manager.clear();

        self.output_formatter.print_extraction_summary(&progress);

        Ok(progress)
    }

    /// Print what a run would do. Returns how many files would be extracted.
    pub fn dry_run(&self, documents: &[DocumentFile]) -> usize {
        let output_manager = self.processor.output_manager();
        let mut to_extract = 0;

        for document in documents {
            let output = output_manager.output_path_for(&document.source_path);
            let action = if !document.kind.is_supported() {
                "unsupported"
            } else if output_manager.output_exists(&output) {
                "skip"
            } else {
                to_extract += 1;
                "extract"
            };
            self.output_formatter
                .print_plan_entry(document, &output, action);
        }

        to_extract
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &ExtractTextError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        features: enabled_features(),
        target: std::env::consts::ARCH.to_string(),
    }
}

fn enabled_features() -> Vec<&'static str> {
    let mut features = Vec::new();
    if cfg!(feature = "docx") {
        features.push("docx");
    }
    if cfg!(feature = "markdown") {
        features.push("markdown");
    }
    features
}

#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub features: Vec<&'static str>,
    pub target: String,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "extract-text {} [{}] for {}",
            self.version,
            self.features.join(", "),
            self.target
        )
    }
}
