use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "extract-text")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract plain text from MHTML, DOCX, Markdown and HTML files")]
#[command(
    long_about = "extract-text writes the readable text of each document into a sibling \
                  .txt file. Given a file it processes just that file; without one it \
                  scans the current directory recursively and asks before processing \
                  everything it found. Existing .txt files are never overwritten."
)]
#[command(after_help = "EXAMPLES:\n  \
    extract-text saved-page.mhtml\n  \
    extract-text report.docx -v\n  \
    extract-text --dir ~/notes --yes\n  \
    extract-text --dry-run --extensions md,html\n  \
    extract-text --generate-config")]
pub struct Cli {
    /// File to extract text from (omit to scan a directory)
    #[arg(conflicts_with = "dir")]
    pub file: Option<PathBuf>,

    /// Directory to scan when no file is given
    #[arg(short, long, help = "Directory to scan recursively (default: current directory)")]
    pub dir: Option<PathBuf>,

    /// Process every discovered file without asking
    #[arg(short, long)]
    pub yes: bool,

    /// File types to look for while scanning (comma-separated)
    #[arg(long, help = "Extensions to scan for (e.g., md,html)")]
    pub extensions: Option<String>,

    /// Path patterns to skip while scanning
    #[arg(short, long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Maximum directory depth while scanning
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Follow symbolic links while scanning
    #[arg(long)]
    pub follow_links: bool,

    /// Extension of the generated text files
    #[arg(long, help = "Extension for output files (default: txt)")]
    pub output_extension: Option<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "List what would be extracted without writing anything")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl From<&OutputFormat> for OutputMode {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_extensions(self.extensions.clone())
            .with_exclude_patterns(self.exclude.clone())
            .with_max_depth(self.max_depth)
            .with_follow_links(self.follow_links.then_some(true))
            .with_output_extension(self.output_extension.clone())
    }

    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from(&self.output_format)
    }

    /// Root of a batch run.
    pub fn scan_root(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
