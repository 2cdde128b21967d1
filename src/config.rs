use crate::error::{ExtractTextError, Result};
use crate::extractor::{DocumentKind, SUPPORTED_EXTENSIONS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config files looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["extract-text.toml", ".extract-text.toml"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub extensions: Vec<String>,
    /// Unlimited when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    pub follow_links: bool,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub extension: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_depth: None,
            follow_links: false,
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: "txt".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ExtractTextError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ExtractTextError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ExtractTextError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                for default_path in &DEFAULT_CONFIG_FILES {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref extensions) = cli_args.extensions {
            self.scan.extensions = extensions
                .split(',')
                .map(|s| s.trim().trim_start_matches('.').to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(max_depth) = cli_args.max_depth {
            self.scan.max_depth = Some(max_depth);
        }

        if let Some(follow_links) = cli_args.follow_links {
            self.scan.follow_links = follow_links;
        }

        if let Some(ref exclude) = cli_args.exclude_patterns {
            self.scan.exclude_patterns.extend(exclude.iter().cloned());
        }

        if let Some(ref extension) = cli_args.output_extension {
            self.output.extension = extension.trim_start_matches('.').to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan.extensions.is_empty() {
            return Err(ExtractTextError::Config {
                message: "At least one file extension must be specified".to_string(),
            });
        }

        for extension in &self.scan.extensions {
            if !DocumentKind::from_extension(extension).is_supported() {
                return Err(ExtractTextError::Config {
                    message: format!(
                        "Unsupported extension '{}' (supported: {})",
                        extension,
                        SUPPORTED_EXTENSIONS.join(", ")
                    ),
                });
            }
        }

        if self.scan.max_depth == Some(0) {
            return Err(ExtractTextError::Config {
                message: "Maximum directory depth must be greater than 0".to_string(),
            });
        }

        for pattern in &self.scan.exclude_patterns {
            regex::Regex::new(pattern)?;
        }

        let extension = self.output.extension.as_str();
        if extension.is_empty() || extension.contains(['/', '\\', '.']) {
            return Err(ExtractTextError::Config {
                message: format!("Invalid output extension '{}'", extension),
            });
        }

        if DocumentKind::from_extension(extension).is_supported() {
            return Err(ExtractTextError::Config {
                message: format!(
                    "Output extension '{}' would collide with input files",
                    extension
                ),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub extensions: Option<String>,
    pub max_depth: Option<usize>,
    pub follow_links: Option<bool>,
    pub exclude_patterns: Option<Vec<String>>,
    pub output_extension: Option<String>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extensions(mut self, extensions: Option<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_follow_links(mut self, follow_links: Option<bool>) -> Self {
        self.follow_links = follow_links;
        self
    }

    pub fn with_exclude_patterns(mut self, patterns: Option<Vec<String>>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    pub fn with_output_extension(mut self, extension: Option<String>) -> Self {
        self.output_extension = extension;
        self
    }
}

/// Path a generated sample config is written to when none is given.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILES[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scan.extensions, vec!["mhtml", "docx", "md", "html"]);
        assert_eq!(config.output.extension, "txt");
        assert!(!config.scan.follow_links);
        assert_eq!(config.scan.max_depth, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.scan.extensions.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scan.extensions.push("pdf".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.extension = "md".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.extension = "a/b".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scan.exclude_patterns.push("(unclosed".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_depth_limit_round_trip() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[scan]\nmax_depth = 3").unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.scan.max_depth, Some(3));

        let mut config = Config::default();
        config.scan.max_depth = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[output]\nextension = \"text\"").unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.output.extension, "text");
        assert_eq!(config.scan.extensions.len(), 4);
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[scan\nmax_depth = ").unwrap();

        let err = Config::load_from_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, ExtractTextError::Config { .. }));
    }

    #[test]
    fn test_missing_config_file() {
        assert!(Config::load_from_file("/no/such/extract-text.toml").is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_extensions(Some("MD, .html".to_string()))
            .with_max_depth(Some(2))
            .with_exclude_patterns(Some(vec!["drafts".to_string()]))
            .with_output_extension(Some(".text".to_string()));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.scan.extensions, vec!["md", "html"]);
        assert_eq!(config.scan.max_depth, Some(2));
        assert_eq!(config.scan.exclude_patterns, vec!["drafts"]);
        assert_eq!(config.output.extension, "text");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(sample.contains("[scan]"));
        assert!(sample.contains("[output]"));
        assert!(!sample.contains("max_depth"));
    }
}
