use crate::config::ScanConfig;
use crate::error::Result;
use regex::Regex;
use std::path::Path;

pub struct FileFilter {
    extensions: Vec<String>,
    exclude_patterns: Vec<Regex>,
}

impl FileFilter {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
        })
    }

    /// True when the lowercased file name ends in `.<ext>` for a configured
    /// extension.
    pub fn is_supported_file(&self, path: &Path) -> bool {
        let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
            return false;
        };
        let filename = filename.to_lowercase();

        self.extensions.iter().any(|ext| {
            filename
                .strip_suffix(ext.as_str())
                .is_some_and(|stem| stem.ends_with('.'))
        })
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(&path_str))
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self {
            extensions: ScanConfig::default().extensions,
            exclude_patterns: Vec::new(),
        }
    }
}
