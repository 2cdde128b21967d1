use crate::config::ScanConfig;
use crate::error::{ExtractTextError, Result};
use crate::extractor::DocumentKind;
use crate::scanner::file_filter::FileFilter;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub source_path: PathBuf,
    pub relative_path: PathBuf,
    pub filename: String,
    pub extension: String,
    pub kind: DocumentKind,
    pub size: u64,
}

impl DocumentFile {
    pub fn new(source_path: PathBuf, relative_path: PathBuf, size: u64) -> Self {
        let filename = source_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        let extension = source_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let kind = DocumentKind::from_extension(&extension);

        Self {
            source_path,
            relative_path,
            filename,
            extension,
            kind,
            size,
        }
    }

    pub fn display_path(&self) -> String {
        self.source_path.display().to_string()
    }
}

impl AsRef<Path> for DocumentFile {
    fn as_ref(&self) -> &Path {
        &self.source_path
    }
}

pub struct DocumentScanner {
    filter: FileFilter,
    max_depth: Option<usize>,
    follow_links: bool,
}

impl DocumentScanner {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        Ok(Self {
            filter: FileFilter::new(config)?,
            max_depth: config.max_depth,
            follow_links: config.follow_links,
        })
    }

    /// Recursively collect supported files under `root`, sorted by path
    /// relative to `root`. Unreadable entries are logged and skipped.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<DocumentFile>> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(ExtractTextError::InvalidPath {
                path: root_path.display().to_string(),
            });
        }

        if !root_path.is_dir() {
            return Err(ExtractTextError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut documents = Vec::new();

        let mut walker = WalkDir::new(root_path).follow_links(self.follow_links);
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !self.filter.is_supported_file(path) {
                continue;
            }

            let relative_path = path
                .strip_prefix(root_path)
                .unwrap_or(path)
                .to_path_buf();

            if self.filter.is_excluded(&relative_path) {
                debug!(path = %relative_path.display(), "excluded by pattern");
                continue;
            }

            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "cannot read metadata");
                    continue;
                }
            };

            documents.push(DocumentFile::new(path.to_path_buf(), relative_path, size));
        }

        documents.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        Ok(documents)
    }

    pub fn get_statistics(&self, documents: &[DocumentFile]) -> ScanStatistics {
        let mut files_by_kind = HashMap::new();
        for doc in documents {
            *files_by_kind.entry(doc.kind).or_insert(0) += 1;
        }

        ScanStatistics {
            total_files: documents.len(),
            total_size: documents.iter().map(|d| d.size).sum(),
            files_by_kind,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub files_by_kind: HashMap<DocumentKind, usize>,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  Total files: {}\n  Total size: {}\n",
            self.total_files,
            format_bytes(self.total_size)
        );

        if !self.files_by_kind.is_empty() {
            summary.push_str("  Files by type:\n");
            let mut kinds: Vec<_> = self.files_by_kind.iter().collect();
            kinds.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.to_string().cmp(&b.0.to_string())));

            for (kind, count) in kinds {
                summary.push_str(&format!("    {}: {} files\n", kind, count));
            }
        }

        summary
    }
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner() -> DocumentScanner {
        DocumentScanner::new(&ScanConfig::default()).unwrap()
    }

    #[test]
    fn test_document_file_creation() {
        let doc = DocumentFile::new(
            PathBuf::from("/tmp/x/Saved.MHTML"),
            PathBuf::from("Saved.MHTML"),
            100,
        );

        assert_eq!(doc.filename, "Saved.MHTML");
        assert_eq!(doc.extension, "mhtml");
        assert_eq!(doc.kind, DocumentKind::Mhtml);
        assert_eq!(doc.size, 100);
    }

    #[test]
    fn test_recursive_scan_finds_supported_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("top.md"), "# Top").unwrap();
        fs::write(root.join("a/page.HTML"), "<p>x</p>").unwrap();
        fs::write(root.join("a/b/deep.mhtml"), "MIME").unwrap();
        fs::write(root.join("a/b/letter.docx"), "zip").unwrap();
        fs::write(root.join("a/notes.txt"), "ignored").unwrap();
        fs::write(root.join("a/b/image.png"), "ignored").unwrap();

        let documents = scanner().scan_directory(root).unwrap();
        let relative: Vec<_> = documents
            .iter()
            .map(|d| d.relative_path.to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(
            relative,
            vec!["a/b/deep.mhtml", "a/b/letter.docx", "a/page.HTML", "top.md"]
        );
    }

    #[test]
    fn test_directories_with_supported_names_are_not_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("folder.md")).unwrap();

        let documents = scanner().scan_directory(temp_dir.path()).unwrap();
        assert!(documents.is_empty());
    }

    #[test]
    fn test_exclude_patterns_apply_to_relative_paths() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("drafts")).unwrap();
        fs::write(root.join("drafts/wip.md"), "wip").unwrap();
        fs::write(root.join("final.md"), "done").unwrap();

        let config = ScanConfig {
            exclude_patterns: vec!["^drafts".to_string()],
            ..ScanConfig::default()
        };
        let documents = DocumentScanner::new(&config)
            .unwrap()
            .scan_directory(root)
            .unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].filename, "final.md");
    }

    #[test]
    fn test_max_depth_limits_recursion() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("one/two")).unwrap();
        fs::write(root.join("one/shallow.md"), "").unwrap();
        fs::write(root.join("one/two/deep.md"), "").unwrap();

        let config = ScanConfig {
            max_depth: Some(2),
            ..ScanConfig::default()
        };
        let documents = DocumentScanner::new(&config)
            .unwrap()
            .scan_directory(root)
            .unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].filename, "shallow.md");
    }

    #[test]
    fn test_default_scan_has_no_depth_limit() {
        let temp_dir = TempDir::new().unwrap();
        let deep = (0..80).fold(temp_dir.path().to_path_buf(), |dir, _| dir.join("d"));
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("bottom.md"), "").unwrap();

        let documents = scanner().scan_directory(temp_dir.path()).unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].filename, "bottom.md");
    }

    #[test]
    fn test_scan_missing_directory() {
        let result = scanner().scan_directory("/no/such/dir");
        assert!(matches!(result, Err(ExtractTextError::InvalidPath { .. })));
    }

    #[test]
    fn test_scan_statistics() {
        let documents = vec![
            DocumentFile::new(PathBuf::from("a.md"), PathBuf::from("a.md"), 100),
            DocumentFile::new(PathBuf::from("b.md"), PathBuf::from("b.md"), 200),
            DocumentFile::new(PathBuf::from("c.html"), PathBuf::from("c.html"), 50),
        ];

        let stats = scanner().get_statistics(&documents);

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_size, 350);
        assert_eq!(stats.files_by_kind[&DocumentKind::Markdown], 2);
        assert!(stats.display_summary().contains("Markdown: 2 files"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(2 * 1024 * 1024), "2.0 MB");
    }
}
