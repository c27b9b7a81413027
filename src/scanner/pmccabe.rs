//! Runner for the `pmccabe` complexity tool.
//!
//! Collects source files under a root directory and feeds them to pmccabe
//! in a single invocation, returning its raw report.

use crate::utils::config::{
    DEFAULT_EXCLUDED_FRAGMENTS, DEFAULT_PMCCABE_PROGRAM, DEFAULT_SOURCE_EXTENSIONS,
};
use crate::utils::error::ScanError;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use walkdir::WalkDir;

/// Which files under the scan root are handed to pmccabe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFilter {
    /// File extensions to keep, without the dot
    pub extensions: Vec<String>,

    /// Paths containing any of these fragments are skipped
    pub excluded: Vec<String>,
}

impl Default for SourceFilter {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            excluded: DEFAULT_EXCLUDED_FRAGMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SourceFilter {
    pub fn matches(&self, path: &Path) -> bool {
        let has_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|wanted| wanted == ext));
        if !has_extension {
            return false;
        }

        let text = path.to_string_lossy();
        !self.excluded.iter().any(|fragment| text.contains(fragment.as_str()))
    }
}

/// pmccabe invoker
pub struct PmccabeRunner {
    program: String,
}

impl Default for PmccabeRunner {
    fn default() -> Self {
        Self::new(DEFAULT_PMCCABE_PROGRAM)
    }
}

impl PmccabeRunner {
    /// Create a runner for the given pmccabe executable
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Collect sources under `root` and run pmccabe over them
    ///
    /// **Public** - main entry point for scanning
    ///
    /// # Errors
    /// * `ScanError::SourceNotFound` - `root` does not exist
    /// * `ScanError::NoSources` - nothing under `root` passes the filter
    /// * `ScanError::Spawn` - pmccabe could not be started
    /// * `ScanError::InvalidOutput` - the report is not UTF-8
    pub fn scan(&self, root: &Path, filter: &SourceFilter) -> Result<String, ScanError> {
        let sources = collect_sources(root, filter)?;
        if sources.is_empty() {
            return Err(ScanError::NoSources(root.display().to_string()));
        }
        info!("Running {} on {} source files", self.program, sources.len());
        self.run(&sources)
    }

    /// Run pmccabe over an explicit file list and capture its report
    pub fn run(&self, files: &[PathBuf]) -> Result<String, ScanError> {
        let output = Command::new(&self.program)
            .args(files)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ScanError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // pmccabe exits non-zero on files it cannot parse but still reports the rest
        if !output.status.success() {
            warn!("{} exited with {}", self.program, output.status);
        }
        if !output.stderr.is_empty() {
            debug!(
                "{} stderr: {}",
                self.program,
                String::from_utf8_lossy(&output.stderr).trim_end()
            );
        }

        String::from_utf8(output.stdout).map_err(|_| ScanError::InvalidOutput)
    }
}

/// Files under `root` accepted by `filter`, in a stable order
///
/// A `root` that is itself a file is returned as-is.
pub fn collect_sources(root: &Path, filter: &SourceFilter) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::SourceNotFound(root.display().to_string()));
    }
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        // Exclusions apply below the root only
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if entry.file_type().is_file() && filter.matches(relative) {
            sources.push(entry.into_path());
        }
    }

    debug!("Collected {} source files under {}", sources.len(), root.display());
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "int main() { return 0; }\n").unwrap();
    }

    #[test]
    fn test_filter_matches() {
        let filter = SourceFilter::default();
        assert!(filter.matches(Path::new("src/a.cpp")));
        assert!(!filter.matches(Path::new("src/a.h")));
        assert!(!filter.matches(Path::new("thirdparty/zlib/a.cpp")));
        assert!(!filter.matches(Path::new("out/build/gen.cpp")));
    }

    #[test]
    fn test_collect_sources() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        touch(root, "src/b.cpp");
        touch(root, "src/a.cpp");
        touch(root, "src/a.h");
        touch(root, "thirdparty/lib.cpp");
        touch(root, "build/gen.cpp");

        let sources = collect_sources(root, &SourceFilter::default()).unwrap();

        assert_eq!(sources, vec![root.join("src/a.cpp"), root.join("src/b.cpp")]);
    }

    #[test]
    fn test_collect_sources_missing_root() {
        let result = collect_sources(Path::new("/definitely/not/here"), &SourceFilter::default());
        assert!(matches!(result, Err(ScanError::SourceNotFound(_))));
    }

    #[test]
    fn test_scan_without_sources() {
        let temp_dir = tempfile::tempdir().unwrap();
        let runner = PmccabeRunner::default();
        let result = runner.scan(temp_dir.path(), &SourceFilter::default());
        assert!(matches!(result, Err(ScanError::NoSources(_))));
    }

    #[test]
    fn test_missing_program() {
        let runner = PmccabeRunner::new("pmccabe-does-not-exist");
        let result = runner.run(&[PathBuf::from("a.cpp")]);
        assert!(matches!(result, Err(ScanError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_captures_stdout() {
        let runner = PmccabeRunner::new("echo");
        let report = runner.run(&[PathBuf::from("a.cpp"), PathBuf::from("b.cpp")]).unwrap();
        assert_eq!(report, "a.cpp b.cpp\n");
    }
}
