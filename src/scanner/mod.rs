//! Source scanner: turns a directory tree into [`SourceModule`] snapshots.

mod dialect;
mod module;

pub use dialect::Dialect;
pub use module::{FINGERPRINT_LEN, SourceModule, fingerprint};

use crate::config::ScanConfig;
use crate::discovery::{DirectoryWalker, WalkConfig};
use crate::error::{GateError, Result};
use crate::validator::SCRATCH_PREFIX;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Walks a source root and yields immutable module snapshots.
///
/// Every call to [`SourceScanner::scan`] re-reads the tree; nothing is cached
/// between scans.
pub struct SourceScanner {
    root: PathBuf,
    walker: DirectoryWalker,
    dialects: BTreeMap<String, Dialect>,
}

impl SourceScanner {
    pub fn new(root: impl AsRef<Path>, config: &ScanConfig) -> Result<Self> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(GateError::FileNotFound(root.display().to_string()));
        }
        if !root.is_dir() {
            return Err(GateError::NotADirectory(root.display().to_string()));
        }
        let root = fs::canonicalize(root).map_err(|e| GateError::ReadError {
            path: root.display().to_string(),
            source: e,
        })?;

        let walk_config = WalkConfig::new()
            .with_excluded_dirs(config.excluded_dirs.iter().cloned())
            .with_extensions(config.dialects.keys().cloned())
            .with_follow_symlinks(config.follow_symlinks)
            .with_skipped_prefixes([SCRATCH_PREFIX]);

        Ok(Self {
            root,
            walker: DirectoryWalker::new(walk_config),
            dialects: config.dialects.clone(),
        })
    }

    /// Canonical scan root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily yield every allow-listed, non-excluded module under the root.
    ///
    /// Unreadable files (permissions, invalid UTF-8) are logged and skipped.
    pub fn scan(&self) -> impl Iterator<Item = SourceModule> + '_ {
        self.walker
            .walk(&self.root)
            .filter_map(move |path| match self.snapshot(&path) {
                Ok(module) => Some(module),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Could not read source module");
                    None
                }
            })
    }

    /// Re-scan and return the first module with the given base name.
    pub fn get_module(&self, filename: &str) -> Option<SourceModule> {
        self.scan().find(|m| m.filename == filename)
    }

    /// Snapshot a single file below the root.
    pub fn snapshot(&self, path: &Path) -> Result<SourceModule> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| GateError::FileNotFound(path.display().to_string()))?;
        let dialect = self.dialect_for(filename).ok_or_else(|| GateError::ParseError {
            path: path.display().to_string(),
            message: "extension is not allow-listed".to_string(),
        })?;

        let bytes = fs::read(path).map_err(|e| GateError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        let content = String::from_utf8(bytes).map_err(|e| GateError::ReadError {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;

        let relative_path = self.relative_path(path);
        debug!(file = %relative_path, dialect = %dialect, "Scanned module");

        Ok(SourceModule::new(
            path.to_path_buf(),
            relative_path,
            content,
            dialect,
        ))
    }

    /// Dialect for a file name, or `None` when the extension is not allowed.
    pub fn dialect_for(&self, filename: &str) -> Option<Dialect> {
        let (_, ext) = filename.rsplit_once('.')?;
        self.dialects.get(ext).copied()
    }

    fn relative_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_source_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("orchestrator")).unwrap();
        fs::create_dir_all(root.join("meta")).unwrap();
        fs::create_dir_all(root.join("skills").join("memory")).unwrap();
        fs::create_dir_all(root.join("node_modules").join("chalk")).unwrap();
        fs::create_dir_all(root.join("deep").join("dist").join("nested")).unwrap();

        fs::write(root.join("index.ts"), "console.log('boot');\n").unwrap();
        fs::write(
            root.join("orchestrator").join("HiveMind.ts"),
            "export class HiveMind {}\n",
        )
        .unwrap();
        fs::write(root.join("meta").join("core.py"), "import os\n").unwrap();
        fs::write(root.join("skills").join("memory").join("memory.py"), "x = 1\n").unwrap();
        fs::write(
            root.join("node_modules").join("chalk").join("index.js"),
            "module.exports = {}\n",
        )
        .unwrap();
        fs::write(
            root.join("deep").join("dist").join("nested").join("out.js"),
            "var a;\n",
        )
        .unwrap();
        fs::write(root.join("README.md"), "# readme\n").unwrap();

        dir
    }

    fn scanner(dir: &TempDir) -> SourceScanner {
        SourceScanner::new(dir.path(), &ScanConfig::default()).unwrap()
    }

    #[test]
    fn test_scan_yields_allowed_modules() {
        let dir = create_source_tree();
        let modules: Vec<_> = scanner(&dir).scan().collect();

        let mut names: Vec<_> = modules.iter().map(|m| m.relative_path.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["index.ts", "meta/core.py", "orchestrator/HiveMind.ts"]);
    }

    #[test]
    fn test_scan_never_yields_excluded_subtrees() {
        let dir = create_source_tree();
        let modules: Vec<_> = scanner(&dir).scan().collect();

        for module in &modules {
            for excluded in ["skills", "node_modules", "dist"] {
                assert!(
                    !module.relative_path.split('/').any(|c| c == excluded),
                    "{} is under excluded dir {}",
                    module.relative_path,
                    excluded
                );
            }
        }
    }

    #[test]
    fn test_rescan_is_identical() {
        let dir = create_source_tree();
        let scanner = scanner(&dir);

        let first: Vec<_> = scanner
            .scan()
            .map(|m| (m.filename, m.fingerprint))
            .collect();
        let second: Vec<_> = scanner
            .scan()
            .map(|m| (m.filename, m.fingerprint))
            .collect();

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_rescan_sees_changes() {
        let dir = create_source_tree();
        let scanner = scanner(&dir);

        let before = scanner.get_module("index.ts").unwrap();
        fs::write(dir.path().join("index.ts"), "export const x = 1;\n").unwrap();
        let after = scanner.get_module("index.ts").unwrap();

        assert_ne!(before.fingerprint, after.fingerprint);
        assert_eq!(after.content, "export const x = 1;\n");
    }

    #[test]
    fn test_dialect_tags() {
        let dir = create_source_tree();
        let scanner = scanner(&dir);

        assert_eq!(
            scanner.get_module("HiveMind.ts").unwrap().dialect,
            Dialect::CompiledStatic
        );
        assert_eq!(
            scanner.get_module("core.py").unwrap().dialect,
            Dialect::DynamicScripting
        );
    }

    #[test]
    fn test_get_module_not_found() {
        let dir = create_source_tree();
        assert!(scanner(&dir).get_module("missing.ts").is_none());
        // Excluded files are not found either.
        assert!(scanner(&dir).get_module("memory.py").is_none());
    }

    #[test]
    fn test_non_utf8_file_is_skipped() {
        let dir = create_source_tree();
        fs::write(dir.path().join("binary.ts"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let modules: Vec<_> = scanner(&dir).scan().collect();
        assert_eq!(modules.len(), 3);
        assert!(modules.iter().all(|m| m.filename != "binary.ts"));
    }

    #[test]
    fn test_paths_are_absolute() {
        let dir = create_source_tree();
        for module in scanner(&dir).scan() {
            assert!(module.path.is_absolute());
            assert!(module.path.ends_with(&module.relative_path));
        }
    }

    #[test]
    fn test_new_rejects_missing_root() {
        let dir = TempDir::new().unwrap();
        let result = SourceScanner::new(dir.path().join("nope"), &ScanConfig::default());
        assert!(matches!(result, Err(GateError::FileNotFound(_))));
    }

    #[test]
    fn test_new_rejects_file_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.ts");
        fs::write(&file, "").unwrap();
        let result = SourceScanner::new(&file, &ScanConfig::default());
        assert!(matches!(result, Err(GateError::NotADirectory(_))));
    }
}
