//! Directory walking abstraction for consistent file discovery.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkConfig {
    /// Directory names whose subtree is pruned (e.g., ["node_modules", ".git"]).
    pub excluded_dirs: HashSet<String>,
    /// File extensions to include (e.g., ["ts", "py"]). Empty means all.
    pub file_extensions: HashSet<String>,
    /// File name prefixes that are never yielded (e.g., scratch files).
    pub skipped_prefixes: Vec<String>,
    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

impl WalkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set directory names to prune.
    pub fn with_excluded_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Set file extensions to include.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set file name prefixes to skip.
    pub fn with_skipped_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skipped_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Set whether to follow symlinks.
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

/// Lazily walks a directory tree, pruning excluded directories.
///
/// Entries are visited in file-name order so repeated walks of an unchanged
/// tree yield the same sequence.
pub struct DirectoryWalker {
    config: WalkConfig,
}

impl DirectoryWalker {
    pub fn new(config: WalkConfig) -> Self {
        Self { config }
    }

    /// Check if an entry below the root names an excluded directory.
    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.config.excluded_dirs.contains(name))
    }

    /// Check if a path matches the configured extensions.
    fn matches_extension(&self, path: &Path) -> bool {
        if self.config.file_extensions.is_empty() {
            return true;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.config.file_extensions.contains(ext))
    }

    fn is_skipped_file(&self, entry: &DirEntry) -> bool {
        entry.file_name().to_str().is_some_and(|name| {
            self.config
                .skipped_prefixes
                .iter()
                .any(|prefix| name.starts_with(prefix.as_str()))
        })
    }

    /// Walk the directory and yield matching file paths.
    ///
    /// Unreadable directories are logged and skipped.
    pub fn walk<'a>(&'a self, root: &Path) -> impl Iterator<Item = PathBuf> + use<'a> {
        WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| !self.is_excluded(e))
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter(move |e| !self.is_skipped_file(e))
            .filter(move |e| self.matches_extension(e.path()))
            .map(DirEntry::into_path)
    }
}
