#[cfg(test)]
pub mod fixtures {
    use crate::engine::RewriteProposal;
    use crate::rules::Priority;
    use crate::validator::{CompileCheck, CompileOutcome};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Compile checker with a fixed answer that records every call.
    #[derive(Debug, Clone)]
    pub struct FixedCompiler {
        outcome: CompileOutcome,
        calls: Arc<AtomicUsize>,
        /// Path handed to each call and whether it existed at that moment.
        files: Arc<Mutex<Vec<(PathBuf, bool)>>>,
    }

    impl FixedCompiler {
        pub fn new(outcome: CompileOutcome) -> Self {
            Self {
                outcome,
                calls: Arc::new(AtomicUsize::new(0)),
                files: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn passing() -> Self {
            Self::new(CompileOutcome::Passed)
        }

        pub fn failing(output: &str) -> Self {
            Self::new(CompileOutcome::Failed(output.to_string()))
        }

        pub fn unavailable() -> Self {
            Self::new(CompileOutcome::Unavailable("tsc unavailable".to_string()))
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn files(&self) -> Vec<(PathBuf, bool)> {
            self.files.lock().unwrap().clone()
        }
    }

    impl CompileCheck for FixedCompiler {
        fn check(&self, _project_root: &Path, file: &Path) -> CompileOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.files
                .lock()
                .unwrap()
                .push((file.to_path_buf(), file.exists()));
            self.outcome.clone()
        }
    }

    /// Project root with an empty `src/` directory.
    pub fn create_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        dir
    }

    /// Write `content` to `src/<relative>`, creating parent directories.
    pub fn write_source(project: &TempDir, relative: &str, content: &str) -> PathBuf {
        let path = project.path().join("src").join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn create_proposal(target_file: &str, priority: Priority) -> RewriteProposal {
        RewriteProposal {
            target_file: target_file.to_string(),
            issue_description: format!("[Static][any-type] Explicit any ({target_file})"),
            proposed_change: format!("Refactor any-type violations in {target_file}"),
            priority,
            provider: "StaticAnalyzer".to_string(),
            confidence: 0.95,
            accepted: false,
        }
    }
}
