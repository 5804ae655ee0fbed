use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of one external compile check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    Passed,
    /// Compiler ran and rejected the code, or exceeded its time budget.
    Failed(String),
    /// Compiler could not be started. Callers treat this as a degraded pass.
    Unavailable(String),
}

/// Type-checks the project containing `file`.
pub trait CompileCheck: Send + Sync {
    fn check(&self, project_root: &Path, file: &Path) -> CompileOutcome;
}

/// Runs an external compiler from the project root with a hard timeout.
///
/// An argument containing `{file}` is expanded to the staged file path.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandCompiler {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// Build from an argv list such as `["npx", "tsc", "--noEmit"]`.
    pub fn from_argv(argv: &[String], timeout: Duration) -> Self {
        match argv.split_first() {
            Some((program, args)) => Self::new(program.clone(), args.to_vec(), timeout),
            None => Self::new(String::new(), Vec::new(), timeout),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl CompileCheck for CommandCompiler {
    fn check(&self, project_root: &Path, file: &Path) -> CompileOutcome {
        let file_arg = file.to_string_lossy();
        let args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace("{file}", &file_arg))
            .collect();

        debug!(program = %self.program, ?args, root = %project_root.display(), "Running compile check");

        let mut child = match Command::new(&self.program)
            .args(&args)
            .current_dir(project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(program = %self.program, "Compiler not found, compile gate degraded");
                return CompileOutcome::Unavailable(format!("{} unavailable: {e}", self.program));
            }
            Err(e) => {
                return CompileOutcome::Failed(format!("could not start {}: {e}", self.program));
            }
        };

        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);
        let deadline = Instant::now() + self.timeout;

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!(program = %self.program, timeout_secs = self.timeout.as_secs(), "Compile check timed out");
                    // Grandchildren may still hold the pipes; the reader threads are left detached.
                    return CompileOutcome::Failed(format!(
                        "compile check timed out after {}s",
                        self.timeout.as_secs()
                    ));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    return CompileOutcome::Failed(format!("failed to wait for {}: {e}", self.program));
                }
            }
        };

        if status.success() {
            return CompileOutcome::Passed;
        }

        let mut output = collect(stdout);
        output.push_str(&collect(stderr));
        let output = output.trim_end();
        if output.is_empty() {
            CompileOutcome::Failed(format!("{} exited with {status}", self.program))
        } else {
            CompileOutcome::Failed(output.to_string())
        }
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
