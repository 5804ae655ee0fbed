//! Configuration type definitions.

use crate::rules::custom::YamlRule;
use crate::scanner::Dialect;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use super::error::ConfigError;

/// Main configuration structure for rewrite-gate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source discovery configuration.
    pub scan: ScanConfig,
    /// Safety gate thresholds and the compile check command.
    pub validator: ValidatorConfig,
    /// Post-write verification used by the apply step.
    pub apply: ApplyConfig,
    /// Remote proposal service settings.
    pub proposal: ProposalConfig,
    /// Rule IDs to disable.
    pub disabled_rules: HashSet<String>,
    /// Custom rules defined in config file.
    pub rules: Vec<YamlRule>,
    /// YAML rules file loaded after `rules`. Relative to the project root.
    pub custom_rules: Option<PathBuf>,
}

impl Config {
    pub fn is_rule_disabled(&self, rule_id: &str) -> bool {
        self.disabled_rules.contains(rule_id)
    }

    /// Reject values that would make the gates meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratio = self.validator.min_size_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::InvalidValue {
                field: "validator.min_size_ratio",
                message: format!("{ratio} is outside 0.0..=1.0"),
            });
        }
        if self.validator.compile_command.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "validator.compile_command",
                message: "command must name a program".to_string(),
            });
        }
        if self.apply.verify_command.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "apply.verify_command",
                message: "command must name a program".to_string(),
            });
        }
        if self.apply.backup_suffix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "apply.backup_suffix",
                message: "suffix must not be empty".to_string(),
            });
        }
        if self.scan.dialects.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scan.dialects",
                message: "at least one extension must be allowed".to_string(),
            });
        }
        Ok(())
    }
}

/// Source discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory holding the live source, relative to the project root.
    pub source_dir: String,
    /// Directory names whose whole subtree is skipped.
    pub excluded_dirs: HashSet<String>,
    /// Allowed extensions (without the dot) and the dialect they map to.
    pub dialects: BTreeMap<String, Dialect>,
    /// Whether to follow symbolic links while walking.
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let excluded_dirs: HashSet<String> = ["node_modules", "dist", "completions", ".git", "skills"]
            .into_iter()
            .map(String::from)
            .collect();

        let dialects: BTreeMap<String, Dialect> = [
            ("ts", Dialect::CompiledStatic),
            ("js", Dialect::DynamicScripting),
            ("py", Dialect::DynamicScripting),
        ]
        .into_iter()
        .map(|(ext, dialect)| (ext.to_string(), dialect))
        .collect();

        Self {
            source_dir: "src".to_string(),
            excluded_dirs,
            dialects,
            follow_symlinks: false,
        }
    }
}

impl ScanConfig {
    /// Dialect for a file name, or `None` when its extension is not allow-listed.
    pub fn dialect_for(&self, filename: &str) -> Option<Dialect> {
        let (_, ext) = filename.rsplit_once('.')?;
        self.dialects.get(ext).copied()
    }
}

/// Safety gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Originals at or below this many characters skip the shrinkage gate.
    pub min_original_len: usize,
    /// Proposals shorter than this fraction of the original are rejected.
    pub min_size_ratio: f64,
    /// Additional deny-list regexes appended to the builtin list.
    pub deny_patterns: Vec<String>,
    /// Compiler invocation in check-only mode, run from the project root.
    pub compile_command: Vec<String>,
    /// Upper bound for one compile check.
    pub compile_timeout_secs: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_original_len: 100,
            min_size_ratio: 0.2,
            deny_patterns: Vec::new(),
            compile_command: ["npx", "tsc", "--noEmit", "--skipLibCheck"]
                .into_iter()
                .map(String::from)
                .collect(),
            compile_timeout_secs: 30,
        }
    }
}

impl ValidatorConfig {
    pub fn compile_timeout(&self) -> Duration {
        Duration::from_secs(self.compile_timeout_secs)
    }
}

/// Apply step configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyConfig {
    /// Compiler invocation used to verify a written compiled-static file.
    pub verify_command: Vec<String>,
    /// Upper bound for the post-write verification.
    pub verify_timeout_secs: u64,
    /// Extension appended to the sibling backup file.
    pub backup_suffix: String,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            verify_command: ["npx", "tsc", "--noEmit"]
                .into_iter()
                .map(String::from)
                .collect(),
            verify_timeout_secs: 60,
            backup_suffix: "bak".to_string(),
        }
    }
}

impl ApplyConfig {
    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_secs)
    }
}

/// Remote proposal service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalConfig {
    /// Base URL of the proposal service.
    pub server_url: String,
    pub rewrite_timeout_secs: u64,
    pub analyze_timeout_secs: u64,
    /// Provider requested when the caller names none.
    pub default_provider: String,
}

impl Default for ProposalConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            rewrite_timeout_secs: 120,
            analyze_timeout_secs: 60,
            default_provider: "Kimi".to_string(),
        }
    }
}
