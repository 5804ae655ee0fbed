use crate::rules::types::{Priority, Rule};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// YAML schema for a standalone custom rules file.
#[derive(Debug, Serialize, Deserialize)]
pub struct CustomRulesConfig {
    pub version: String,
    pub rules: Vec<YamlRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YamlRule {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub priority: String,
    pub patterns: Vec<String>,
    /// Matched against the same-line text preceding a hit.
    #[serde(default)]
    pub exclusions: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CustomRuleError {
    #[error("Failed to read custom rules file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse custom rules YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid regex pattern '{pattern}' in rule {rule_id}: {error}")]
    InvalidPattern {
        rule_id: String,
        pattern: String,
        error: regex::Error,
    },

    #[error("Invalid priority '{value}' in rule {rule_id}. Expected: critical, high, medium, low")]
    InvalidPriority { rule_id: String, value: String },

    #[error("Rule {0} has no patterns")]
    EmptyPatterns(String),

    #[error("Duplicate rule id: {0}")]
    DuplicateId(String),
}

/// Loads custom rules from YAML.
pub struct CustomRuleLoader;

impl CustomRuleLoader {
    pub fn load_from_file(path: &Path) -> Result<Vec<Rule>, CustomRuleError> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content)
    }

    pub fn load_from_string(content: &str) -> Result<Vec<Rule>, CustomRuleError> {
        let config: CustomRulesConfig = serde_yaml::from_str(content)?;
        Self::convert_yaml_rules(config.rules)
    }

    /// Convert rules, rejecting IDs that repeat within the batch.
    pub fn convert_yaml_rules(rules: Vec<YamlRule>) -> Result<Vec<Rule>, CustomRuleError> {
        let mut seen = HashSet::new();
        rules
            .into_iter()
            .map(|yaml| {
                if !seen.insert(yaml.id.clone()) {
                    return Err(CustomRuleError::DuplicateId(yaml.id));
                }
                Self::convert_yaml_rule(yaml)
            })
            .collect()
    }

    pub fn convert_yaml_rule(yaml: YamlRule) -> Result<Rule, CustomRuleError> {
        let priority: Priority =
            yaml.priority
                .parse()
                .map_err(|_| CustomRuleError::InvalidPriority {
                    rule_id: yaml.id.clone(),
                    value: yaml.priority.clone(),
                })?;

        if yaml.patterns.is_empty() {
            return Err(CustomRuleError::EmptyPatterns(yaml.id));
        }

        let patterns = Self::compile_all(&yaml.id, &yaml.patterns)?;
        let exclusions = Self::compile_all(&yaml.id, &yaml.exclusions)?;

        Ok(Rule {
            id: yaml.id,
            description: yaml.description,
            priority,
            patterns,
            exclusions,
        })
    }

    fn compile_all(rule_id: &str, sources: &[String]) -> Result<Vec<Regex>, CustomRuleError> {
        sources
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .multi_line(true)
                    .build()
                    .map_err(|e| CustomRuleError::InvalidPattern {
                        rule_id: rule_id.to_string(),
                        pattern: p.clone(),
                        error: e,
                    })
            })
            .collect()
    }
}
