use crate::config::Config;
use crate::rules::builtin;
use crate::rules::custom::{CustomRuleError, CustomRuleLoader};
use crate::rules::types::{Finding, Rule};
use crate::scanner::SourceModule;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Ordered rule registry plus the matching loop.
///
/// Findings come out in registry order, one per rule with at least one
/// match. Built-in rules come first, then custom rules in load order.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    pub fn new() -> Self {
        Self {
            rules: builtin::all_rules().to_vec(),
        }
    }

    /// Engine over an explicit registry, without the built-in rules.
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Built-in rules plus the config's custom rules, minus disabled IDs.
    ///
    /// Inline `rules` come before the rules of the `custom_rules` file.
    pub fn from_config(config: &Config) -> Result<Self, CustomRuleError> {
        let inline = CustomRuleLoader::convert_yaml_rules(config.rules.clone())?;
        let mut engine = Self::new().with_custom_rules(inline)?;
        if let Some(path) = &config.custom_rules {
            let from_file = CustomRuleLoader::load_from_file(path)?;
            debug!(path = %path.display(), rules = from_file.len(), "Loaded custom rules file");
            engine = engine.with_custom_rules(from_file)?;
        }
        let engine = engine.with_disabled_rules(&config.disabled_rules);
        debug!(rules = engine.rules.len(), "Rule registry ready");
        Ok(engine)
    }

    /// Append rules. An ID already in the registry is rejected.
    pub fn with_custom_rules(mut self, rules: Vec<Rule>) -> Result<Self, CustomRuleError> {
        for rule in rules {
            if self.get_rule(&rule.id).is_some() {
                return Err(CustomRuleError::DuplicateId(rule.id));
            }
            self.rules.push(rule);
        }
        Ok(self)
    }

    pub fn with_disabled_rules(mut self, disabled: &HashSet<String>) -> Self {
        self.rules.retain(|r| !disabled.contains(&r.id));
        self
    }

    pub fn get_rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn analyze(&self, module: &SourceModule) -> Vec<Finding> {
        self.check_content(&module.content, &module.relative_path)
    }

    /// Run every rule over `content`. Pure: no I/O.
    pub fn check_content(&self, content: &str, file: &str) -> Vec<Finding> {
        trace!(
            file,
            lines = content.lines().count(),
            rules = self.rules.len(),
            "Checking content against rules"
        );

        self.rules
            .iter()
            .filter_map(|rule| {
                let count = rule.count_matches(content);
                (count > 0).then(|| Finding::new(rule, count, file))
            })
            .collect()
    }

    /// Analyze modules in parallel. Output keeps module order, then registry order.
    pub fn analyze_all(&self, modules: &[SourceModule]) -> Vec<Finding> {
        modules
            .par_iter()
            .map(|module| self.analyze(module))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }
}
