mod control_flow;
mod debugging;
mod typing;

use crate::rules::types::Rule;
use std::sync::LazyLock;

static ALL_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let mut rules = Vec::with_capacity(8);
    rules.extend(control_flow::rules());
    rules.extend(typing::rules());
    rules.extend(debugging::rules());
    rules
});

/// Built-in rules in registry order. Findings are reported in this order.
pub fn all_rules() -> &'static [Rule] {
    &ALL_RULES
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_order() {
        let ids: Vec<_> = all_rules().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "unhandled-promise",
                "error-return-string",
                "bare-except",
                "any-type",
                "ts-ignore",
                "console-log-in-prod",
                "debugger-statement",
            ]
        );
    }

    #[test]
    fn test_rule_ids_are_unique() {
        let ids: HashSet<_> = all_rules().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), all_rules().len());
    }

    #[test]
    fn test_every_rule_has_a_pattern() {
        for rule in all_rules() {
            assert!(!rule.patterns.is_empty(), "{} has no patterns", rule.id);
            assert!(!rule.description.is_empty(), "{} has no description", rule.id);
        }
    }
}
