use crate::rules::types::{Priority, Rule};
use regex::Regex;

pub fn rules() -> Vec<Rule> {
    vec![console_log_in_prod(), debugger_statement()]
}

fn console_log_in_prod() -> Rule {
    Rule {
        id: "console-log-in-prod".to_string(),
        description: "console.log left in shipped code".to_string(),
        priority: Priority::Low,
        patterns: vec![
            Regex::new(r"(?m)console\.log\(").expect("console-log-in-prod: invalid regex"),
        ],
        exclusions: vec![],
    }
}

fn debugger_statement() -> Rule {
    Rule {
        id: "debugger-statement".to_string(),
        description: "debugger statement left in shipped code".to_string(),
        priority: Priority::Low,
        patterns: vec![
            Regex::new(r"(?m)^\s*debugger\s*;?\s*$").expect("debugger-statement: invalid regex"),
        ],
        exclusions: vec![],
    }
}
