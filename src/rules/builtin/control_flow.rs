use crate::rules::types::{Priority, Rule};
use regex::Regex;

pub fn rules() -> Vec<Rule> {
    vec![unhandled_promise(), error_return_string(), bare_except()]
}

fn unhandled_promise() -> Rule {
    Rule {
        id: "unhandled-promise".to_string(),
        description: "Method call result discarded without await; async failures go unobserved"
            .to_string(),
        priority: Priority::High,
        patterns: vec![
            Regex::new(r"(?m)\b\w+\.\w+\(.*\)\s*;").expect("unhandled-promise: invalid regex"),
        ],
        exclusions: vec![
            Regex::new(r"\bawait\s+$").expect("unhandled-promise: invalid regex"),
        ],
    }
}

fn error_return_string() -> Rule {
    Rule {
        id: "error-return-string".to_string(),
        description: "Error reported as a colored string return value instead of a thrown error"
            .to_string(),
        priority: Priority::Critical,
        patterns: vec![
            Regex::new(r"(?m)return\s+chalk\.(red|yellow)\(")
                .expect("error-return-string: invalid regex"),
        ],
        exclusions: vec![],
    }
}

fn bare_except() -> Rule {
    Rule {
        id: "bare-except".to_string(),
        description: "Bare except clause swallows every exception, including interrupts"
            .to_string(),
        priority: Priority::High,
        patterns: vec![Regex::new(r"(?m)^\s*except\s*:").expect("bare-except: invalid regex")],
        exclusions: vec![],
    }
}
