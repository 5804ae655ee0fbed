use crate::rules::types::{Priority, Rule};
use regex::Regex;

pub fn rules() -> Vec<Rule> {
    vec![any_type(), ts_ignore()]
}

fn any_type() -> Rule {
    Rule {
        id: "any-type".to_string(),
        description: "Explicit `any` annotation disables type checking".to_string(),
        priority: Priority::Medium,
        patterns: vec![Regex::new(r"(?m):\s*any\b").expect("any-type: invalid regex")],
        exclusions: vec![],
    }
}

fn ts_ignore() -> Rule {
    Rule {
        id: "ts-ignore".to_string(),
        description: "Compiler diagnostics suppressed with @ts-ignore".to_string(),
        priority: Priority::Medium,
        patterns: vec![Regex::new(r"(?m)//\s*@ts-ignore\b").expect("ts-ignore: invalid regex")],
        exclusions: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_type() {
        let rule = any_type();
        assert_eq!(rule.count_matches("function f(a: any, b:any): any {}"), 3);
        assert_eq!(rule.count_matches("const anyway: string = 'x';"), 0);
        assert_eq!(rule.count_matches("let x: anything;"), 0);
    }

    #[test]
    fn test_ts_ignore() {
        let rule = ts_ignore();
        assert_eq!(rule.count_matches("// @ts-ignore\nfoo.bar = 1;\n"), 1);
        assert_eq!(rule.count_matches("// @ts-expect-error\n"), 0);
    }
}
