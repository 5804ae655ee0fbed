use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Destructive or sandbox-escaping constructs a proposal must never contain.
pub const BUILTIN_DENY_PATTERNS: &[&str] = &[
    r"rm\s+-rf",
    r"process\.exit\s*\(",
    r"\beval\s*\(",
    r"new\s+Function\s*\(",
    r#"__import__\s*\(\s*['"]os['"]"#,
    r#"subprocess\.call\s*\(\s*['"]rm"#,
    r"DROP\s+TABLE",
    r"DELETE\s+FROM\s+\w+\s*;?\s*$",
];

static BUILTIN: LazyLock<Vec<(String, Regex)>> = LazyLock::new(|| {
    BUILTIN_DENY_PATTERNS
        .iter()
        .map(|src| {
            let regex = compile(src).expect("deny list: invalid builtin regex");
            (src.to_string(), regex)
        })
        .collect()
});

fn compile(src: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(src)
        .case_insensitive(true)
        .multi_line(true)
        .build()
}

/// Case-insensitive, multi-line deny list. Patterns are checked in order.
#[derive(Debug, Clone)]
pub struct DenyList {
    patterns: Vec<(String, Regex)>,
}

impl Default for DenyList {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DenyList {
    pub fn builtin() -> Self {
        Self {
            patterns: BUILTIN.clone(),
        }
    }

    /// Builtin patterns followed by `extra`.
    pub fn with_extra(extra: &[String]) -> Result<Self, regex::Error> {
        let mut list = Self::builtin();
        for src in extra {
            list.patterns.push((src.clone(), compile(src)?));
        }
        Ok(list)
    }

    /// Source text of the first pattern found in `text`.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(src, _)| src.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
