use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Report order: most urgent first.
    pub const DESCENDING: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!(
                "invalid priority '{s}', expected: critical, high, medium, low"
            )),
        }
    }
}

/// One entry of the rule registry.
///
/// Patterns run over the whole file text in multi-line mode. A hit is
/// discarded when an exclusion matches the text between the start of its
/// line and the hit.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub description: String,
    pub priority: Priority,
    pub patterns: Vec<Regex>,
    pub exclusions: Vec<Regex>,
}

impl Rule {
    /// Total number of non-excluded matches across all patterns.
    pub fn count_matches(&self, text: &str) -> usize {
        self.patterns
            .iter()
            .map(|pattern| self.count_pattern(pattern, text))
            .sum()
    }

    fn count_pattern(&self, pattern: &Regex, text: &str) -> usize {
        let mut count = 0;
        let mut pos = 0;

        while pos <= text.len() {
            let Some(m) = pattern.find_at(text, pos) else {
                break;
            };

            if self.is_excluded(text, m.start()) {
                // Retry from the next character, as a look-behind engine would.
                pos = next_char_boundary(text, m.start());
                continue;
            }

            count += 1;
            pos = if m.end() > m.start() {
                m.end()
            } else {
                next_char_boundary(text, m.end())
            };
        }

        count
    }

    fn is_excluded(&self, text: &str, start: usize) -> bool {
        if self.exclusions.is_empty() {
            return false;
        }
        let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
        let prefix = &text[line_start..start];
        self.exclusions.iter().any(|e| e.is_match(prefix))
    }
}

fn next_char_boundary(text: &str, index: usize) -> usize {
    index + text[index..].chars().next().map_or(1, char::len_utf8)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub description: String,
    pub priority: Priority,
    pub match_count: usize,
    /// Owning file, relative to the scan root.
    pub file: String,
}

impl Finding {
    pub fn new(rule: &Rule, match_count: usize, file: &str) -> Self {
        Self {
            rule_id: rule.id.clone(),
            description: rule.description.clone(),
            priority: rule.priority,
            match_count,
            file: file.to_string(),
        }
    }
}
