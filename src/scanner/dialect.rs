use serde::{Deserialize, Serialize};

/// Source language family of a file. Decides which validation gates apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// Checked by an external compiler (e.g. TypeScript).
    CompiledStatic,
    /// Checked by parsing only (e.g. Python, JavaScript).
    DynamicScripting,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::CompiledStatic => "compiled-static",
            Dialect::DynamicScripting => "dynamic-scripting",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_serialization() {
        let json = serde_json::to_string(&Dialect::CompiledStatic).unwrap();
        assert_eq!(json, "\"compiled-static\"");

        let parsed: Dialect = serde_json::from_str("\"dynamic-scripting\"").unwrap();
        assert_eq!(parsed, Dialect::DynamicScripting);
    }

    #[test]
    fn test_dialect_display() {
        assert_eq!(Dialect::CompiledStatic.to_string(), "compiled-static");
        assert_eq!(Dialect::DynamicScripting.to_string(), "dynamic-scripting");
    }
}
