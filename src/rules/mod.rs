pub mod builtin;
pub mod custom;
pub mod engine;
pub mod types;

pub use custom::{CustomRuleError, CustomRuleLoader, YamlRule};
pub use engine::RuleEngine;
pub use types::{Finding, Priority, Rule};
