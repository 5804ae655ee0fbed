//! Configuration layer for rewrite-gate.
//!
//! ## Layers
//! - `types`: Configuration type definitions and defaults
//! - `loading`: File discovery and parsing (YAML, JSON, TOML)
//! - `error`: Loading and validation errors

mod error;
mod loading;
mod types;

pub use error::ConfigError;
pub use types::{ApplyConfig, Config, ProposalConfig, ScanConfig, ValidatorConfig};
