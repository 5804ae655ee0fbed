use thiserror::Error;

use crate::config::ConfigError;
use crate::rules::CustomRuleError;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read file: {path}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path is not a directory: {0}")]
    NotADirectory(String),

    #[error("Failed to parse file: {path} - {message}")]
    ParseError { path: String, message: String },

    #[error("Regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    CustomRule(#[from] CustomRuleError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

pub type Result<T> = std::result::Result<T, GateError>;
