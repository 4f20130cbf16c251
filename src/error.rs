//! Error types for cppspell

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cppspell operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A leave/remove/split setting held a value outside the three strategies
    #[error("Invalid strategy '{value}' for '{rule}' (expected leave, remove or split)")]
    InvalidStrategy { rule: String, value: String },

    /// Config file could not be read
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the settings schema
    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// One of the built-in matchers failed to compile
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Worker pool could not be started
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
