//! Error types for conversion operations

use thiserror::Error;

/// Errors that can occur while building sidebars or transpiling documents
#[derive(Debug, Error)]
pub enum BabelError {
    /// The markup could not be parsed into an element tree
    #[error("Parse error: {0}")]
    Parse(String),

    /// A computed hierarchy depth fell below 1
    #[error("Invalid depth {depth} for section '{section}': depths start at 1")]
    InvalidDepth { section: String, depth: i64 },

    /// A source could not be read
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Front matter could not be serialized
    #[error("Front matter error: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
}
