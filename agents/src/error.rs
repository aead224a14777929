//! Error types for the agents crate

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("book ratio {ratio} must lie in [0, 1]")]
    InvalidRatio { ratio: f64 },

    #[error("book path of {len} cells exceeds book depth {depth}")]
    PathTooLong { len: usize, depth: usize },

    #[error("book path is empty")]
    EmptyPath,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
