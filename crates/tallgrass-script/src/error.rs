//! Error types for tallgrass-script

use thiserror::Error;

/// Script loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Duplicate definition: {0}")]
    DuplicateDefinition(String),

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error(transparent)]
    Core(#[from] tallgrass_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
