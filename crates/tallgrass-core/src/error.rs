//! Error types for tallgrass-core

use thiserror::Error;

/// Core error type
///
/// Store operations never fail at runtime; they report rejected requests
/// through their return values. These errors come from building states and
/// configurations that would break an invariant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Party has {size} members, the limit is {max}")]
    PartyOverflow { size: usize, max: usize },

    #[error("Active index {index} is out of range for a party of {size}")]
    ActiveIndexOutOfRange { index: usize, size: usize },

    #[error("Duplicate bag entry for item: {0}")]
    DuplicateItem(String),

    #[error("Invalid creature {id}: {reason}")]
    InvalidCreature { id: String, reason: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
