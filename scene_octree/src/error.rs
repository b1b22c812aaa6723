//! Error types for the scene octree
//!
//! Tree restructuring (expand, split, descent) cannot fail. Errors only
//! come from the boundaries: entities the source cannot describe,
//! unknown ids or keys, and bounds the index cannot place.

use std::fmt;

/// Result type for octree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Octree errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The entity source has no bounding box or transform for the entity
    MissingComponents(String),

    /// The entity has no record in the index
    EntityNotIndexed(String),

    /// A record key that was already freed (or never belonged to this index)
    StaleRecord(String),

    /// Bounds containing NaN or infinite values
    InvalidBounds(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingComponents(msg) => write!(f, "Missing components: {}", msg),
            Error::EntityNotIndexed(msg) => write!(f, "Entity not indexed: {}", msg),
            Error::StaleRecord(msg) => write!(f, "Stale record: {}", msg),
            Error::InvalidBounds(msg) => write!(f, "Invalid bounds: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
