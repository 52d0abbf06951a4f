//! Error types for model validation and catalog operations.

use thiserror::Error;

/// Errors raised when creating, renaming or validating model entities.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A name was empty after trimming
    #[error("{kind} name must not be empty")]
    EmptyName {
        /// Kind of entity being named (e.g. "signage type")
        kind: &'static str,
    },

    /// Another entity of the same kind already uses the name
    #[error("A {kind} named '{name}' already exists")]
    DuplicateName {
        /// Kind of entity being named
        kind: &'static str,
        /// The conflicting name
        name: String,
    },

    /// Referenced entity does not exist
    #[error("{kind} not found: {key}")]
    NotFound {
        /// Kind of entity looked up
        kind: &'static str,
        /// Id or name used for the lookup
        key: String,
    },

    /// Annotation geometry is unusable
    #[error("Invalid points: {message}")]
    InvalidPoints {
        /// Description of the geometry problem
        message: String,
    },

    /// Holder type side count outside 1..=2
    #[error("Holder type must have 1 or 2 sides, got {sides}")]
    InvalidSides {
        /// The rejected side count
        sides: u8,
    },

    /// Colour string that isn't `#rrggbb`
    #[error("Invalid colour '{0}', expected #rrggbb")]
    InvalidColor(String),

    /// Floor plan image could not be inspected
    #[error("Floor plan image error: {0}")]
    Image(#[from] image::ImageError),
}

impl ModelError {
    /// Create a not-found error.
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Create an invalid points error.
    pub fn invalid_points(message: impl Into<String>) -> Self {
        Self::InvalidPoints {
            message: message.into(),
        }
    }
}
