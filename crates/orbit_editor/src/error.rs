//! Error types for the editor core
//!
//! Command execution itself never fails; these cover the collaborator-facing
//! document calls and the preference file.

use thiserror::Error;

use crate::core::ObjectId;

/// Errors from direct document operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// An object with this id is already in the document
    #[error("Object already exists: {0}")]
    DuplicateObject(ObjectId),

    /// No object with this id is in the document
    #[error("Object not found: {0}")]
    UnknownObject(ObjectId),
}

/// Errors from loading or saving preferences
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid preferences: {0}")]
    Invalid(String),
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;
