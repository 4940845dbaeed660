//! Error types for template storage

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while saving or loading templates
#[derive(Error, Debug)]
pub enum StoreError {
    /// Template name is empty after trimming
    #[error("Template name is empty")]
    EmptyName,

    /// Two stored templates share a name
    #[error("Duplicate template name: {0}")]
    DuplicateName(String),

    /// No template with this name
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Store file could not be parsed or written as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
