//! # Error Types: Schema Load Failures
//!
//! Structured errors for schema discovery and validation. Every variant
//! carries the document id or path it concerns so a rejected schema can be
//! traced back to its file.
//!
//! ## Design
//!
//! None of these errors escape a registry load. Document-level errors are
//! logged and collected into the [`BuildReport`](crate::build::BuildReport);
//! source-level errors degrade the load to the built-in defaults.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while discovering and validating entity schemas.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The configured source location is missing or is not a directory.
    #[error("schema source unavailable at {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    /// A single schema document could not be read.
    #[error("failed to read schema document {path}: {source}")]
    DocumentRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The front block is missing its closing sentinel or failed to parse.
    #[error("malformed front block in {document}: {reason}")]
    MalformedBlock { document: String, reason: String },

    /// A required field has no explicit value and no fallback.
    #[error("schema {document}: no resolution.{field} and no fallback for '{type_key}'")]
    MissingRequiredField {
        document: String,
        type_key: String,
        field: &'static str,
    },

    /// Two documents in one load resolved to the same type key.
    #[error("duplicate type key '{type_key}' in {document}")]
    DuplicateTypeKey { type_key: String, document: String },

    /// Two documents in one load resolved to the same folder.
    #[error("folder collision: {folder} used by both {claimed_by} and {rejected}")]
    FolderCollision {
        folder: String,
        claimed_by: String,
        rejected: String,
    },

    /// A field value is present but outside its permitted range.
    #[error("schema {document}: invalid {field}: {reason}")]
    InvalidField {
        document: String,
        field: &'static str,
        reason: String,
    },

    /// No document produced a usable record.
    #[error("no schemas loaded from source")]
    EmptyResult,
}

impl SchemaError {
    /// Whether this error records a folder collision.
    pub fn is_collision(&self) -> bool {
        matches!(self, Self::FolderCollision { .. })
    }
}

/// Result type alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
