//! Error types for the document store

use serde::Serialize;
use thiserror::Error;

/// Result type alias for document store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Coarse classification of a [`StoreError`], used by callers that render
/// status messages or pick exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The store failed to construct and serves nothing.
    StoreUnavailable,
    /// Bad input: empty batch, unsupported file, blank query.
    Validation,
    /// The collection holds no documents.
    EmptyCollection,
    /// A search over a non-empty collection produced no result.
    NotFound,
    /// A file could not be read.
    Io,
    /// The embedder rejected its input.
    Embedding,
    /// Unexpected failure inside the index.
    Index,
}

/// Error types that can occur in document store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document store is unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("No files were uploaded")]
    EmptyBatch,

    #[error("File '{name}' is not a JSON or TXT file")]
    UnsupportedFile { name: String },

    #[error("Query is empty: enter a question or search term")]
    EmptyQuery,

    #[error("The collection is empty: upload documents first")]
    EmptyCollection,

    #[error("No relevant document found for '{query}'")]
    NotFound { query: String },

    #[error("Failed to read file '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file '{name}': content is not valid UTF-8")]
    InvalidUtf8 { name: String },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Index error: {0}")]
    Index(String),
}

impl StoreError {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Unavailable { .. } => ErrorKind::StoreUnavailable,
            StoreError::EmptyBatch
            | StoreError::UnsupportedFile { .. }
            | StoreError::EmptyQuery
            | StoreError::InvalidConfig(_) => ErrorKind::Validation,
            StoreError::EmptyCollection => ErrorKind::EmptyCollection,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Io { .. } | StoreError::InvalidUtf8 { .. } => ErrorKind::Io,
            StoreError::Embedding(_) => ErrorKind::Embedding,
            StoreError::DimensionMismatch { .. } | StoreError::Index(_) => ErrorKind::Index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(StoreError::EmptyBatch.kind(), ErrorKind::Validation);
        assert_eq!(StoreError::EmptyQuery.kind(), ErrorKind::Validation);
        assert_eq!(StoreError::EmptyCollection.kind(), ErrorKind::EmptyCollection);
        assert_eq!(
            StoreError::InvalidUtf8 { name: "a.txt".into() }.kind(),
            ErrorKind::Io
        );
        assert_eq!(
            StoreError::DimensionMismatch { expected: 3, actual: 2 }.kind(),
            ErrorKind::Index
        );
    }

    #[test]
    fn test_messages_name_the_file() {
        let err = StoreError::UnsupportedFile { name: "notes.pdf".into() };
        assert!(err.to_string().contains("notes.pdf"));
    }
}
