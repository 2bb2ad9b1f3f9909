// Sayaç CRM - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every error keeps its cause so the
// caller can log the full chain.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all CRM operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum CrmError {
    /// Durable storage read/write or record-list mutation failed.
    Storage(StorageError),

    /// Export operation failed.
    Export(ExportError),

    /// A command-line argument did not name a valid value.
    InvalidArgument {
        argument: &'static str,
        value: String,
        expected: String,
    },

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for CrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::InvalidArgument {
                argument,
                value,
                expected,
            } => write!(f, "Invalid {argument} '{value}'. Expected: {expected}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for CrmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::InvalidArgument { .. } => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

/// Errors related to the durable record store and its backends.
#[derive(Debug)]
pub enum StorageError {
    /// The record list could not be serialised for writing.
    Serialise {
        key: String,
        source: serde_json::Error,
    },

    /// The backend failed to write a slot.
    Write {
        key: String,
        path: PathBuf,
        source: io::Error,
    },

    /// A record with this id is already in the list.
    DuplicateId { id: String },

    /// No record with this id exists in the list.
    NotFound { id: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialise { key, source } => {
                write!(f, "Failed to serialise slot '{key}': {source}")
            }
            Self::Write { key, path, source } => write!(
                f,
                "Failed to write slot '{key}' to '{}': {source}",
                path.display()
            ),
            Self::DuplicateId { id } => {
                write!(f, "A record with id '{id}' already exists")
            }
            Self::NotFound { id } => write!(f, "No record with id '{id}'"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialise { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<StorageError> for CrmError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// The CSV writer produced bytes that are not valid UTF-8.
    Encoding { source: std::string::FromUtf8Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { source } => write!(f, "CSV export error: {source}"),
            Self::Encoding { source } => write!(f, "CSV output is not UTF-8: {source}"),
            Self::Json { source } => write!(f, "JSON export error: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Encoding { source } => Some(source),
            Self::Json { source } => Some(source),
        }
    }
}

impl From<ExportError> for CrmError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for CRM results.
pub type Result<T> = std::result::Result<T, CrmError>;
