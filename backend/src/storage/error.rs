//! # Store Errors
//!
//! Error shape shared by every [`RecordStore`](super::store::RecordStore)
//! implementation. The gateway never lets these escape upward; it only
//! inspects the classification to pick a fallback.

use thiserror::Error;

/// Classification of a remote-store failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The expected table does not exist in the remote schema
    TableMissing,
    /// The expected column does not exist in the remote schema
    ColumnMissing,
    /// A single-row query matched no row
    RowMissing,
    /// The store could not be reached at all
    Unavailable,
    /// Any other backend failure (constraint, syntax, corruption, ...)
    Backend,
}

impl StoreErrorKind {
    /// Stable error code carried on the wire
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorKind::TableMissing => "TABLE_MISSING",
            StoreErrorKind::ColumnMissing => "COLUMN_MISSING",
            StoreErrorKind::RowMissing => "ROW_MISSING",
            StoreErrorKind::Unavailable => "UNAVAILABLE",
            StoreErrorKind::Backend => "BACKEND",
        }
    }
}

/// Error returned by record-store operations, carrying a code and message
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}: {}", .kind.code(), .message)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether this failure means the remote schema has not been provisioned
    /// yet (missing table/column, or a singleton row that was never written).
    /// These are recoverable conditions, distinct from genuine connectivity
    /// or backend failures.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::TableMissing | StoreErrorKind::ColumnMissing | StoreErrorKind::RowMissing
        )
    }
}
