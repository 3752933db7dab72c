//! Error types for liteorm

use thiserror::Error;

/// Result type alias for liteorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for statement building, model binding and execution
#[derive(Debug, Error)]
pub enum OrmError {
    /// A statement was assembled in a state that must never reach the store
    #[error("Invalid statement: {0}")]
    Build(String),

    /// `get` was called with a field set that differs from the identifying columns
    #[error("Cannot get from '{table}' without matching ids: expected {expected:?}, got {given:?}")]
    IdMismatch {
        table: String,
        expected: Vec<String>,
        given: Vec<String>,
    },

    /// An identity-based operation on a table without identifying columns
    #[error("Table '{0}' has no identifying columns")]
    MissingIds(String),

    /// No table registered under this name or type
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// Two model types mapped to the same table name
    #[error("Table '{table}' is already registered for '{existing}', cannot bind '{model}'")]
    DuplicateTable {
        table: String,
        existing: String,
        model: String,
    },

    /// No column with this name in the table
    #[error("No column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// The model does not expose this field
    #[error("Model '{model}' has no field '{field}'")]
    UnknownField { model: String, field: String },

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Store execution error, passed through untranslated
    #[error("Query error: {0}")]
    Query(#[from] rusqlite::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Connection lifecycle error
    #[error("Connection error: {0}")]
    Connection(String),
}

impl OrmError {
    /// Create a build-time contract violation
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error naming the resource and its key
    pub fn not_found(resource: impl AsRef<str>, key: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} {}", resource.as_ref(), key))
    }

    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn unknown_field(model: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            model: model.into(),
            field: field.into(),
        }
    }

    /// Check if this error is a programming error caught before reaching the store
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::Build(_)
                | Self::IdMismatch { .. }
                | Self::MissingIds(_)
                | Self::DuplicateTable { .. }
        )
    }

    /// Check if this is a lookup error (unknown table, column or field)
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Self::UnknownTable(_) | Self::UnknownColumn { .. } | Self::UnknownField { .. }
        )
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error was raised by SQLite itself
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}

impl<T> From<std::sync::PoisonError<T>> for OrmError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Connection(format!("execution lock poisoned: {err}"))
    }
}
