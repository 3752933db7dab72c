//! Error types for liteorm-json

use thiserror::Error;

/// Result type alias for JSON binding operations
pub type JsonResult<T> = Result<T, JsonError>;

/// Errors raised while resolving schemas or converting values
#[derive(Debug, Error)]
pub enum JsonError {
    /// Malformed wire text
    #[error("Malformed JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// A value with the wrong shape
    #[error("Expected {expected}, found {found}")]
    Type {
        expected: &'static str,
        found: &'static str,
    },

    /// A fixed-length list with the wrong number of items
    #[error("Expected {expected} items, found {found}")]
    Arity { expected: usize, found: usize },

    /// A type descriptor with no resolvable shape
    #[error("Unresolvable field type: {0}")]
    Unresolved(String),

    /// The model was never registered with the bindings
    #[error("Model '{0}' has no registered schema")]
    NotRegistered(String),

    /// The model does not expose this field
    #[error("Model '{model}' has no field '{field}'")]
    UnknownField { model: String, field: String },

    /// A nested failure, tagged with the key or index where it happened
    #[error("{field}: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<JsonError>,
    },
}

impl JsonError {
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::Type { expected, found }
    }

    /// Tag an error with the key or index it happened under.
    pub fn at(self, field: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// Whether the error is attributable to untrusted input.
    pub fn is_decode(&self) -> bool {
        match self {
            Self::Syntax(_) | Self::Type { .. } | Self::Arity { .. } | Self::Unresolved(_) => true,
            Self::Field { source, .. } => source.is_decode(),
            Self::NotRegistered(_) | Self::UnknownField { .. } => false,
        }
    }

    /// Dotted path of keys and indices leading to the innermost error.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        while let Self::Field { field, source } = current {
            path.push(field.as_str());
            current = source;
        }
        path
    }
}
