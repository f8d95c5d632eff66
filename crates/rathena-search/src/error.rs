//! Error types for the search crate.

use thiserror::Error;

/// Errors raised while building filter clauses.
#[derive(Debug, Error)]
pub enum SeekerError {
    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// Operator is not valid for the given value type.
    #[error("operator '{op}' is not valid for {value_type} values")]
    InvalidOperatorForType {
        op: &'static str,
        value_type: &'static str,
    },

    /// Type mismatch between the operator and the clause value.
    #[error("type mismatch: clause expects {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Result type for clause construction.
pub type Result<T> = std::result::Result<T, SeekerError>;

/// A search request or response rejected at the boundary.
///
/// Raised by [`SearchDefinition`](crate::SearchDefinition) before a query
/// reaches the controller, or when a result does not serialize to the
/// declared result shape.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Body is not valid JSON.
    #[error("request body is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    /// Body is valid JSON but not an object.
    #[error("search query must be a JSON object")]
    NotAnObject,

    /// Query does not match the query shape (unknown key, wrong filter shape,
    /// non-integer offset or limit, ...).
    #[error("invalid search query: {0}")]
    Query(#[source] serde_json::Error),

    /// A sort entry names a path the entity does not have.
    #[error("unknown sort field '{field}' for {entity}")]
    UnknownSortField { entity: String, field: String },

    /// The filter refers to something the entity does not have.
    #[error("invalid filter for {entity}: {reason}")]
    Filter { entity: String, reason: String },

    /// A result could not be serialized.
    #[error("search result could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A result does not match the result shape.
    #[error("search result does not match the result shape: {0}")]
    Result(#[source] serde_json::Error),
}
