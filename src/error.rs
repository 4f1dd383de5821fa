//! Error types for the review store.
//!
//! Validation failures are safe to show to API callers. Store failures carry the attempted
//! statement for the logs only; the HTTP layer replaces them with a generic message.

use thiserror::Error;

/// Bad input shape, type or allow-list violation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown table '{0}'")]
    UnknownTable(String),

    #[error("column '{column}' is not allowed on table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("column '{column}' on table '{table}' cannot be updated")]
    ReadOnlyColumn { table: String, column: String },

    #[error("condition on '{0}' has no predicate (expected one of equals, contains, range)")]
    MissingPredicate(String),

    #[error("condition on '{0}' sets more than one of equals, contains, range")]
    AmbiguousPredicate(String),

    #[error("range on '{column}' needs exactly two bounds, got {got}")]
    RangeArity { column: String, got: usize },

    #[error("invalid value for '{column}': {reason}")]
    InvalidValue { column: String, reason: String },

    #[error("limit must be a positive integer")]
    InvalidLimit,

    #[error("at least one column to update is required")]
    EmptyUpdate,

    #[error("invalid review field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("country '{0}' could not be resolved")]
    UnknownCountry(String),

    #[error("review #{index}: {source}")]
    InBatch {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    pub fn invalid_value(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            column: column.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Driver or transport failure while executing a statement.
#[derive(Debug, Error)]
#[error("failed to execute `{statement}`: {source}")]
pub struct StoreError {
    pub statement: String,
    #[source]
    pub source: sqlx::Error,
}

impl StoreError {
    pub fn new(statement: impl Into<String>, source: sqlx::Error) -> Self {
        Self {
            statement: statement.into(),
            source,
        }
    }
}

/// Fatal errors of the cleaning pipeline. Any of these aborts the load job.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing columns in input data: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("cannot convert column '{column}' (row {row}, value {value:?}) to integer: {source}")]
    InvalidColumnDtype {
        column: String,
        row: usize,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("failed to read CSV input: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors surfaced by [`crate::ReviewService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors of the CSV load job.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}
