//! Failures reported by the search page contract.

use thiserror::Error;

/// Why a generated search page test failed.
#[derive(Debug, Error)]
pub enum ContractFailure {
    /// The page driver could not perform an action.
    #[error("page driver failed: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The next page showed rows that were already on the previous page.
    #[error("next page should only have new rows, but repeated {repeated:?}")]
    PageOverlap { repeated: Vec<String> },

    /// Two adjacent cells are out of order.
    #[error("column '{column}' is not sorted: {previous:?} comes before {next:?} at row {row}")]
    NotSorted {
        column: String,
        row: usize,
        previous: String,
        next: String,
    },

    /// A column has no rows to check.
    #[error("column '{column}' has no cells")]
    EmptyColumn { column: String },

    /// A cell does not satisfy the expected predicate.
    #[error("column '{column}' has unexpected value {value:?} at row {row}")]
    UnexpectedCell {
        column: String,
        row: usize,
        value: String,
    },

    /// No cell of a column contains the expected text.
    #[error("column '{column}' has no cell containing {needle:?}")]
    CellNotFound { column: String, needle: String },

    /// No row carries the expected id.
    #[error("no row with id {id:?}")]
    RowNotFound { id: String },
}

impl ContractFailure {
    /// Wraps a driver error.
    pub fn driver<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ContractFailure::Driver(Box::new(err))
    }
}
