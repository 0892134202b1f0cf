use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatementError {
    #[error("Input table has no columns")]
    EmptyTable,

    #[error("No category column found: expected one of {0:?}")]
    MissingCategoryColumn(&'static [&'static str]),

    #[error("Required column '{0}' not found in table")]
    MissingColumn(String),

    #[error("Could not parse amount '{0}' as a number")]
    InvalidAmount(String),

    #[error("Category '{0}' is already present in the table")]
    DuplicateCategory(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StatementError>;
