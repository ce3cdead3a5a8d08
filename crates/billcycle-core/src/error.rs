use billcycle_domain::{BookError, YearMonthError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Precondition failed: {0}")]
    Precondition(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Duplicate record: {0}")]
    Duplicate(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<BookError> for CoreError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::NotFound { entity, id } => CoreError::not_found(entity, id),
            BookError::DuplicateOccurrence { .. } | BookError::DuplicateInvoice { .. } => {
                CoreError::Duplicate(err.to_string())
            }
            BookError::NotASeriesHead(_) | BookError::ForeignInstallment { .. } => {
                CoreError::Validation(err.to_string())
            }
        }
    }
}

impl From<YearMonthError> for CoreError {
    fn from(err: YearMonthError) -> Self {
        CoreError::Validation(err.to_string())
    }
}
