use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Concurrent modification: {entity} with id={id} changed between read and write")]
    ConcurrencyConflict { entity: &'static str, id: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn user_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "User",
            field: "id",
            value: id.to_string(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
