use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &str) -> Self {
        DomainError::NotFound(format!("{} not found", entity))
    }
}
