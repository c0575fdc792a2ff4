use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Model YOLOv8 tidak ditemukan atau belum dimuat")]
    ModelNotLoaded,
    #[error("{0}")]
    OperationFailed(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
