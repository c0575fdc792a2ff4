use async_trait::async_trait;
use std::path::Path;

use crate::application::ports::ModelCatalogPort;
use crate::domain::errors::{DomainError, DomainResult};

/// Checks model artifacts on the local filesystem.
#[derive(Debug, Default)]
pub struct OnnxModelCatalog;

impl OnnxModelCatalog {
    pub fn new() -> Self { Self }
}

#[async_trait]
impl ModelCatalogPort for OnnxModelCatalog {
    async fn validate_model(&self, model_path: &str) -> DomainResult<()> {
        if model_path.trim().is_empty() {
            return Err(DomainError::InvalidInput("model path empty".into()));
        }
        let path = Path::new(model_path);
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(DomainError::NotFound(format!("Model tidak ditemukan: {}", model_path)));
        }
        if !path.is_file() {
            return Err(DomainError::InvalidInput(format!("model path is not a file: {}", model_path)));
        }
        Ok(())
    }
}
