use std::sync::Arc;

use crate::adapters::http::error::ApiError;
use crate::application::services::DetectionService;
use crate::domain::errors::DomainError;

/// Shared state for the axum handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Detection use case, holding the detector loaded at startup (if any).
    pub detection: Arc<DetectionService>,
    /// Include error details in 500 responses.
    pub verbose_errors: bool,
}

impl HttpState {
    pub fn new(detection: Arc<DetectionService>, verbose_errors: bool) -> Self {
        Self { detection, verbose_errors }
    }

    pub fn api_error(&self, err: DomainError) -> ApiError {
        ApiError::from_domain(err, self.verbose_errors)
    }
}
