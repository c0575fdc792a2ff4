use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::domain::errors::DomainError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Failures of the HTTP surface. Every variant renders as `{"error": ...}`.
#[derive(Debug)]
pub enum ApiError {
    NoImage,
    InvalidImage,
    BadRequest(String),
    PayloadTooLarge,
    ModelNotLoaded,
    Detection { message: String, details: Option<String> },
}

impl ApiError {
    /// Maps a domain error; `verbose` attaches the debug rendering as `details`.
    pub fn from_domain(err: DomainError, verbose: bool) -> Self {
        match err {
            DomainError::InvalidInput(msg) => ApiError::BadRequest(msg),
            DomainError::ModelNotLoaded => ApiError::ModelNotLoaded,
            other => ApiError::Detection {
                message: other.to_string(),
                details: verbose.then(|| format!("{:?}", other)),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoImage | ApiError::InvalidImage | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ModelNotLoaded | ApiError::Detection { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let (error, details) = match self {
            ApiError::NoImage => ("No image data provided".to_string(), None),
            ApiError::InvalidImage => ("Invalid image data".to_string(), None),
            ApiError::BadRequest(msg) => (msg.clone(), None),
            ApiError::PayloadTooLarge => ("Request body too large".to_string(), None),
            ApiError::ModelNotLoaded => (DomainError::ModelNotLoaded.to_string(), None),
            ApiError::Detection { message, details } => {
                (format!("Detection error: {}", message), details.clone())
            }
        };
        ErrorBody { error, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Detection { message, .. } = &self {
            error!("Detection failed: {}", message);
        }
        (self.status(), Json(self.body())).into_response()
    }
}
