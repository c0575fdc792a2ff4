use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::adapters::http::{error::ApiError, state::HttpState};
use crate::adapters::imaging::decoder::decode_image_payload;
use crate::application::dto::{DetectRequest, DetectResponse, HealthResponse, ModelInfoResponse};
use crate::domain::errors::DomainError;

/// `POST /detect`
pub async fn detect(
    State(st): State<HttpState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<DetectResponse>, ApiError> {
    let body = body.map_err(|rejection| {
        warn!("Rejected /detect body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    })?;

    // Anything that is not a JSON object counts as a missing image.
    let value: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let req = DetectRequest::from_value(&value).map_err(|_| ApiError::NoImage)?;
    let payload = match &req.image {
        None => return Err(ApiError::NoImage),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(ApiError::InvalidImage),
    };

    let image = tokio::task::spawn_blocking(move || decode_image_payload(&payload))
        .await
        .map_err(|e| st.api_error(DomainError::OperationFailed(e.to_string())))?
        .ok_or(ApiError::InvalidImage)?;
    debug!("Decoded image {}x{}", image.width(), image.height());

    let default_threshold = f64::from(st.detection.config().confidence_threshold);
    let threshold = req
        .confidence_threshold(default_threshold)
        .map_err(|e| st.api_error(e))?;

    let started = Instant::now();
    let detections = st
        .detection
        .detect(Arc::new(image), threshold as f32)
        .await
        .map_err(|e| st.api_error(e))?;
    let elapsed = started.elapsed().as_secs_f64();

    info!(
        "Deteksi berhasil: {} objek dalam {:.3}s (threshold {})",
        detections.len(),
        elapsed,
        threshold
    );

    Ok(Json(DetectResponse::new(detections, elapsed, &req.model_type, threshold)))
}

/// `GET /health`
pub async fn health(State(st): State<HttpState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: st.detection.is_model_loaded(),
        yolo_available: st.detection.is_backend_available(),
    })
}

/// `GET /model-info`
pub async fn model_info(State(st): State<HttpState>) -> Json<ModelInfoResponse> {
    let svc = &st.detection;
    Json(ModelInfoResponse {
        model_loaded: svc.is_model_loaded(),
        yolo_available: svc.is_backend_available(),
        waste_classes: svc.classes().clone(),
        model_config: svc.config().clone(),
        model_info: svc.model_info().clone(),
    })
}
