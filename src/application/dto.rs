use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    classes::ClassCatalog,
    detection::Detection,
    errors::{DomainError, DomainResult},
    model::{DetectionConfig, ModelInfo},
};

pub const DEFAULT_MODEL_TYPE: &str = "yolov8";

/// Body of `POST /detect`.
///
/// Fields are pulled out of a loose JSON value so that a wrongly-typed `image`
/// is reported as bad image data instead of a body parse failure. The
/// threshold is kept raw and only validated once the image has been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectRequest {
    /// `None` when the key is absent; `Some(Value)` of any JSON type otherwise.
    pub image: Option<Value>,
    confidence_threshold: Option<Value>,
    pub model_type: String,
}

impl DetectRequest {
    pub fn from_value(body: &Value) -> DomainResult<Self> {
        let obj = body
            .as_object()
            .ok_or_else(|| DomainError::InvalidInput("request body must be a JSON object".into()))?;

        let model_type = obj
            .get("model_type")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_MODEL_TYPE)
            .to_string();

        Ok(Self {
            image: obj.get("image").cloned(),
            confidence_threshold: obj.get("confidence_threshold").cloned(),
            model_type,
        })
    }

    /// Effective threshold, clamped into [0, 1]. `default` applies when the
    /// field is absent or null.
    pub fn confidence_threshold(&self, default: f64) -> DomainResult<f64> {
        match &self.confidence_threshold {
            None | Some(Value::Null) => Ok(default.clamp(0.0, 1.0)),
            Some(v) => v
                .as_f64()
                .filter(|t| t.is_finite())
                .map(|t| t.clamp(0.0, 1.0))
                .ok_or_else(|| DomainError::InvalidInput("Invalid confidence_threshold".into())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    pub success: bool,
    pub detections: Vec<Detection>,
    pub message: String,
    pub processing_time: f64,
    pub model_info: String,
    pub confidence_threshold: f64,
}

impl DetectResponse {
    pub fn new(detections: Vec<Detection>, processing_time: f64, model_type: &str, confidence_threshold: f64) -> Self {
        Self {
            success: true,
            message: format!("Deteksi berhasil dengan {} objek ditemukan", detections.len()),
            detections,
            processing_time: (processing_time * 1000.0).round() / 1000.0,
            model_info: format!("YOLOv8 - {}", model_type),
            confidence_threshold,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub yolo_available: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfoResponse {
    pub model_loaded: bool,
    pub yolo_available: bool,
    pub waste_classes: ClassCatalog,
    pub model_config: DetectionConfig,
    pub model_info: ModelInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_has_no_image_and_defaults() {
        let req = DetectRequest::from_value(&json!({})).unwrap();
        assert_eq!(req.image, None);
        assert_eq!(req.confidence_threshold(0.5).unwrap(), 0.5);
        assert_eq!(req.model_type, "yolov8");
    }

    #[test]
    fn missing_threshold_falls_back_to_given_default() {
        let req = DetectRequest::from_value(&json!({ "confidence_threshold": null })).unwrap();
        assert_eq!(req.confidence_threshold(0.75).unwrap(), 0.75);
    }

    #[test]
    fn explicit_fields_are_kept() {
        let req = DetectRequest::from_value(&json!({
            "image": "abc",
            "confidence_threshold": 0.25,
            "model_type": "custom"
        }))
        .unwrap();
        assert_eq!(req.image, Some(json!("abc")));
        assert_eq!(req.confidence_threshold(0.9).unwrap(), 0.25);
        assert_eq!(req.model_type, "custom");
    }

    #[test]
    fn threshold_is_clamped_into_unit_range() {
        let hi = DetectRequest::from_value(&json!({ "confidence_threshold": 3 })).unwrap();
        let lo = DetectRequest::from_value(&json!({ "confidence_threshold": -1.5 })).unwrap();
        assert_eq!(hi.confidence_threshold(0.5).unwrap(), 1.0);
        assert_eq!(lo.confidence_threshold(0.5).unwrap(), 0.0);
    }

    #[test]
    fn non_numeric_threshold_is_rejected_lazily() {
        let req = DetectRequest::from_value(&json!({ "confidence_threshold": "high" })).unwrap();
        let err = req.confidence_threshold(0.5).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert!(DetectRequest::from_value(&json!(null)).is_err());
        assert!(DetectRequest::from_value(&json!([1, 2])).is_err());
    }

    #[test]
    fn response_rounds_processing_time_and_formats_message() {
        let resp = DetectResponse::new(vec![], 0.123456, "yolov8", 0.5);
        assert_eq!(resp.processing_time, 0.123);
        assert_eq!(resp.message, "Deteksi berhasil dengan 0 objek ditemukan");
        assert_eq!(resp.model_info, "YOLOv8 - yolov8");
        assert!(resp.success);
    }
}
