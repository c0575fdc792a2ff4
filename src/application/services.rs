use image::RgbImage;
use std::sync::Arc;
use tracing::debug;

use crate::{
    application::ports::ObjectDetectorPort,
    domain::{
        classes::ClassCatalog,
        detection::{filter_by_confidence, summarize_detections, Detection},
        errors::{DomainError, DomainResult},
        model::{DetectionConfig, ModelInfo},
    },
};

/// Detection use case: runs the detector (if one was loaded) and turns its raw
/// boxes into labelled, threshold-filtered detections.
#[derive(Clone)]
pub struct DetectionService {
    detector: Option<Arc<dyn ObjectDetectorPort>>,
    classes: ClassCatalog,
    config: DetectionConfig,
    model_info: ModelInfo,
    backend_available: bool,
}

impl DetectionService {
    pub fn new(
        detector: Option<Arc<dyn ObjectDetectorPort>>,
        classes: ClassCatalog,
        config: DetectionConfig,
        backend_available: bool,
    ) -> Self {
        let model_info = ModelInfo::new(config.model_name(), classes.clone());
        Self {
            detector,
            classes,
            config,
            model_info,
            backend_available,
        }
    }

    pub fn is_model_loaded(&self) -> bool {
        self.detector.is_some()
    }

    /// Whether an inference backend is compiled into this binary.
    pub fn is_backend_available(&self) -> bool {
        self.backend_available
    }

    pub fn classes(&self) -> &ClassCatalog {
        &self.classes
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn model_info(&self) -> &ModelInfo {
        &self.model_info
    }

    pub async fn detect(&self, image: Arc<RgbImage>, conf_threshold: f32) -> DomainResult<Vec<Detection>> {
        let detector = self.detector.as_ref().ok_or(DomainError::ModelNotLoaded)?;

        let raw = detector.detect(image, conf_threshold).await?;
        let detections: Vec<Detection> = raw
            .iter()
            .map(|r| Detection::from_raw(r, &self.classes))
            .collect();

        // The detector already thresholds; filtering again is a no-op for
        // well-behaved backends.
        let detections = filter_by_confidence(detections, conf_threshold);

        debug!(
            detector = detector.name(),
            count = detections.len(),
            summary = %summarize_detections(&detections),
            "detection finished"
        );
        Ok(detections)
    }
}
