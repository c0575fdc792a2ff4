use async_trait::async_trait;
use image::RgbImage;
use std::sync::{Arc, Mutex};

use crate::adapters::onnx::yolo_engine::OnnxYoloEngine;
use crate::application::ports::ObjectDetectorPort;
use crate::domain::{
    detection::RawDetection,
    errors::{DomainError, DomainResult},
};

/// Exposes an [`OnnxYoloEngine`] through the detector port.
///
/// ONNX Runtime needs exclusive access to run a session, so concurrent
/// requests take turns on the mutex. Inference runs on the blocking pool.
pub struct OnnxYoloDetector {
    engine: Arc<Mutex<OnnxYoloEngine>>,
}

impl OnnxYoloDetector {
    pub fn new(engine: OnnxYoloEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }
}

#[async_trait]
impl ObjectDetectorPort for OnnxYoloDetector {
    fn name(&self) -> &'static str {
        "onnx-yolov8"
    }

    async fn detect(&self, image: Arc<RgbImage>, conf_threshold: f32) -> DomainResult<Vec<RawDetection>> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || {
            let mut engine = engine
                .lock()
                .map_err(|_| DomainError::OperationFailed("YOLO engine lock poisoned".into()))?;
            engine
                .infer(&image, conf_threshold)
                .map_err(|e| DomainError::OperationFailed(format!("{:#}", e)))
        })
        .await
        .map_err(|e| DomainError::OperationFailed(format!("inference task failed: {}", e)))?
    }
}
