use serde::{Deserialize, Serialize};

use super::classes::ClassCatalog;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoloParams {
    pub input_size: u32,        // 640 typical
    pub iou_threshold: f32,     // 0..1
    pub max_detections: usize,  // e.g. 300
}

/// Used when a request does not name its own threshold.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

impl Default for YoloParams {
    fn default() -> Self {
        Self {
            input_size: 640,
            iou_threshold: 0.45,
            max_detections: 100,
        }
    }
}

/// Detector settings resolved once at startup.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionConfig {
    pub model_path: String,
    pub confidence_threshold: f32,
    pub model_type: String,
    pub input_size: (u32, u32),
    pub max_detections: usize,
    pub iou_threshold: f32,
}

impl DetectionConfig {
    pub fn yolo_params(&self) -> YoloParams {
        YoloParams {
            input_size: self.input_size.0,
            iou_threshold: self.iou_threshold,
            max_detections: self.max_detections,
        }
    }

    /// File name of the artifact, used as the model's display name.
    pub fn model_name(&self) -> String {
        std::path::Path::new(&self.model_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.model_path.clone())
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        let params = YoloParams::default();
        Self {
            model_path: "./models/best.onnx".to_string(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            model_type: "yolov8".to_string(),
            input_size: (params.input_size, params.input_size),
            max_detections: params.max_detections,
            iou_threshold: params.iou_threshold,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub classes: ClassCatalog,
    pub total_classes: usize,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, classes: ClassCatalog) -> Self {
        Self {
            name: name.into(),
            version: "1.0".to_string(),
            description: "Model deteksi sampah anorganik".to_string(),
            total_classes: classes.len(),
            classes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_bundled_model() {
        let cfg = DetectionConfig::default();
        assert_eq!(cfg.model_type, "yolov8");
        assert_eq!(cfg.input_size, (640, 640));
        assert_eq!(cfg.max_detections, 100);
        assert!((0.0..=1.0).contains(&cfg.confidence_threshold));
        assert_eq!(cfg.model_name(), "best.onnx");
    }

    #[test]
    fn model_info_counts_classes() {
        let info = ModelInfo::new("best.onnx", ClassCatalog::waste());
        assert_eq!(info.total_classes, 6);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["classes"]["2"], "Kaleng");
        assert_eq!(json["description"], "Model deteksi sampah anorganik");
    }

    #[test]
    fn input_size_serializes_as_pair() {
        let json = serde_json::to_value(DetectionConfig::default()).unwrap();
        assert_eq!(json["input_size"], serde_json::json!([640, 640]));
    }
}
