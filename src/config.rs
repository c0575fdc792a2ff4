//! Process configuration, resolved once at startup.
//!
//! Every setting can come from a CLI flag or an environment variable; a `.env`
//! file in the working directory is loaded first when present.

use clap::{parser::ValueSource, CommandFactory, FromArgMatches, Parser};

use crate::domain::model::DetectionConfig;

pub const DEVELOPMENT: &str = "development";

/// Older deployments select the environment through this variable.
const LEGACY_ENV_VAR: &str = "FLASK_ENV";

#[derive(Debug, Clone, Parser)]
#[command(name = "waste-detect-service", version, about = "YOLOv8 waste detection HTTP service")]
pub struct AppConfig {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Path to the YOLOv8 ONNX export.
    #[arg(long, env = "YOLO_MODEL_PATH", default_value = "./models/best.onnx")]
    pub model_path: String,

    /// Default confidence threshold, in [0, 1].
    #[arg(long, env = "CONFIDENCE_THRESHOLD", default_value_t = 0.5, value_parser = parse_unit_interval)]
    pub confidence_threshold: f32,

    #[arg(long, env = "IOU_THRESHOLD", default_value_t = 0.45, value_parser = parse_unit_interval)]
    pub iou_threshold: f32,

    /// Square input resolution the model was exported with.
    #[arg(long, env = "INPUT_SIZE", default_value_t = 640, value_parser = clap::value_parser!(u32).range(1..))]
    pub input_size: u32,

    #[arg(long, env = "MAX_DETECTIONS", default_value_t = 100)]
    pub max_detections: usize,

    /// Largest accepted request body, in bytes.
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_body_bytes: usize,

    /// `development` enables debug logging and error details in responses.
    /// Falls back to `FLASK_ENV` when neither the flag nor `APP_ENV` is set.
    #[arg(long, env = "APP_ENV", default_value = "production")]
    pub environment: String,
}

fn parse_unit_interval(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|e| format!("{}", e))?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(format!("{} is not in [0, 1]", v))
    }
}

impl AppConfig {
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        let matches = Self::command().get_matches();
        let mut cfg = Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
        cfg.apply_legacy_env(
            matches.value_source("environment"),
            std::env::var(LEGACY_ENV_VAR).ok(),
        );
        cfg
    }

    fn apply_legacy_env(&mut self, source: Option<ValueSource>, legacy: Option<String>) {
        if source != Some(ValueSource::DefaultValue) {
            return;
        }
        if let Some(env) = legacy.filter(|v| !v.trim().is_empty()) {
            self.environment = env;
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case(DEVELOPMENT)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn detection(&self) -> DetectionConfig {
        DetectionConfig {
            model_path: self.model_path.clone(),
            confidence_threshold: self.confidence_threshold,
            model_type: "yolov8".to_string(),
            input_size: (self.input_size, self.input_size),
            max_detections: self.max_detections,
            iou_threshold: self.iou_threshold,
        }
    }
}
