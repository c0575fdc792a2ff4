use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use waste_detect_service::adapters::{
    http::{router, state::HttpState},
    onnx::model_catalog::OnnxModelCatalog,
};
use waste_detect_service::application::{ports::{ModelCatalogPort, ObjectDetectorPort}, services::DetectionService};
use waste_detect_service::config::AppConfig;
use waste_detect_service::domain::{classes::ClassCatalog, model::DetectionConfig};
use waste_detect_service::YOLO_AVAILABLE;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();

    // RUST_LOG manda; si no está definido, info (debug en desarrollo)
    let default_level = if config.is_development() { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let detection_config = config.detection();
    let detector = load_detector(&detection_config).await;

    let service = DetectionService::new(detector, ClassCatalog::waste(), detection_config, YOLO_AVAILABLE);
    info!("YOLO available: {}", service.is_backend_available());
    info!("Model loaded: {}", service.is_model_loaded());

    let state = HttpState::new(Arc::new(service), config.is_development());
    let app = router(state, config.max_body_bytes);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Waste detection service listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Loads the detector, or returns `None` and leaves the service degraded.
async fn load_detector(cfg: &DetectionConfig) -> Option<Arc<dyn ObjectDetectorPort>> {
    if let Err(e) = OnnxModelCatalog::new().validate_model(&cfg.model_path).await {
        warn!("{}; detection disabled", e);
        return None;
    }
    load_engine(cfg).await
}

#[cfg(feature = "onnx")]
async fn load_engine(cfg: &DetectionConfig) -> Option<Arc<dyn ObjectDetectorPort>> {
    use waste_detect_service::adapters::onnx::{detector::OnnxYoloDetector, yolo_engine::OnnxYoloEngine};

    let path = cfg.model_path.clone();
    let params = cfg.yolo_params();
    match tokio::task::spawn_blocking(move || OnnxYoloEngine::load(&path, params)).await {
        Ok(Ok(engine)) => {
            info!("Model loaded: {}", cfg.model_path);
            Some(Arc::new(OnnxYoloDetector::new(engine)))
        }
        Ok(Err(e)) => {
            error!("Error loading model: {:#}", e);
            None
        }
        Err(e) => {
            error!("Model loader task failed: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "onnx"))]
async fn load_engine(_cfg: &DetectionConfig) -> Option<Arc<dyn ObjectDetectorPort>> {
    warn!("Built without the `onnx` feature; detection disabled");
    None
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
