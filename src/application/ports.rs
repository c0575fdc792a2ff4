use async_trait::async_trait;
use image::RgbImage;
use std::sync::Arc;

use crate::domain::{detection::RawDetection, errors::DomainResult};

/// A loaded object detector.
///
/// Implementations receive an RGB pixel buffer and return every raw box
/// scoring at least `conf_threshold`, with corners in source-image pixels.
#[async_trait]
pub trait ObjectDetectorPort: Send + Sync {
    fn name(&self) -> &'static str;

    async fn detect(&self, image: Arc<RgbImage>, conf_threshold: f32) -> DomainResult<Vec<RawDetection>>;
}

#[async_trait]
pub trait ModelCatalogPort: Send + Sync {
    async fn validate_model(&self, model_path: &str) -> DomainResult<()>;
}
