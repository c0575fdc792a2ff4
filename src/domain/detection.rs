use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::classes::ClassCatalog;

/// Detector output before labelling: corners in source-image pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDetection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub score: f32,
    pub class_id: usize,
}

/// `[x, y, width, height]` in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1 as i32,
            y: y1 as i32,
            width: (x2 - x1).max(0.0) as i32,
            height: (y2 - y1).max(0.0) as i32,
        }
    }
}

impl From<[i32; 4]> for BoundingBox {
    fn from([x, y, width, height]: [i32; 4]) -> Self {
        Self { x, y, width, height }
    }
}

impl From<BoundingBox> for [i32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "class")]
    pub label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn from_raw(raw: &RawDetection, classes: &ClassCatalog) -> Self {
        Self {
            label: classes.label(raw.class_id as u32),
            confidence: raw.score.clamp(0.0, 1.0),
            bbox: BoundingBox::from_corners(raw.x1, raw.y1, raw.x2, raw.y2),
        }
    }
}

/// Keeps detections scoring at or above `threshold`, preserving order.
pub fn filter_by_confidence(detections: Vec<Detection>, threshold: f32) -> Vec<Detection> {
    detections
        .into_iter()
        .filter(|d| d.confidence >= threshold)
        .collect()
}

pub fn summarize_detections(detections: &[Detection]) -> String {
    let mut counts = BTreeMap::new();
    for det in detections {
        *counts.entry(det.label.as_str()).or_insert(0) += 1;
    }
    counts
        .iter()
        .map(|(label, count)| format!("{} {}", count, label))
        .collect::<Vec<_>>()
        .join(", ")
}
