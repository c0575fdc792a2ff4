use anyhow::{bail, Context, Result};
use image::{imageops::FilterType, RgbImage};
use ndarray::{s, Array4, ArrayView2, Axis, Ix2};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::domain::detection::RawDetection;
use crate::domain::model::YoloParams;

/// Boxes considered by NMS are capped to keep it from going quadratic on
/// degenerate outputs.
const MAX_NMS_INPUTS: usize = 4096;

/// YOLOv8 detector running on ONNX Runtime.
///
/// Expects the standard ultralytics export: input `[1, 3, S, S]` RGB in
/// `[0, 1]`, output `[1, 4 + classes, candidates]` holding `cx, cy, w, h`
/// followed by per-class scores.
pub struct OnnxYoloEngine {
    session: Session,
    params: YoloParams,
}

impl OnnxYoloEngine {
    pub fn load(path: impl AsRef<Path>, params: YoloParams) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("model file not found: {}", path.display());
        }

        // CUDA es opcional: si está disponible se usa, si no continuamos en CPU.
        let cuda = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CUDAExecutionProvider::default().build()])
            .context("Failed to set CUDA execution provider")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(path);

        let session = match cuda {
            Ok(s) => s,
            Err(e) => {
                warn!("CUDA execution provider unavailable ({}), using CPU", e);
                Session::builder()
                    .context("Failed to create session builder")?
                    .with_execution_providers([CPUExecutionProvider::default().build()])
                    .context("Failed to set CPU execution provider")?
                    .with_intra_threads(4)
                    .context("Failed to set intra threads")?
                    .commit_from_file(path)
                    .with_context(|| format!("Failed to load YOLO model from {}", path.display()))?
            }
        };

        if let Some(input) = session.inputs.first() {
            debug!("YOLO input {}: {:?}", input.name, input.input_type);
        }
        info!(
            "YOLO model loaded from {} (imgsz {})",
            path.display(),
            params.input_size
        );

        Ok(Self { session, params })
    }

    pub fn infer(&mut self, rgb: &RgbImage, conf_threshold: f32) -> Result<Vec<RawDetection>> {
        let imgsz = self.params.input_size as usize;
        let resized = image::imageops::resize(rgb, imgsz as u32, imgsz as u32, FilterType::Triangle);

        let mut input = Array4::<f32>::zeros((1, 3, imgsz, imgsz));
        for (x, y, pixel) in resized.enumerate_pixels() {
            input[[0, 0, y as usize, x as usize]] = pixel[0] as f32 / 255.0;
            input[[0, 1, y as usize, x as usize]] = pixel[1] as f32 / 255.0;
            input[[0, 2, y as usize, x as usize]] = pixel[2] as f32 / 255.0;
        }

        let input_value = Value::from_array(input).context("Failed to create input tensor")?;
        let outputs = self
            .session
            .run(ort::inputs![input_value])
            .context("YOLO inference failed")?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;
        if output.ndim() != 3 {
            bail!("unexpected YOLO output shape {:?}", output.shape());
        }
        let predictions = output
            .index_axis(Axis(0), 0)
            .into_dimensionality::<Ix2>()
            .context("Failed to reshape YOLO output")?;

        let scale = (
            rgb.width() as f32 / imgsz as f32,
            rgb.height() as f32 / imgsz as f32,
        );
        let bounds = (rgb.width() as f32, rgb.height() as f32);

        Ok(decode_predictions(
            predictions,
            scale,
            bounds,
            conf_threshold,
            self.params.iou_threshold,
            self.params.max_detections,
        ))
    }
}

/// Turns a `[4 + classes, candidates]` prediction matrix into boxes in source
/// pixels, best first.
pub(crate) fn decode_predictions(
    view: ArrayView2<f32>,
    scale: (f32, f32),
    bounds: (f32, f32),
    conf_threshold: f32,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<RawDetection> {
    if view.shape()[0] <= 4 {
        return Vec::new();
    }
    let (sx, sy) = scale;
    let (max_x, max_y) = bounds;
    let num_candidates = view.shape()[1];

    let mut detections = Vec::new();
    for i in 0..num_candidates {
        let scores = view.slice(s![4.., i]);
        let Some((class_id, &score)) = scores
            .indexed_iter()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
        else {
            continue;
        };

        if score < conf_threshold {
            continue;
        }

        let cx = view[[0, i]];
        let cy = view[[1, i]];
        let w = view[[2, i]];
        let h = view[[3, i]];

        detections.push(RawDetection {
            x1: ((cx - w / 2.0) * sx).clamp(0.0, max_x),
            y1: ((cy - h / 2.0) * sy).clamp(0.0, max_y),
            x2: ((cx + w / 2.0) * sx).clamp(0.0, max_x),
            y2: ((cy + h / 2.0) * sy).clamp(0.0, max_y),
            score,
            class_id,
        });
    }

    detections.sort_unstable_by(|a, b| b.score.total_cmp(&a.score));
    let mut kept = non_max_suppression(detections, iou_threshold);
    kept.truncate(max_detections);
    kept
}

fn area(d: &RawDetection) -> f32 {
    (d.x2 - d.x1).max(0.0) * (d.y2 - d.y1).max(0.0)
}

fn iou(a: &RawDetection, b: &RawDetection) -> f32 {
    let inter_w = (a.x2.min(b.x2) - a.x1.max(b.x1)).max(0.0);
    let inter_h = (a.y2.min(b.y2) - a.y1.max(b.y1)).max(0.0);
    let inter = inter_w * inter_h;
    let union = area(a) + area(b) - inter;
    if union > f32::EPSILON {
        inter / union
    } else {
        0.0
    }
}

/// Class-aware greedy NMS. `detections` must be sorted by descending score.
fn non_max_suppression(mut detections: Vec<RawDetection>, iou_threshold: f32) -> Vec<RawDetection> {
    if detections.len() > MAX_NMS_INPUTS {
        warn!(
            original = detections.len(),
            limit = MAX_NMS_INPUTS,
            "NMS input truncated"
        );
        detections.truncate(MAX_NMS_INPUTS);
    }

    let mut suppressed = vec![false; detections.len()];
    let mut keep = Vec::new();
    for i in 0..detections.len() {
        if suppressed[i] {
            continue;
        }
        for j in (i + 1)..detections.len() {
            if !suppressed[j]
                && detections[i].class_id == detections[j].class_id
                && iou(&detections[i], &detections[j]) > iou_threshold
            {
                suppressed[j] = true;
            }
        }
        keep.push(i);
    }

    keep.into_iter().map(|i| detections[i].clone()).collect()
}
