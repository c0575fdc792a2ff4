//! HTTP bridge between a YOLOv8 waste detector exported to ONNX and a web
//! frontend.
//!
//! Layout follows ports and adapters: `domain` holds plain data and rules,
//! `application` the detection use case and the traits it depends on, and
//! `adapters` the axum surface, the image decoder and the ONNX Runtime engine.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

/// Whether the ONNX Runtime backend was compiled in.
pub const YOLO_AVAILABLE: bool = cfg!(feature = "onnx");
