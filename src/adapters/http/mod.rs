pub mod error;
pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::adapters::http::state::HttpState;

pub fn router(state: HttpState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/detect", post(routes::detect))
        .route("/health", get(routes::health))
        .route("/model-info", get(routes::model_info))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
