pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{any, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
pub use crate::handlers::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(handlers::health::liveness))
        .route("/api/predict", post(handlers::text::predict))
        .route("/api/summarize", post(handlers::text::summarize))
        .route("/api/explain-figure", post(handlers::text::explain_figure))
        .route("/api/init-user", post(handlers::user::init_user))
        .route("/api/align", post(handlers::tools::align))
        .route("/api/tree", post(handlers::tools::construct_tree))
        .route("/api/mafft", post(handlers::tools::mafft))
        .route("/api/blast", post(handlers::tools::blast))
        .route("/api/predict-structure", post(handlers::tools::predict_structure))
        .route("/api/genbank/:id", get(handlers::genbank::fetch_record))
        .route("/api/proxy", any(handlers::proxy::forward))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Only the configured front-end origins receive CORS headers; preflight
/// requests are answered by the layer without reaching any handler.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
