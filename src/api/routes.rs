use std::path::PathBuf;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState, ui_dir: Option<PathBuf>) -> Router {
    // The UI is a separate static frontend; origins are left open like the
    // original deployment.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/recommend", post(handlers::recommend))
        .route("/feedback", post(handlers::submit_feedback))
        .route("/programs", get(handlers::get_programs));

    if let Some(dir) = ui_dir {
        router = router.nest_service("/ui", ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}
