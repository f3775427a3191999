use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{composite, handlers, items, uploads, watcher, middleware::metrics_middleware};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        // Batch workflow
        .route("/composite", post(composite::run_workflow))
        // Name-guarded uploads
        .route("/uploads", post(uploads::guarded_upload))
        // Watcher
        .route("/watcher/status", get(watcher::get_status))
        // Item flags
        .route("/items/{id}/like", post(items::toggle_like))
        .route("/items/{id}/flags", get(items::get_flags))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
