// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    current_snapshot, get_machine, health_check, list_channels, list_machines, predict,
    start_monitoring, stop_monitoring, stream_snapshots,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/machines", get(list_machines))
        .route("/machines/:id", get(get_machine))
        .route("/machines/:id/monitor", post(start_monitoring))
        .route("/channels", get(list_channels))
        .route("/monitor", get(current_snapshot).delete(stop_monitoring))
        .route("/monitor/stream", get(stream_snapshots))
        .route("/predict", post(predict))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
