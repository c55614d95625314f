use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::{metrics::repo::SystemMetric, state::AppState};

/// Two days of half-hourly samples.
pub const RECENT_SAMPLES: i64 = 48;

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub success: bool,
    pub metrics: Vec<SystemMetric>,
}

#[derive(Debug, Serialize)]
pub struct MetricsError {
    pub success: bool,
    pub error: String,
}

pub fn metrics_routes() -> Router<AppState> {
    Router::new().route("/system-metrics", get(get_system_metrics))
}

#[instrument(skip(state))]
pub async fn get_system_metrics(State(state): State<AppState>) -> Response {
    match state.metrics.recent(RECENT_SAMPLES).await {
        Ok(metrics) => {
            info!(rows = metrics.len(), "system metrics fetched");
            (
                [(header::CACHE_CONTROL, "no-store")],
                Json(MetricsResponse {
                    success: true,
                    metrics,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "system metrics query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MetricsError {
                    success: false,
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
