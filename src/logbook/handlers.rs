use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    logbook::dto::{HealthResponse, NutritionResponse, ProgressResponse, TrainingResponse},
    model::{today, LogBook},
    source::{Resolved, SourceChain, SourceError},
    state::AppState,
};

pub fn logbook_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(get_health))
        .route("/nutrition", get(get_nutrition))
        .route("/progress", get(get_progress))
        .route("/training", get(get_training))
}

async fn load_logbook(state: &AppState) -> Result<Resolved<LogBook>, SourceError> {
    let resolved = SourceChain::from_config(&state.config.data)
        .resolve::<LogBook>()
        .await;
    match &resolved {
        Ok(found) => info!(
            source = %found.source,
            days = found.data.daily_logs.len(),
            "logbook loaded"
        ),
        Err(e) => warn!(error = %e, "logbook unavailable, serving fallback"),
    }
    resolved
}

#[instrument(skip(state))]
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let today = today();
    let response = match load_logbook(&state).await {
        Ok(Resolved { data, source }) => HealthResponse {
            source: Some(source),
            ..HealthResponse::build(&data.daily_logs, &state.config, today)
        },
        Err(e) => HealthResponse::fallback(&state.config, today, e.to_string()),
    };
    Json(response)
}

#[instrument(skip(state))]
pub async fn get_nutrition(State(state): State<AppState>) -> Json<NutritionResponse> {
    let today = today();
    let goals = &state.config.goals;
    let response = match load_logbook(&state).await {
        Ok(Resolved { data, source }) => NutritionResponse {
            source: Some(source),
            ..NutritionResponse::build(&data.daily_logs, goals, today)
        },
        Err(e) => NutritionResponse::fallback(goals, today, e.to_string()),
    };
    Json(response)
}

#[instrument(skip(state))]
pub async fn get_progress(State(state): State<AppState>) -> Json<ProgressResponse> {
    let today = today();
    let response = match load_logbook(&state).await {
        Ok(Resolved { data, source }) => ProgressResponse {
            source: Some(source),
            ..ProgressResponse::build(&data.daily_logs, &state.config, today)
        },
        Err(e) => ProgressResponse::fallback(&state.config, today, e.to_string()),
    };
    Json(response)
}

#[instrument(skip(state))]
pub async fn get_training(State(state): State<AppState>) -> Json<TrainingResponse> {
    let today = today();
    let response = match load_logbook(&state).await {
        Ok(Resolved { data, source }) => TrainingResponse {
            source: Some(source),
            ..TrainingResponse::build(&data.daily_logs, today)
        },
        Err(e) => TrainingResponse::fallback(today, e.to_string()),
    };
    Json(response)
}
