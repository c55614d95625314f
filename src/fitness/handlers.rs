use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    fitness::{
        defaults::embedded_store,
        dto::{DayQuery, FitnessData, FitnessError, FitnessResponse},
        services::build_snapshot,
    },
    model::{iso_date, today},
    source::SourceChain,
    state::AppState,
};

pub fn fitness_routes() -> Router<AppState> {
    Router::new().route("/fitness", get(get_fitness))
}

#[instrument(skip(state))]
pub async fn get_fitness(
    State(state): State<AppState>,
    query: Result<Query<DayQuery>, QueryRejection>,
) -> Result<Json<FitnessResponse>, (StatusCode, Json<FitnessError>)> {
    let Query(query) = query.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected fitness query");
        (
            StatusCode::BAD_REQUEST,
            Json(FitnessError {
                success: false,
                error: rejection.body_text(),
            }),
        )
    })?;
    let config = &state.config;
    let resolved = SourceChain::from_config(&config.data)
        .resolve_or_embedded(embedded_store)
        .await;

    let date = query.date.unwrap_or_else(today);
    let snapshot = build_snapshot(&resolved.data, date, &config.defaults, &config.goals);
    info!(
        date = %iso_date::format(date),
        source = %resolved.source,
        calories = snapshot.totals.calories,
        defaulted = snapshot.defaulted.len(),
        "fitness snapshot ready"
    );

    Ok(Json(FitnessResponse {
        success: true,
        source: resolved.source,
        data: FitnessData::from_snapshot(snapshot, &config.profile),
    }))
}
