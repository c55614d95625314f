use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::instrument;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DebugResponse {
    pub success: bool,
    pub message: &'static str,
    pub debug: DebugInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub environment: String,
    pub platform: &'static str,
    pub cwd: String,
    /// Names only, never values.
    pub available_env_vars: Vec<String>,
    pub uptime_seconds: u64,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/debug", get(get_debug))
}

fn visible_env_names(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut names: Vec<String> = names.filter(|name| !name.contains("SECRET")).collect();
    names.sort();
    names
}

#[instrument(skip(state))]
pub async fn get_debug(State(state): State<AppState>) -> Json<DebugResponse> {
    let cwd = std::env::current_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_default();
    let names = std::env::vars_os().map(|(name, _)| name.to_string_lossy().into_owned());

    Json(DebugResponse {
        success: true,
        message: "Debug info",
        debug: DebugInfo {
            timestamp: OffsetDateTime::now_utc(),
            environment: state.config.environment.clone(),
            platform: std::env::consts::OS,
            cwd,
            available_env_vars: visible_env_names(names),
            uptime_seconds: state.started_at.elapsed().as_secs(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_names_are_hidden() {
        let names = ["PATH", "JWT_SECRET", "HOME", "MY_SECRET_KEY"]
            .into_iter()
            .map(String::from);
        assert_eq!(visible_env_names(names), vec!["HOME", "PATH"]);
    }
}
