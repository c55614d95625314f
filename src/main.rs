mod app;
mod auth;
mod config;
mod diagnostics;
mod fitness;
mod logbook;
mod metrics;
mod model;
mod source;
mod state;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "pulseboard=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init().await?;
    tracing::info!(
        environment = %state.config.environment,
        local = %state.config.data.local_file().display(),
        workspace = %state.config.data.workspace_file().display(),
        gated = state.config.auth.is_some(),
        "dashboard starting"
    );

    app::serve(app::build_app(state)).await
}
