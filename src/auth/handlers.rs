use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, SessionResponse, TokenResponse},
        services::{expires_at, verify_password, JwtKeys, Session},
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/session", get(session))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, (StatusCode, String)> {
    let auth = state.config.auth.as_ref().ok_or((
        StatusCode::NOT_FOUND,
        "Password gate is disabled".to_string(),
    ))?;

    let ok = match verify_password(&payload.password, &auth.password_hash) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "verify_password failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };
    if !ok {
        warn!("login invalid password");
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
    }

    let keys = JwtKeys::from_config(auth);
    let (access_token, expires_at) = match keys.sign(&state.config.profile.name) {
        Ok(signed) => signed,
        Err(e) => {
            error!(error = %e, "jwt sign failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    info!(owner = %state.config.profile.name, %expires_at, "dashboard session opened");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_at,
    }))
}

#[instrument(skip_all)]
pub async fn session(
    Session(claims): Session,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    let expires_at =
        expires_at(&claims).map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;
    Ok(Json(SessionResponse {
        authenticated: true,
        expires_at,
    }))
}
