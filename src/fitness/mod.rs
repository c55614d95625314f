use crate::state::AppState;
use axum::Router;

pub mod defaults;
mod dto;
pub mod handlers;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::fitness_routes())
}
