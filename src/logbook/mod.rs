use crate::state::AppState;
use axum::Router;

mod dto;
pub mod equipment;
pub mod handlers;
mod reports;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::logbook_routes())
}
