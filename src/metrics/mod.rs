use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod repo;

pub use repo::MetricsSource;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::metrics_routes())
}
