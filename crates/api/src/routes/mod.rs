pub mod health;
pub mod notificator;
pub mod notify;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(notificator::router())
        .merge(notify::router())
        .with_state(state)
}
