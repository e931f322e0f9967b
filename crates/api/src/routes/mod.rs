pub mod health;
pub mod hooks;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(hooks::router())
        .merge(settings::router())
        .with_state(state)
}
