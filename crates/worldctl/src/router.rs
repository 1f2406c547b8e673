//! Axum router construction.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use worldctl_process::ProcessLauncher;

use crate::handlers;
use crate::state::AppState;

/// Build the complete router.
///
/// - `GET /` -- health check
/// - `POST /api/world/start` -- start a world
/// - `POST /api/world/stop` -- stop a world
/// - `GET /api/worlds/list` -- every world's status
/// - `GET /api/world/{name}` -- one world's configuration and status
pub fn build_router<L: ProcessLauncher>(state: AppState<L>) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/api/world/start", post(handlers::start_world::<L>))
        .route("/api/world/stop", post(handlers::stop_world::<L>))
        .route("/api/worlds/list", get(handlers::list_worlds::<L>))
        .route("/api/world/{name}", get(handlers::get_world::<L>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
