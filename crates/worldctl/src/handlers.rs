//! HTTP endpoint handlers.
//!
//! | Method | Path | Success | Errors |
//! |--------|------|---------|--------|
//! | `GET` | `/` | 200 `{status}` | |
//! | `POST` | `/api/world/start` | 201 `{message}` | 400, 409, 500 |
//! | `POST` | `/api/world/stop` | 200 `{message}` | 400, 404 |
//! | `GET` | `/api/worlds/list` | 200 `{worlds}` | |
//! | `GET` | `/api/world/{name}` | 200 world detail | 400, 404 |
//!
//! Control handlers forward to the [`LifecycleController`]; read handlers
//! only touch the [`StatusSnapshotter`] and never wait on a start or stop.
//!
//! [`LifecycleController`]: worldctl_lifecycle::LifecycleController
//! [`StatusSnapshotter`]: worldctl_lifecycle::StatusSnapshotter

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use worldctl_lifecycle::{LifecycleError, world_detail};
use worldctl_process::ProcessLauncher;
use worldctl_protocol::{
    HealthResponse, MessageResponse, StartWorldRequest, StopWorldRequest, WorldDetail,
    WorldListResponse,
};
use worldctl_session::{WorldConfig, validate_name};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::running())
}

pub async fn start_world<L: ProcessLauncher>(
    State(state): State<AppState<L>>,
    payload: Result<Json<StartWorldRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(req) = payload?;
    let config = admit(&state, req).await?;
    let handle = state.controller.start(config).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new(handle.message()))))
}

/// Turns a start request into a [`WorldConfig`].
///
/// Ports outside `u16` are only representable here, so they are caught
/// before the controller runs. Rejections keep the controller's order: a
/// bad name, then a taken name, then a bad port.
async fn admit<L: ProcessLauncher>(
    state: &AppState<L>,
    req: StartWorldRequest,
) -> Result<WorldConfig, ApiError> {
    let StartWorldRequest {
        world,
        port,
        map_port,
        enable_service,
    } = req;
    match WorldConfig::from_raw(world.clone(), port, map_port, enable_service) {
        Ok(config) => Ok(config),
        Err(err) => {
            validate_name(&world)?;
            if state.snapshotter.contains(&world).await {
                return Err(LifecycleError::NameConflict(world).into());
            }
            Err(err.into())
        }
    }
}

pub async fn stop_world<L: ProcessLauncher>(
    State(state): State<AppState<L>>,
    payload: Result<Json<StopWorldRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload?;
    let report = state.controller.stop(&req.world).await?;
    Ok(Json(MessageResponse::new(report.message())))
}

pub async fn list_worlds<L: ProcessLauncher>(
    State(state): State<AppState<L>>,
) -> Json<WorldListResponse> {
    Json(state.snapshotter.list_response().await)
}

pub async fn get_world<L: ProcessLauncher>(
    State(state): State<AppState<L>>,
    Path(name): Path<String>,
) -> Result<Json<WorldDetail>, ApiError> {
    validate_name(&name)?;
    match state.snapshotter.world(&name).await {
        Some(session) => Ok(Json(world_detail(&session))),
        None => Err(LifecycleError::NotFound(name).into()),
    }
}
