//! Request and response bodies.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /api/world/start`.
///
/// Ports are accepted as plain JSON integers (`i64`) so an out-of-range
/// value like `70000` reaches the control plane and is rejected as an
/// invalid port, rather than failing JSON decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartWorldRequest {
    pub world: String,
    pub port: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_port: Option<i64>,
    /// Defaults to `true` when omitted.
    #[serde(default = "default_enable_service")]
    pub enable_service: bool,
}

fn default_enable_service() -> bool {
    true
}

/// Body of `POST /api/world/stop`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopWorldRequest {
    pub world: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Success body for control operations: one short human-readable line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure body. `kind` is the machine-checkable error kind in snake_case
/// (`name_conflict`, `invalid_port`, `not_found`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn running() -> Self {
        Self {
            status: "running".to_string(),
        }
    }
}

/// How a sub-process status is rendered to observers.
///
/// Transitional states (`Starting`, `Stopping`) render as `inactive`; a
/// polling UI only distinguishes up, down and broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLabel {
    Active,
    Inactive,
    Failed,
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One row of `GET /api/worlds/list`.
///
/// `map_renderer` and `map_server` are `null` when the world was started
/// without a map port, i.e. those processes were never attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldListEntry {
    pub world: String,
    pub game_server: StatusLabel,
    pub map_renderer: Option<StatusLabel>,
    pub map_server: Option<StatusLabel>,
}

/// Body of `GET /api/worlds/list`, in world creation order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorldListResponse {
    pub worlds: Vec<WorldListEntry>,
}

/// Body of `GET /api/world/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldDetail {
    pub world: String,
    pub port: u16,
    pub map_port: Option<u16>,
    pub service_enabled: bool,
    pub created_at: DateTime<Utc>,
    /// `true` iff the game server is active.
    pub active: bool,
    pub game_server: StatusLabel,
    pub map_renderer: Option<StatusLabel>,
    pub map_server: Option<StatusLabel>,
    /// Failure reason per failed sub-process, keyed `game_server`,
    /// `map_renderer` or `map_server`.
    pub failures: BTreeMap<String, String>,
}
