//! Read-only views of the registry for polling observers.

use std::sync::Arc;

use tokio::sync::RwLock;
use worldctl_process::ProcessKind;
use worldctl_protocol::{StatusLabel, WorldDetail, WorldListEntry, WorldListResponse};
use worldctl_session::{ProcessStatus, SessionRegistry, WorldSession};

/// Hands out copies of the registry's contents.
///
/// Cheap to clone. Each call takes the registry read lock once, copies what
/// it needs and releases it, so observers never wait on a start or stop
/// that is busy with a process. They may see mid-transition statuses.
#[derive(Clone)]
pub struct StatusSnapshotter {
    registry: Arc<RwLock<SessionRegistry>>,
}

/// One world's statuses at a point in time.
///
/// The map fields are `None` when the world was started without a map
/// port, i.e. those processes were never attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldSnapshot {
    pub name: String,
    pub game_server: ProcessStatus,
    pub map_renderer: Option<ProcessStatus>,
    pub map_server: Option<ProcessStatus>,
}

impl StatusSnapshotter {
    pub(crate) fn new(registry: Arc<RwLock<SessionRegistry>>) -> Self {
        Self { registry }
    }

    /// Every registered world, in creation order.
    pub async fn list_worlds(&self) -> Vec<WorldSnapshot> {
        let registry = self.registry.read().await;
        registry.list_all().map(WorldSnapshot::of).collect()
    }

    /// A copy of one world's session.
    pub async fn world(&self, name: &str) -> Option<WorldSession> {
        self.registry.read().await.get(name).cloned()
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.registry.read().await.contains(name)
    }

    /// The listing in its wire form.
    pub async fn list_response(&self) -> WorldListResponse {
        WorldListResponse {
            worlds: self
                .list_worlds()
                .await
                .iter()
                .map(WorldSnapshot::to_entry)
                .collect(),
        }
    }
}

impl WorldSnapshot {
    fn of(session: &WorldSession) -> Self {
        let attempted = |kind| {
            session
                .attempted(kind)
                .then(|| session.status(kind).clone())
        };
        Self {
            name: session.name().to_string(),
            game_server: session.game_server.clone(),
            map_renderer: attempted(ProcessKind::MapRenderer),
            map_server: attempted(ProcessKind::MapServer),
        }
    }

    pub fn to_entry(&self) -> WorldListEntry {
        WorldListEntry {
            world: self.name.clone(),
            game_server: status_label(&self.game_server),
            map_renderer: self.map_renderer.as_ref().map(status_label),
            map_server: self.map_server.as_ref().map(status_label),
        }
    }
}

/// Collapses a lifecycle status into what observers see.
pub fn status_label(status: &ProcessStatus) -> StatusLabel {
    match status {
        ProcessStatus::Active => StatusLabel::Active,
        ProcessStatus::Failed(_) => StatusLabel::Failed,
        ProcessStatus::Stopped | ProcessStatus::Starting | ProcessStatus::Stopping => {
            StatusLabel::Inactive
        }
    }
}

/// The `GET /api/world/{name}` body for one session.
pub fn world_detail(session: &WorldSession) -> WorldDetail {
    let label = |kind| {
        session
            .attempted(kind)
            .then(|| status_label(session.status(kind)))
    };
    WorldDetail {
        world: session.name().to_string(),
        port: session.config.port,
        map_port: session.config.map_port,
        service_enabled: session.config.service_enabled,
        created_at: session.created_at,
        active: session.is_active(),
        game_server: status_label(&session.game_server),
        map_renderer: label(ProcessKind::MapRenderer),
        map_server: label(ProcessKind::MapServer),
        failures: session
            .failures()
            .into_iter()
            .map(|(kind, reason)| (kind.as_key().to_string(), reason.to_string()))
            .collect(),
    }
}
