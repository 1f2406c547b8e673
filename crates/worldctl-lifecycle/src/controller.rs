//! The lifecycle controller: the single writer of the session registry.
//!
//! # Start
//!
//! ```text
//! validate name ─→ lock(name) ─→ conflict? ─→ validate ports ─→ insert session
//!                                                                    │
//!          ┌─────────────────────────────────────────────────────────┘
//!          ▼
//!   game server ──fail──→ Failed + remove ──→ SpawnFailure
//!          │ ok
//!          ▼
//!   map renderer, map server (only with a map port; failures stay local)
//! ```
//!
//! # Stop
//!
//! Running sub-processes are marked `Stopping`, then stopped in reverse
//! startup order. Every stop is attempted; failures are recorded and the
//! session is removed regardless.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::time;
use worldctl_process::{LaunchSpec, ProcessHandle, ProcessKind, ProcessLauncher};
use worldctl_session::{ProcessStatus, SessionRegistry, WorldConfig, WorldSession, validate_name};

use crate::locks::{NameLocks, ProcessSet};
use crate::{ControllerConfig, LifecycleError, StatusSnapshotter, StopReport, WorldHandle};

/// Serializes start/stop per world name and drives the sub-processes.
///
/// Operations on the same name are totally ordered; operations on
/// different names run concurrently. Share it behind an `Arc`.
///
/// `start` and `stop` run on their own tokio task. Dropping the returned
/// future does not abandon the operation: it still finishes, and the
/// registry ends up exactly as if the caller had waited.
pub struct LifecycleController<L: ProcessLauncher> {
    inner: Arc<Inner<L>>,
}

struct Inner<L: ProcessLauncher> {
    launcher: L,
    config: ControllerConfig,
    registry: Arc<RwLock<SessionRegistry>>,

    /// Per-name exclusive sections, each owning that world's live handles.
    locks: NameLocks<ProcessSet<L::Handle>>,
}

impl<L: ProcessLauncher> LifecycleController<L> {
    pub fn new(launcher: L, config: ControllerConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                launcher,
                config,
                registry: Arc::new(RwLock::new(SessionRegistry::new())),
                locks: NameLocks::new(),
            }),
        }
    }

    /// A read-only view of the registry for observers.
    pub fn snapshotter(&self) -> StatusSnapshotter {
        StatusSnapshotter::new(Arc::clone(&self.inner.registry))
    }

    /// Starts a world.
    ///
    /// Succeeds once the game server is up. Map process failures do not
    /// fail the call; they are recorded in the session and named in
    /// [`WorldHandle::message`].
    ///
    /// # Errors
    /// - [`LifecycleError::InvalidName`] / [`LifecycleError::InvalidPort`]
    ///   before anything is registered
    /// - [`LifecycleError::NameConflict`] if the name is taken; the
    ///   existing world is untouched
    /// - [`LifecycleError::SpawnFailure`] if the game server would not
    ///   start; the world is removed again
    pub async fn start(&self, config: WorldConfig) -> Result<WorldHandle, LifecycleError> {
        let inner = Arc::clone(&self.inner);
        detach(async move { inner.start(config).await }).await
    }

    /// Stops a world and removes it.
    ///
    /// Stop failures never abort the remaining stops; they are collected in
    /// the [`StopReport`].
    ///
    /// # Errors
    /// - [`LifecycleError::InvalidName`]
    /// - [`LifecycleError::NotFound`] if no such world is registered
    pub async fn stop(&self, name: &str) -> Result<StopReport, LifecycleError> {
        let inner = Arc::clone(&self.inner);
        let name = name.to_string();
        detach(async move { inner.stop(&name).await }).await
    }

    /// Stops every registered world, one after another.
    ///
    /// Worlds removed concurrently by someone else are skipped.
    pub async fn stop_all(&self) -> Vec<StopReport> {
        let names = self.inner.registry.read().await.names();
        let mut reports = Vec::with_capacity(names.len());
        for name in names {
            match self.stop(&name).await {
                Ok(report) => reports.push(report),
                Err(LifecycleError::NotFound(_)) => {
                    tracing::debug!(world = %name, "already gone");
                }
                Err(e) => tracing::warn!(world = %name, error = %e, "stop failed"),
            }
        }
        reports
    }

    /// Checks every `Active` sub-process and marks dead ones
    /// `Failed("exited")`.
    ///
    /// Worlds with an operation in flight are skipped until the next probe.
    /// Never removes a session. Returns what was found dead.
    pub async fn probe_liveness(&self) -> Vec<(String, ProcessKind)> {
        self.inner.probe_liveness().await
    }
}

/// Runs one operation on its own task and waits for it.
async fn detach<T, F>(op: F) -> Result<T, LifecycleError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, LifecycleError>> + Send + 'static,
{
    tokio::spawn(op)
        .await
        .map_err(|e| LifecycleError::Internal(format!("lifecycle task failed: {e}")))?
}

impl<L: ProcessLauncher> Inner<L> {
    async fn start(&self, config: WorldConfig) -> Result<WorldHandle, LifecycleError> {
        validate_name(&config.name)?;
        let name = config.name.clone();
        let mut procs = self.locks.lock(&name).await;

        if self.registry.read().await.contains(&name) {
            return Err(LifecycleError::NameConflict(name));
        }
        config.validate_ports()?;

        let spec = config.launch_spec();
        self.registry.write().await.insert(WorldSession::new(config))?;
        tracing::info!(
            world = %name,
            port = spec.port,
            map_port = ?spec.map_port,
            service = spec.service_enabled,
            "starting world"
        );

        match self.spawn(ProcessKind::GameServer, &spec).await {
            Ok(handle) => {
                procs.put(handle);
                self.mark(&name, ProcessKind::GameServer, ProcessStatus::Active).await;
            }
            Err(reason) => {
                {
                    let mut registry = self.registry.write().await;
                    let failed = ProcessStatus::Failed(reason.clone());
                    if let Err(e) = registry.set_status(&name, ProcessKind::GameServer, failed) {
                        tracing::error!(world = %name, error = %e, "status update rejected");
                    }
                    registry.remove(&name)?;
                }
                tracing::warn!(world = %name, %reason, "game server failed to start");
                return Err(LifecycleError::SpawnFailure { world: name, reason });
            }
        }

        if spec.map_port.is_some() {
            for kind in [ProcessKind::MapRenderer, ProcessKind::MapServer] {
                match self.spawn(kind, &spec).await {
                    Ok(handle) => {
                        procs.put(handle);
                        self.mark(&name, kind, ProcessStatus::Active).await;
                    }
                    Err(reason) => {
                        tracing::warn!(world = %name, %kind, %reason, "map process failed to start");
                        self.mark(&name, kind, ProcessStatus::Failed(reason)).await;
                    }
                }
            }
        }

        let session = self
            .registry
            .read()
            .await
            .get(&name)
            .cloned()
            .ok_or_else(|| LifecycleError::Internal(format!("world '{name}' vanished during start")))?;
        tracing::info!(world = %name, "world started");
        Ok(WorldHandle::new(session))
    }

    async fn stop(&self, name: &str) -> Result<StopReport, LifecycleError> {
        validate_name(name)?;
        let mut procs = self.locks.lock(name).await;

        let stopping: Vec<ProcessKind> = {
            let mut registry = self.registry.write().await;
            let session = registry
                .get(name)
                .ok_or_else(|| LifecycleError::NotFound(name.to_string()))?;
            let running: Vec<ProcessKind> = ProcessKind::SHUTDOWN_ORDER
                .into_iter()
                .filter(|kind| session.status(*kind).is_running())
                .collect();
            for kind in &running {
                registry.set_status(name, *kind, ProcessStatus::Stopping)?;
            }
            running
        };
        tracing::info!(world = %name, "stopping world");

        let mut report = StopReport::new(name);
        for kind in ProcessKind::SHUTDOWN_ORDER {
            let outcome = match procs.take(kind) {
                Some(mut handle) => self.halt(&mut handle).await,
                None => Ok(()),
            };
            let marked = stopping.contains(&kind);
            match outcome {
                Ok(()) => {
                    if marked {
                        self.mark(name, kind, ProcessStatus::Stopped).await;
                        report.stopped.push(kind);
                    }
                }
                Err(reason) => {
                    tracing::warn!(world = %name, %kind, %reason, "stop failed");
                    if marked {
                        self.mark(name, kind, ProcessStatus::Failed(reason.clone())).await;
                    }
                    report.failures.push((kind, reason));
                }
            }
        }

        self.registry.write().await.remove(name)?;
        tracing::info!(world = %name, clean = report.is_clean(), "world stopped");
        Ok(report)
    }

    async fn probe_liveness(&self) -> Vec<(String, ProcessKind)> {
        let names = self.registry.read().await.names();
        let mut exited = Vec::new();

        for name in names {
            let Some(mut procs) = self.locks.try_lock(&name) else {
                continue;
            };
            for kind in ProcessKind::STARTUP_ORDER {
                let Some(handle) = procs.get_mut(kind) else {
                    continue;
                };
                let active = self
                    .registry
                    .read()
                    .await
                    .get(&name)
                    .is_some_and(|session| session.status(kind).is_active());
                if !active || handle.is_alive().await {
                    continue;
                }
                tracing::warn!(world = %name, %kind, "process exited unexpectedly");
                self.mark(&name, kind, ProcessStatus::Failed("exited".into())).await;
                exited.push((name.clone(), kind));
            }
        }

        exited
    }

    /// Prepares and starts one sub-process within the spawn timeout.
    async fn spawn(&self, kind: ProcessKind, spec: &LaunchSpec) -> Result<L::Handle, String> {
        let mut handle = self
            .launcher
            .prepare(kind, spec)
            .map_err(|e| e.to_string())?;

        let timeout = self.config.spawn_timeout;
        match time::timeout(timeout, handle.start(timeout)).await {
            Ok(Ok(())) => {
                tracing::debug!(world = %spec.world, %kind, "process up");
                Ok(handle)
            }
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err("timeout".to_string()),
        }
    }

    /// Stops one sub-process within the stop timeout.
    async fn halt(&self, handle: &mut L::Handle) -> Result<(), String> {
        let timeout = self.config.stop_timeout;
        match time::timeout(timeout, handle.stop(timeout)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err("timeout".to_string()),
        }
    }

    /// Writes one status. A rejected write means the locking above is
    /// broken; it is logged rather than allowed to abort the operation.
    async fn mark(&self, name: &str, kind: ProcessKind, status: ProcessStatus) {
        if let Err(e) = self.registry.write().await.set_status(name, kind, status) {
            tracing::error!(world = %name, %kind, error = %e, "status update rejected");
        }
    }
}
