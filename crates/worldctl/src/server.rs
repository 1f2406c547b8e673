//! `WorldctlServer` builder and server loop.
//!
//! This is the entry point for running the control plane. It ties the
//! layers together: HTTP → lifecycle → session / process.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::MissedTickBehavior;
use worldctl_lifecycle::{ControllerConfig, LifecycleController};
use worldctl_process::ProcessLauncher;

use crate::router::build_router;
use crate::state::AppState;

/// Where to listen, and how often to probe process liveness.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on. `0` picks a free port.
    pub port: u16,
    /// Period of the liveness probe. `Duration::ZERO` disables it.
    pub liveness_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
            liveness_interval: Duration::from_secs(10),
        }
    }
}

/// Errors that can occur when starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

/// Builder for configuring and starting a worldctl server.
///
/// # Example
///
/// ```rust,ignore
/// let server = WorldctlServerBuilder::new()
///     .bind("0.0.0.0", 8080)
///     .controller_config(ControllerConfig::default())
///     .build(CommandLauncher::default())
///     .await?;
/// server.run().await
/// ```
pub struct WorldctlServerBuilder {
    server: ServerConfig,
    controller: ControllerConfig,
}

impl WorldctlServerBuilder {
    pub fn new() -> Self {
        Self {
            server: ServerConfig::default(),
            controller: ControllerConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, host: &str, port: u16) -> Self {
        self.server.host = host.to_string();
        self.server.port = port;
        self
    }

    pub fn server_config(mut self, config: ServerConfig) -> Self {
        self.server = config;
        self
    }

    pub fn controller_config(mut self, config: ControllerConfig) -> Self {
        self.controller = config;
        self
    }

    /// Binds the listener and creates the controller around `launcher`.
    pub async fn build<L: ProcessLauncher>(
        self,
        launcher: L,
    ) -> Result<WorldctlServer<L>, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

        let controller = Arc::new(LifecycleController::new(launcher, self.controller));
        Ok(WorldctlServer {
            listener,
            state: AppState::new(controller),
            liveness_interval: self.server.liveness_interval,
        })
    }
}

impl Default for WorldctlServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound worldctl server.
///
/// Call [`run()`](Self::run) to start serving requests.
pub struct WorldctlServer<L: ProcessLauncher> {
    listener: TcpListener,
    state: AppState<L>,
    liveness_interval: Duration,
}

impl<L: ProcessLauncher> WorldctlServer<L> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn controller(&self) -> &Arc<LifecycleController<L>> {
        &self.state.controller
    }

    /// Serves until Ctrl-C, then stops every world.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(ctrl_c()).await
    }

    /// Serves until `shutdown` resolves, then stops every world.
    ///
    /// In-flight requests are allowed to finish before worlds are stopped.
    pub async fn run_until(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        if let Ok(addr) = self.local_addr() {
            tracing::info!(%addr, "worldctl listening");
        }

        let controller = Arc::clone(&self.state.controller);
        let liveness = tokio::spawn(liveness_loop(
            Arc::clone(&controller),
            self.liveness_interval,
        ));

        let router = build_router(self.state);
        let served = axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown)
            .await;
        liveness.abort();

        tracing::info!("shutting down, stopping all worlds");
        for report in controller.stop_all().await {
            if !report.is_clean() {
                tracing::warn!(world = %report.world, message = %report.message(), "unclean stop");
            }
        }

        served.map_err(|e| ServerError::Serve(e.to_string()))
    }
}

/// Probes liveness every `every` until aborted.
async fn liveness_loop<L: ProcessLauncher>(
    controller: Arc<LifecycleController<L>>,
    every: Duration,
) {
    if every.is_zero() {
        return;
    }
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let exited = controller.probe_liveness().await;
        if !exited.is_empty() {
            tracing::debug!(count = exited.len(), "liveness probe found exited processes");
        }
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
}
