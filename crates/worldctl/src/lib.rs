//! # worldctl
//!
//! Control plane for game worlds. Each world is a game server plus an
//! optional map renderer and map server; worldctl starts and stops them as
//! a unit and reports their status over a small JSON API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use worldctl::prelude::*;
//!
//! # async fn run() -> Result<(), WorldctlError> {
//! let server = WorldctlServerBuilder::new()
//!     .bind("127.0.0.1", 8080)
//!     .build(CommandLauncher::default())
//!     .await?;
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub mod prelude {
    pub use crate::config::{AppConfig, ConfigError};
    pub use crate::error::{ApiError, WorldctlError};
    pub use crate::router::build_router;
    pub use crate::server::{ServerConfig, ServerError, WorldctlServer, WorldctlServerBuilder};
    pub use crate::state::AppState;

    pub use worldctl_lifecycle::{ControllerConfig, LifecycleController, LifecycleError};
    pub use worldctl_process::{CommandLauncher, LauncherConfig, ProcessKind, ProcessLauncher};
    pub use worldctl_session::WorldConfig;
}
