//! World lifecycle control plane for worldctl.
//!
//! This crate is where start and stop intents become process operations:
//!
//! 1. **Controller**: [`LifecycleController`] serializes operations per
//!    world name, drives the three sub-processes in dependency order, and
//!    is the only writer of the session registry
//! 2. **Snapshots**: [`StatusSnapshotter`] hands observers consistent
//!    copies of every world's status without waiting on in-flight
//!    operations
//! 3. **Reports**: [`WorldHandle`] and [`StopReport`] describe what an
//!    operation did, including partial failures
//!
//! # How it fits in the stack
//!
//! ```text
//! HTTP Layer (above)  ← turns requests into controller calls
//!     ↕
//! Lifecycle Layer (this crate)  ← per-name locking, ordering, rollback
//!     ↕
//! Session Layer (below)  ← registry of WorldSessions
//! Process Layer (below)  ← ProcessLauncher / ProcessHandle
//! ```
//!
//! # Locking
//!
//! Two kinds of lock are involved, and they are never nested the wrong
//! way round:
//!
//! - a per-name `tokio::sync::Mutex` held for the whole of one start,
//!   stop or liveness probe of that world;
//! - the registry `RwLock`, taken briefly for each read or status write
//!   and never held across a process start or stop.
//!
//! Operations on different worlds only ever meet on the registry lock.
//!
//! Each start and stop runs on a task of its own, so a caller that gives
//! up waiting (a disconnected HTTP client, a timeout) never leaves a world
//! half started or half stopped.

mod config;
mod controller;
mod error;
mod locks;
mod report;
mod snapshot;

pub use config::ControllerConfig;
pub use controller::LifecycleController;
pub use error::{ErrorKind, LifecycleError};
pub use report::{StopReport, WorldHandle};
pub use snapshot::{StatusSnapshotter, WorldSnapshot, status_label, world_detail};
