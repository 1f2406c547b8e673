//! World session tracking for worldctl.
//!
//! This crate holds the in-memory record of every running world:
//!
//! 1. **Configuration**: what the operator asked for ([`WorldConfig`])
//! 2. **Status**: where each sub-process is in its lifecycle
//!    ([`ProcessStatus`], [`WorldSession`])
//! 3. **Registry**: the name → session map that enforces one session
//!    per name ([`SessionRegistry`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Lifecycle Layer (above)  ← the only writer; serializes start/stop per name
//!     ↕
//! Session Layer (this crate)  ← world configuration and sub-process status
//!     ↕
//! Process Layer (below)  ← provides ProcessKind, LaunchSpec
//! ```

mod config;
mod error;
mod registry;
mod session;

pub use config::{MAX_NAME_LEN, WorldConfig, validate_name};
pub use error::SessionError;
pub use registry::SessionRegistry;
pub use session::{ProcessStatus, WorldSession};
