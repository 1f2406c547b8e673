//! Wire types for the worldctl control API.
//!
//! This crate defines the JSON bodies that operators and polling UIs
//! exchange with the control plane. It has no behavior of its own: the
//! lifecycle layer converts its domain types into these, and the HTTP
//! layer serializes them.
//!
//! ```text
//! POST /api/world/start   StartWorldRequest  → MessageResponse | ErrorResponse
//! POST /api/world/stop    StopWorldRequest   → MessageResponse | ErrorResponse
//! GET  /api/worlds/list                      → WorldListResponse
//! GET  /api/world/{name}                     → WorldDetail | ErrorResponse
//! ```

mod types;

pub use types::{
    ErrorResponse, HealthResponse, MessageResponse, StartWorldRequest, StatusLabel,
    StopWorldRequest, WorldDetail, WorldListEntry, WorldListResponse,
};
