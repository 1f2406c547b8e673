//! The session registry: the name → session map for every world.
//!
//! The registry enforces the one rule the rest of the stack relies on:
//! **at most one session per world name**. It also remembers insertion
//! order, so listings come back in the order worlds were created.
//!
//! # Concurrency note
//!
//! `SessionRegistry` is NOT thread-safe by itself. It is a plain `HashMap`
//! plus a `Vec`, and the lifecycle layer wraps it in a `tokio::sync::RwLock`.
//! Every method here is synchronous, so no caller can hold the lock across
//! a process start or stop.

use std::collections::HashMap;

use worldctl_process::ProcessKind;

use crate::{ProcessStatus, SessionError, WorldSession};

/// All known world sessions.
///
/// ## Lifecycle of an entry
///
/// ```text
/// insert() ──→ set_status(..) ... set_status(..) ──→ remove()
///    │                                                  │
///    ▼                                                  ▼
/// [present, listed]                             [gone, name reusable]
/// ```
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, WorldSession>,

    /// World names in insertion order. Kept in sync with `sessions`.
    order: Vec<String>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new session.
    ///
    /// # Errors
    /// Returns [`SessionError::NameConflict`] if a session with the same
    /// name already exists, whatever its status.
    pub fn insert(&mut self, session: WorldSession) -> Result<(), SessionError> {
        let name = session.name().to_string();
        if self.sessions.contains_key(&name) {
            return Err(SessionError::NameConflict(name));
        }

        self.order.push(name.clone());
        self.sessions.insert(name.clone(), session);
        tracing::debug!(world = %name, "session registered");
        Ok(())
    }

    /// Removes a session and returns it. The name becomes free for reuse.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no such session exists.
    pub fn remove(&mut self, name: &str) -> Result<WorldSession, SessionError> {
        let session = self
            .sessions
            .remove(name)
            .ok_or_else(|| SessionError::NotFound(name.to_string()))?;
        self.order.retain(|n| n != name);
        tracing::debug!(world = %name, "session removed");
        Ok(session)
    }

    pub fn get(&self, name: &str) -> Option<&WorldSession> {
        self.sessions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sessions.contains_key(name)
    }

    /// Moves one sub-process of a world to `status`.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] if the world is not registered
    /// - [`SessionError::InvalidTransition`] if the move would skip or
    ///   reverse a lifecycle step
    pub fn set_status(
        &mut self,
        name: &str,
        kind: ProcessKind,
        status: ProcessStatus,
    ) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(name)
            .ok_or_else(|| SessionError::NotFound(name.to_string()))?;

        let current = session.status_mut(kind);
        if !current.can_transition_to(&status) {
            return Err(SessionError::InvalidTransition {
                world: name.to_string(),
                kind,
                from: current.clone(),
                to: status,
            });
        }

        tracing::trace!(world = %name, %kind, from = %current, to = %status, "status change");
        *current = status;
        Ok(())
    }

    /// All sessions, in insertion order.
    pub fn list_all(&self) -> impl Iterator<Item = &WorldSession> {
        self.order.iter().filter_map(|name| self.sessions.get(name))
    }

    /// All world names, in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
