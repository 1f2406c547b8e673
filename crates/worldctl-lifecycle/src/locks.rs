//! Per-name exclusive sections.
//!
//! Every world name maps to its own `tokio::sync::Mutex`, created on first
//! use. The mutex guards that world's live process handles, so holding the
//! lock is both "nobody else is starting or stopping this world" and
//! "these are the handles to drive".
//!
//! Entries are pruned when the last guard drops and the slot holds no
//! handles, so the table does not grow with every name ever tried.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use worldctl_process::{ProcessHandle, ProcessKind};

/// Slot contents that can tell whether they are worth keeping.
pub(crate) trait Vacancy {
    fn is_vacant(&self) -> bool;
}

/// The live handles of one world, at most one per [`ProcessKind`].
pub(crate) struct ProcessSet<H> {
    game_server: Option<H>,
    map_renderer: Option<H>,
    map_server: Option<H>,
}

impl<H: ProcessHandle> ProcessSet<H> {
    fn slot(&mut self, kind: ProcessKind) -> &mut Option<H> {
        match kind {
            ProcessKind::GameServer => &mut self.game_server,
            ProcessKind::MapRenderer => &mut self.map_renderer,
            ProcessKind::MapServer => &mut self.map_server,
        }
    }

    pub(crate) fn put(&mut self, handle: H) {
        let kind = handle.kind();
        *self.slot(kind) = Some(handle);
    }

    pub(crate) fn take(&mut self, kind: ProcessKind) -> Option<H> {
        self.slot(kind).take()
    }

    pub(crate) fn get_mut(&mut self, kind: ProcessKind) -> Option<&mut H> {
        self.slot(kind).as_mut()
    }
}

impl<H> Default for ProcessSet<H> {
    fn default() -> Self {
        Self {
            game_server: None,
            map_renderer: None,
            map_server: None,
        }
    }
}

impl<H> Vacancy for ProcessSet<H> {
    fn is_vacant(&self) -> bool {
        self.game_server.is_none() && self.map_renderer.is_none() && self.map_server.is_none()
    }
}

/// Name → async mutex table.
///
/// The table itself sits behind a std `Mutex` that is only ever held for a
/// map lookup, never across an `.await`.
pub(crate) struct NameLocks<T> {
    table: Mutex<HashMap<String, Arc<AsyncMutex<T>>>>,
}

impl<T: Vacancy + Default> NameLocks<T> {
    pub(crate) fn new() -> Self {
        Self {
            table: Mutex::new(HashMap::new()),
        }
    }

    /// Waits for exclusive access to `name`, creating its slot if needed.
    pub(crate) async fn lock(&self, name: &str) -> NameGuard<'_, T> {
        let slot = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(table.entry(name.to_string()).or_default())
        };
        NameGuard {
            locks: self,
            name: name.to_string(),
            guard: slot.lock_owned().await,
        }
    }

    /// Takes `name` only if it has a slot and nobody holds it.
    pub(crate) fn try_lock(&self, name: &str) -> Option<NameGuard<'_, T>> {
        let slot = {
            let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(table.get(name)?)
        };
        Some(NameGuard {
            locks: self,
            name: name.to_string(),
            guard: slot.try_lock_owned().ok()?,
        })
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Exclusive access to one name's slot. Derefs to the slot contents.
pub(crate) struct NameGuard<'a, T: Vacancy> {
    locks: &'a NameLocks<T>,
    name: String,
    guard: OwnedMutexGuard<T>,
}

impl<T: Vacancy> Deref for NameGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T: Vacancy> DerefMut for NameGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T: Vacancy> Drop for NameGuard<'_, T> {
    fn drop(&mut self) {
        let mut table = self.locks.table.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = table.get(&self.name) else {
            return;
        };
        let slot = OwnedMutexGuard::mutex(&self.guard);
        // Clones are only made under the table lock, so a count of two
        // (table + this guard) means nobody is waiting on the slot.
        if Arc::ptr_eq(entry, slot) && Arc::strong_count(slot) == 2 && self.guard.is_vacant() {
            table.remove(&self.name);
        }
    }
}
