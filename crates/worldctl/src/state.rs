//! Shared state handed to every handler.

use std::sync::Arc;

use worldctl_lifecycle::{LifecycleController, StatusSnapshotter};
use worldctl_process::ProcessLauncher;

/// The controller for writes, the snapshotter for reads.
pub struct AppState<L: ProcessLauncher> {
    pub controller: Arc<LifecycleController<L>>,
    pub snapshotter: StatusSnapshotter,
}

impl<L: ProcessLauncher> AppState<L> {
    pub fn new(controller: Arc<LifecycleController<L>>) -> Self {
        let snapshotter = controller.snapshotter();
        Self {
            controller,
            snapshotter,
        }
    }
}

// Derived `Clone` would require `L: Clone`.
impl<L: ProcessLauncher> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            snapshotter: self.snapshotter.clone(),
        }
    }
}
