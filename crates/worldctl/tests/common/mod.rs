//! A launcher whose processes live only in memory.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use worldctl::prelude::*;
use worldctl_process::{LaunchSpec, ProcessError, ProcessHandle};

#[derive(Clone, Default)]
pub struct FakeLauncher {
    failing: Arc<Mutex<HashSet<(String, ProcessKind)>>>,
    stopped: Arc<Mutex<Vec<(String, ProcessKind)>>>,
}

impl FakeLauncher {
    /// Makes `kind` of `world` exit during startup.
    pub fn fail_start(&self, world: &str, kind: ProcessKind) {
        self.failing.lock().unwrap().insert((world.to_string(), kind));
    }

    /// Every stop performed so far, in order.
    pub fn stopped(&self) -> Vec<(String, ProcessKind)> {
        self.stopped.lock().unwrap().clone()
    }
}

impl ProcessLauncher for FakeLauncher {
    type Handle = FakeProcess;

    fn prepare(&self, kind: ProcessKind, spec: &LaunchSpec) -> Result<FakeProcess, ProcessError> {
        Ok(FakeProcess {
            kind,
            world: spec.world.clone(),
            launcher: self.clone(),
        })
    }
}

pub struct FakeProcess {
    kind: ProcessKind,
    world: String,
    launcher: FakeLauncher,
}

impl ProcessHandle for FakeProcess {
    fn kind(&self) -> ProcessKind {
        self.kind
    }

    async fn start(&mut self, _timeout: Duration) -> Result<(), ProcessError> {
        let failing = self.launcher.failing.lock().unwrap();
        if failing.contains(&(self.world.clone(), self.kind)) {
            return Err(ProcessError::ExitedEarly("exit status: 1".into()));
        }
        Ok(())
    }

    async fn stop(&mut self, _timeout: Duration) -> Result<(), ProcessError> {
        let mut stopped = self.launcher.stopped.lock().unwrap();
        stopped.push((self.world.clone(), self.kind));
        Ok(())
    }

    async fn is_alive(&mut self) -> bool {
        true
    }
}
