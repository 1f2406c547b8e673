//! OS process adapter using `tokio::process`.
//!
//! Each sub-process is a child of the control plane. A child that exits
//! within [`LauncherConfig::startup_grace`] of being spawned counts as a
//! failed start; one that is still running after the grace period is
//! considered up.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time;

use crate::{LaunchSpec, ProcessError, ProcessHandle, ProcessKind, ProcessLauncher};

/// A program plus argument list, with placeholders.
///
/// Arguments may contain `{world}`, `{port}` and `{map_port}`, which are
/// substituted from the [`LaunchSpec`] when a handle is prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandTemplate {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Parses a whitespace-separated command line. Returns `None` for an
    /// empty line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    fn render_args(&self, spec: &LaunchSpec) -> Vec<String> {
        let port = spec.port.to_string();
        let map_port = spec.map_port.map(|p| p.to_string()).unwrap_or_default();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{world}", &spec.world)
                    .replace("{port}", &port)
                    .replace("{map_port}", &map_port)
            })
            .collect()
    }
}

/// Commands and timings for [`CommandLauncher`].
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    pub game_server: CommandTemplate,
    pub map_renderer: CommandTemplate,
    pub map_server: CommandTemplate,

    /// Extra game-server arguments appended when the world is started with
    /// its auxiliary service enabled.
    pub service_args: Vec<String>,

    /// How long a freshly spawned child must stay up before its start
    /// counts as successful. Capped by the caller's spawn timeout.
    pub startup_grace: Duration,
}

impl LauncherConfig {
    pub fn template(&self, kind: ProcessKind) -> &CommandTemplate {
        match kind {
            ProcessKind::GameServer => &self.game_server,
            ProcessKind::MapRenderer => &self.map_renderer,
            ProcessKind::MapServer => &self.map_server,
        }
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            game_server: CommandTemplate::new(
                "luantiserver",
                &["--worldname", "{world}", "--port", "{port}"],
            ),
            map_renderer: CommandTemplate::new("luanti-map-render", &["{world}"]),
            map_server: CommandTemplate::new(
                "luanti-map-server",
                &["{world}", "{map_port}"],
            ),
            service_args: Vec::new(),
            startup_grace: Duration::from_millis(500),
        }
    }
}

/// A [`ProcessLauncher`] that runs each sub-process as a child process.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    config: Arc<LauncherConfig>,
}

impl CommandLauncher {
    pub fn new(config: LauncherConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }
}

impl Default for CommandLauncher {
    fn default() -> Self {
        Self::new(LauncherConfig::default())
    }
}

impl ProcessLauncher for CommandLauncher {
    type Handle = CommandProcess;

    fn prepare(
        &self,
        kind: ProcessKind,
        spec: &LaunchSpec,
    ) -> Result<CommandProcess, ProcessError> {
        if kind.requires_map_port() && spec.map_port.is_none() {
            return Err(ProcessError::InvalidCommand(format!(
                "{kind} requires a map port"
            )));
        }

        let template = self.config.template(kind);
        let mut args = template.render_args(spec);
        if kind == ProcessKind::GameServer && spec.service_enabled {
            args.extend(self.config.service_args.iter().cloned());
        }

        Ok(CommandProcess {
            kind,
            world: spec.world.clone(),
            program: template.program.clone(),
            args,
            startup_grace: self.config.startup_grace,
            child: None,
        })
    }
}

/// One child process owned by the control plane.
///
/// The child is spawned with `kill_on_drop`, so dropping a handle never
/// leaks a running process.
#[derive(Debug)]
pub struct CommandProcess {
    kind: ProcessKind,
    world: String,
    program: String,
    args: Vec<String>,
    startup_grace: Duration,
    child: Option<Child>,
}

impl CommandProcess {
    /// The program this handle launches.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The fully rendered argument list.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// OS process id, while running.
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }
}

impl ProcessHandle for CommandProcess {
    fn kind(&self) -> ProcessKind {
        self.kind
    }

    async fn start(&mut self, timeout: Duration) -> Result<(), ProcessError> {
        if self.child.is_some() {
            return Err(ProcessError::AlreadyRunning);
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(ProcessError::Spawn)?;

        let grace = self.startup_grace.min(timeout);
        let early_exit = time::timeout(grace, child.wait()).await;
        match early_exit {
            // Still running after the grace period: it's up.
            Err(_) => {
                tracing::debug!(
                    world = %self.world,
                    kind = %self.kind,
                    pid = ?child.id(),
                    "process started"
                );
                self.child = Some(child);
                Ok(())
            }
            Ok(Ok(status)) => Err(ProcessError::ExitedEarly(status.to_string())),
            Ok(Err(e)) => Err(ProcessError::Spawn(e)),
        }
    }

    async fn stop(&mut self, timeout: Duration) -> Result<(), ProcessError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        if let Ok(Some(status)) = child.try_wait() {
            tracing::debug!(
                world = %self.world,
                kind = %self.kind,
                %status,
                "process had already exited"
            );
            return Ok(());
        }

        child.start_kill().map_err(ProcessError::Stop)?;
        match time::timeout(timeout, child.wait()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(ProcessError::Stop(e)),
            Err(_) => Err(ProcessError::Timeout),
        }
    }

    async fn is_alive(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(map_port: Option<u16>, service_enabled: bool) -> LaunchSpec {
        LaunchSpec {
            world: "alpha".into(),
            port: 30000,
            map_port,
            service_enabled,
        }
    }

    #[test]
    fn test_template_parse_splits_on_whitespace() {
        let t = CommandTemplate::parse("  server  --world {world}  ").unwrap();
        assert_eq!(t.program, "server");
        assert_eq!(t.args, vec!["--world", "{world}"]);
    }

    #[test]
    fn test_template_parse_empty_returns_none() {
        assert!(CommandTemplate::parse("   ").is_none());
    }

    #[test]
    fn test_prepare_substitutes_placeholders() {
        let launcher = CommandLauncher::default();
        let handle = launcher
            .prepare(ProcessKind::MapServer, &spec(Some(9001), false))
            .unwrap();
        assert_eq!(handle.program(), "luanti-map-server");
        assert_eq!(handle.args(), ["alpha", "9001"]);
    }

    #[test]
    fn test_prepare_appends_service_args_to_game_server_only() {
        let launcher = CommandLauncher::new(LauncherConfig {
            service_args: vec!["--service".into()],
            ..LauncherConfig::default()
        });

        let game = launcher
            .prepare(ProcessKind::GameServer, &spec(Some(9001), true))
            .unwrap();
        assert_eq!(game.args().last().map(String::as_str), Some("--service"));

        let renderer = launcher
            .prepare(ProcessKind::MapRenderer, &spec(Some(9001), true))
            .unwrap();
        assert!(!renderer.args().iter().any(|a| a == "--service"));
    }

    #[test]
    fn test_prepare_service_disabled_has_no_service_args() {
        let launcher = CommandLauncher::new(LauncherConfig {
            service_args: vec!["--service".into()],
            ..LauncherConfig::default()
        });
        let game = launcher
            .prepare(ProcessKind::GameServer, &spec(None, false))
            .unwrap();
        assert_eq!(game.args(), ["--worldname", "alpha", "--port", "30000"]);
    }

    #[test]
    fn test_prepare_map_process_without_map_port_fails() {
        let launcher = CommandLauncher::default();
        let result = launcher.prepare(ProcessKind::MapRenderer, &spec(None, false));
        assert!(matches!(result, Err(ProcessError::InvalidCommand(_))));
    }

    #[tokio::test]
    async fn test_unstarted_handle_is_not_alive_and_stops_cleanly() {
        let launcher = CommandLauncher::default();
        let mut handle = launcher
            .prepare(ProcessKind::GameServer, &spec(None, false))
            .unwrap();
        assert!(!handle.is_alive().await);
        assert!(handle.stop(Duration::from_secs(1)).await.is_ok());
        assert_eq!(handle.pid(), None);
    }
}
