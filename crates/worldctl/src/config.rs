//! Configuration loaded from the environment.
//!
//! Every setting is optional; unset variables fall back to the defaults of
//! [`ServerConfig`], [`ControllerConfig`] and [`LauncherConfig`].
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `WORLDCTL_HOST` | listen address | `0.0.0.0` |
//! | `WORLDCTL_PORT` | listen port | `8080` |
//! | `WORLDCTL_SPAWN_TIMEOUT_SECS` | per-process start timeout | `60` |
//! | `WORLDCTL_STOP_TIMEOUT_SECS` | per-process stop timeout | `30` |
//! | `WORLDCTL_LIVENESS_INTERVAL_SECS` | liveness probe period, `0` disables | `10` |
//! | `WORLDCTL_STARTUP_GRACE_MS` | early-exit window after spawn | `500` |
//! | `WORLDCTL_GAME_SERVER_CMD` | game server command line | `luantiserver --worldname {world} --port {port}` |
//! | `WORLDCTL_MAP_RENDERER_CMD` | map renderer command line | `luanti-map-render {world}` |
//! | `WORLDCTL_MAP_SERVER_CMD` | map server command line | `luanti-map-server {world} {map_port}` |
//! | `WORLDCTL_SERVICE_ARGS` | extra game server arguments when the service is enabled | empty |

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use worldctl_lifecycle::ControllerConfig;
use worldctl_process::{CommandTemplate, LauncherConfig};

use crate::server::ServerConfig;

/// A malformed configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Complete configuration for the `worldctl` binary.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub controller: ControllerConfig,
    pub launcher: LauncherConfig,
}

impl AppConfig {
    /// Load configuration from `WORLDCTL_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = lookup("WORLDCTL_HOST") {
            config.server.host = host;
        }
        config.server.port = parse(&lookup, "WORLDCTL_PORT", config.server.port)?;
        config.server.liveness_interval = secs(
            &lookup,
            "WORLDCTL_LIVENESS_INTERVAL_SECS",
            config.server.liveness_interval,
        )?;

        config.controller.spawn_timeout = nonzero(
            "WORLDCTL_SPAWN_TIMEOUT_SECS",
            secs(&lookup, "WORLDCTL_SPAWN_TIMEOUT_SECS", config.controller.spawn_timeout)?,
        )?;
        config.controller.stop_timeout = nonzero(
            "WORLDCTL_STOP_TIMEOUT_SECS",
            secs(&lookup, "WORLDCTL_STOP_TIMEOUT_SECS", config.controller.stop_timeout)?,
        )?;

        let grace_ms = parse(
            &lookup,
            "WORLDCTL_STARTUP_GRACE_MS",
            config.launcher.startup_grace.as_millis() as u64,
        )?;
        config.launcher.startup_grace = Duration::from_millis(grace_ms);

        if let Some(line) = lookup("WORLDCTL_GAME_SERVER_CMD") {
            config.launcher.game_server = command("WORLDCTL_GAME_SERVER_CMD", &line)?;
        }
        if let Some(line) = lookup("WORLDCTL_MAP_RENDERER_CMD") {
            config.launcher.map_renderer = command("WORLDCTL_MAP_RENDERER_CMD", &line)?;
        }
        if let Some(line) = lookup("WORLDCTL_MAP_SERVER_CMD") {
            config.launcher.map_server = command("WORLDCTL_MAP_SERVER_CMD", &line)?;
        }
        if let Some(args) = lookup("WORLDCTL_SERVICE_ARGS") {
            config.launcher.service_args = args.split_whitespace().map(str::to_string).collect();
        }

        Ok(config)
    }
}

fn parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn secs(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    parse(lookup, var, default.as_secs()).map(Duration::from_secs)
}

fn nonzero(var: &'static str, value: Duration) -> Result<Duration, ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::Invalid {
            var,
            reason: "must be greater than zero".into(),
        });
    }
    Ok(value)
}

fn command(var: &'static str, line: &str) -> Result<CommandTemplate, ConfigError> {
    CommandTemplate::parse(line).ok_or(ConfigError::Invalid {
        var,
        reason: "command must not be empty".into(),
    })
}
