//! World configuration and its validation rules.

use worldctl_process::LaunchSpec;

use crate::SessionError;

/// Longest accepted world name.
pub const MAX_NAME_LEN: usize = 50;

/// Checks that a world name is 1–[`MAX_NAME_LEN`] characters of
/// `[A-Za-z0-9_]`.
///
/// The name ends up in process command lines and log fields, so anything
/// else is rejected before it can reach a launcher.
pub fn validate_name(name: &str) -> Result<(), SessionError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(SessionError::InvalidName(name.to_string()))
    }
}

/// What the operator asked for when starting a world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldConfig {
    /// Unique world name. Immutable once the session exists.
    pub name: String,
    /// Game server port.
    pub port: u16,
    /// Map server port. When `None`, the map renderer and map server are
    /// never started for this world.
    pub map_port: Option<u16>,
    /// Whether the game server runs with its auxiliary service.
    pub service_enabled: bool,
}

impl WorldConfig {
    /// A world with no map port and the service enabled.
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            port,
            map_port: None,
            service_enabled: true,
        }
    }

    pub fn with_map_port(mut self, map_port: u16) -> Self {
        self.map_port = Some(map_port);
        self
    }

    pub fn with_service(mut self, enabled: bool) -> Self {
        self.service_enabled = enabled;
        self
    }

    /// Builds a config from untyped request values.
    ///
    /// Only checks that the integers fit in a `u16`; zero ports and port
    /// collisions are left to [`validate_ports`](Self::validate_ports) so the
    /// controller can report them after its conflict check.
    pub fn from_raw(
        name: impl Into<String>,
        port: i64,
        map_port: Option<i64>,
        service_enabled: bool,
    ) -> Result<Self, SessionError> {
        let port = to_port(port)?;
        let map_port = map_port.map(to_port).transpose()?;
        Ok(Self {
            name: name.into(),
            port,
            map_port,
            service_enabled,
        })
    }

    /// Checks that both ports are in `1..=65535` and that the map port
    /// differs from the game port.
    pub fn validate_ports(&self) -> Result<(), SessionError> {
        if self.port == 0 {
            return Err(SessionError::InvalidPort(
                "port must be between 1 and 65535".into(),
            ));
        }
        match self.map_port {
            Some(0) => Err(SessionError::InvalidPort(
                "map port must be between 1 and 65535".into(),
            )),
            Some(map_port) if map_port == self.port => Err(SessionError::InvalidPort(
                format!("map port {map_port} collides with game port"),
            )),
            _ => Ok(()),
        }
    }

    /// The launcher's view of this world.
    pub fn launch_spec(&self) -> LaunchSpec {
        LaunchSpec {
            world: self.name.clone(),
            port: self.port,
            map_port: self.map_port,
            service_enabled: self.service_enabled,
        }
    }
}

fn to_port(value: i64) -> Result<u16, SessionError> {
    u16::try_from(value).map_err(|_| {
        SessionError::InvalidPort(format!("{value} is outside 1-65535"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_accepts_alphanumeric_and_underscore() {
        assert!(validate_name("alpha").is_ok());
        assert!(validate_name("World_42").is_ok());
        assert!(validate_name(&"a".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_validate_name_rejects_bad_names() {
        for name in ["", "has space", "dash-name", "../etc", "ünïcode"] {
            assert!(
                matches!(validate_name(name), Err(SessionError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
        assert!(validate_name(&"a".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_ports_rejects_zero_port() {
        let config = WorldConfig::new("alpha", 0);
        assert!(matches!(
            config.validate_ports(),
            Err(SessionError::InvalidPort(_))
        ));
    }

    #[test]
    fn test_validate_ports_rejects_colliding_map_port() {
        let config = WorldConfig::new("alpha", 8080).with_map_port(8080);
        assert!(matches!(
            config.validate_ports(),
            Err(SessionError::InvalidPort(_))
        ));
    }

    #[test]
    fn test_validate_ports_accepts_distinct_ports() {
        let config = WorldConfig::new("alpha", 8080).with_map_port(9001);
        assert!(config.validate_ports().is_ok());
        assert!(WorldConfig::new("alpha", 65535).validate_ports().is_ok());
    }

    #[test]
    fn test_from_raw_rejects_out_of_range_values() {
        assert!(matches!(
            WorldConfig::from_raw("alpha", 70000, None, true),
            Err(SessionError::InvalidPort(_))
        ));
        assert!(matches!(
            WorldConfig::from_raw("alpha", -1, None, true),
            Err(SessionError::InvalidPort(_))
        ));
        assert!(matches!(
            WorldConfig::from_raw("alpha", 8080, Some(65536), true),
            Err(SessionError::InvalidPort(_))
        ));
    }

    #[test]
    fn test_from_raw_keeps_in_range_values() {
        let config = WorldConfig::from_raw("beta", 8081, Some(9001), false).unwrap();
        assert_eq!(config, WorldConfig::new("beta", 8081).with_map_port(9001).with_service(false));
    }

    #[test]
    fn test_launch_spec_mirrors_config() {
        let spec = WorldConfig::new("alpha", 8080).with_map_port(9001).launch_spec();
        assert_eq!(spec.world, "alpha");
        assert_eq!(spec.port, 8080);
        assert_eq!(spec.map_port, Some(9001));
        assert!(spec.service_enabled);
    }
}
