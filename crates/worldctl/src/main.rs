use tracing::info;
use tracing_subscriber::EnvFilter;
use worldctl::prelude::*;

#[tokio::main]
async fn main() -> Result<(), WorldctlError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = AppConfig::from_env()?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        spawn_timeout_secs = config.controller.spawn_timeout.as_secs(),
        stop_timeout_secs = config.controller.stop_timeout.as_secs(),
        liveness_interval_secs = config.server.liveness_interval.as_secs(),
        game_server = %config.launcher.game_server.program,
        "configuration loaded"
    );

    let server = WorldctlServerBuilder::new()
        .server_config(config.server)
        .controller_config(config.controller)
        .build(CommandLauncher::new(config.launcher))
        .await?;
    server.run().await?;

    Ok(())
}
