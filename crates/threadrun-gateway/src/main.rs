//! threadrun server binary.
//!
//! Loads settings (defaults, settings file, environment, then CLI flags),
//! initializes logging, and serves the HTTP API until ctrl-c.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use threadrun_core::constants::{NAME, VERSION};
use threadrun_core::logging::{LogFormat, init_subscriber};
use threadrun_server::ThreadrunServer;
use threadrun_settings::{ThreadrunSettings, load_settings, load_settings_from_path};

/// threadrun HTTP gateway.
#[derive(Parser, Debug)]
#[command(name = NAME, version, about = "Assistants run orchestration gateway")]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, 0 for auto-assign (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Settings file (default `~/.threadrun/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,
}

impl Cli {
    fn load(&self) -> Result<ThreadrunSettings> {
        let mut settings = match &self.settings {
            Some(path) => load_settings_from_path(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => load_settings().context("Failed to load settings")?,
        };
        self.apply(&mut settings);
        Ok(settings)
    }

    fn apply(&self, settings: &mut ThreadrunSettings) {
        if let Some(host) = &self.host {
            settings.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let settings = args.load()?;

    let format = if settings.logging.json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    init_subscriber(&settings.logging.level, format);

    let api_key = settings
        .require_api_key()
        .context("Cannot start without a remote API key")?;

    let server = ThreadrunServer::from_settings(&settings, api_key)
        .context("Failed to build remote client")?;
    let (addr, handle) = server.listen().await.context("Failed to bind server")?;

    tracing::info!(
        version = VERSION,
        poll_interval_ms = settings.orchestration.poll_interval_ms,
        poll_timeout_ms = settings.orchestration.poll_timeout_ms,
        "threadrun listening on http://{addr}"
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutting down...");
    server
        .shutdown()
        .graceful_shutdown(vec![handle], Some(server.config().shutdown_timeout))
        .await;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_are_none() {
        let cli = Cli::parse_from(["threadrun"]);
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.settings.is_none());
    }

    #[test]
    fn cli_flags_parse() {
        let cli = Cli::parse_from([
            "threadrun",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--settings",
            "/tmp/threadrun.json",
        ]);
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/threadrun.json")));
    }

    #[test]
    fn cli_overrides_settings() {
        let cli = Cli::parse_from(["threadrun", "--port", "9999"]);
        let mut settings = ThreadrunSettings::default();
        cli.apply(&mut settings);
        assert_eq!(settings.server.port, 9999);
        assert_eq!(settings.server.host, "127.0.0.1");
    }

    #[test]
    fn command_named_after_package() {
        use clap::CommandFactory;
        assert_eq!(Cli::command().get_name(), NAME);
    }

    #[test]
    fn invalid_port_rejected() {
        assert!(Cli::try_parse_from(["threadrun", "--port", "99999"]).is_err());
    }
}
