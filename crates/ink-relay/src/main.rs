//! ink-relay: HTTP + WebSocket server pairing a desktop viewer with a
//! mobile peer and relaying the peer's drawings.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ink_common::ConfigError;
use ink_config::InkConfig;
use ink_relay::{start, Relay};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ink-relay", version, about = "Pairs a viewer with a drawing peer and relays its ink")]
struct Args {
    /// Config file path. Defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Interface to bind.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on.
    #[arg(short, long)]
    port: Option<u16>,

    /// Seconds before a session with no viewer is reaped (0 disables).
    #[arg(long)]
    session_ttl: Option<u64>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Command-line flags win over the config file.
    fn apply(&self, config: &mut InkConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ttl) = self.session_ttl {
            config.sessions.unattached_ttl_secs = ttl;
        }
    }
}

fn load(args: &Args) -> Result<InkConfig, ConfigError> {
    let mut config = ink_config::load_config(args.config.as_deref())?;
    args.apply(&mut config);
    ink_config::validation::validate(&config)?;
    Ok(config)
}

fn init_logging(args: &Args, config: &InkConfig) {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(config.logging.level.as_directive());
    let fallback = format!("ink_relay={level},tower_http={level}");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .init();
}

async fn run(config: InkConfig) -> ink_common::Result<()> {
    let relay = Relay::new(config.sessions.outbound_capacity as usize);
    let handle = start(&config, relay).await?;

    tokio::signal::ctrl_c().await?;
    handle.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ink-relay: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&args, &config);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "ink-relay stopped");
            ExitCode::FAILURE
        }
    }
}
