use std::path::PathBuf;

use clap::Parser;
use httpfs::config::{Config, Transport};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "httpfs")]
#[command(about = "Serve a directory over a minimal HTTP/1.1 file API")]
#[command(version)]
struct Cli {
    /// Port to open the server on
    #[arg(short, long, env = "HTTPFS_PORT")]
    port: Option<u16>,

    /// Path to the shared directory
    #[arg(short, long, env = "HTTPFS_DIR")]
    dir: Option<PathBuf>,

    /// Activate verbose mode (logs accept, read, write and close events)
    #[arg(short, long)]
    verbose: bool,

    /// Address to bind to
    #[arg(long, env = "HTTPFS_HOST")]
    host: Option<String>,

    /// Serve one request per datagram over UDP instead of TCP
    #[arg(long)]
    udp: bool,

    /// YAML config file; flags override its values
    #[arg(short, long, env = "HTTPFS_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut cfg = Config::load(self.config.as_deref())?;

        if let Some(port) = self.port {
            cfg.server.port = port;
        }
        if let Some(host) = self.host {
            cfg.server.host = host;
        }
        if let Some(dir) = self.dir {
            cfg.root_dir = dir;
        }
        if self.udp {
            cfg.server.transport = Transport::Udp;
        }
        cfg.verbose |= self.verbose;

        cfg.prepare_root()?;
        Ok(cfg)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = Cli::parse().into_config()?;

    let default_filter = if cfg.verbose { "httpfs=debug" } else { "httpfs=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::debug!(?cfg, "Resolved configuration");

    tokio::select! {
        res = httpfs::server::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
