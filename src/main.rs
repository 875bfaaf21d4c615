mod aggregate;
mod api;
mod config;
mod keys;
mod server;
mod store;

use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::AppState;
use config::{Config, LogConfig};
use server::Server;
use store::ResultStore;

/// Sum and product calculator that remembers results per client token
#[derive(Debug, Parser)]
#[command(name = "calcstore", version)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Override the listening address from the configuration
    #[arg(long)]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(addr) = args.addr {
        config.server_addr = addr;
        config.validate()?;
    }

    init_logging(&config.log)?;

    info!("Starting calcstore");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(ResultStore::new());
    let server = Server::bind(&config.server_addr, AppState::new(store))
        .await?
        .with_shutdown_timeout(config.shutdown_timeout());
    info!("Server listening on: {}", server.local_addr());

    server.run(server::shutdown_signal()).await?;

    Ok(())
}

/// Initialize logging; `RUST_LOG` takes precedence over the configured level
fn init_logging(log: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log.level))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match &log.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.init(),
    }

    Ok(())
}
