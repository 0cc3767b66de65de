use anyhow::Result;
use clap::Parser;
use ferrumkv::config::{ServerConfig, DEFAULT_CONFIG_FILE};
use ferrumkv::Server;
use std::path::PathBuf;
use tracing::info;

/// FerrumKV server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Properties file holding server.port, server.host, server.max_clients and data.dir
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the configured host
    #[arg(long)]
    host: Option<String>,

    /// Override the configured port
    #[arg(long)]
    port: Option<u16>,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let mut config = ServerConfig::load(&args.config)?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    info!("FerrumKV starting...");
    info!(
        "Data directory {:?}, up to {} concurrent clients",
        config.data_dir, config.max_clients
    );

    let server = Server::bind(&config).await?;
    server.run_until_ctrl_c().await
}
