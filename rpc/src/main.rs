//! Vita server daemon entry point.

use std::path::PathBuf;

use clap::Parser;
use tracing::error;

use vita_rpc::logging::{init_logging, LogFormat};
use vita_rpc::{RpcConfig, RpcServer};

#[derive(Parser)]
#[command(name = "vita-server", about = "Vita identity re-verification service")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long, env = "VITA_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP port.
    #[arg(long, env = "VITA_PORT")]
    port: Option<u16>,

    /// Data directory for LMDB storage.
    #[arg(long, env = "VITA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Endpoint of the external face-comparison service.
    #[arg(long, env = "VITA_COMPARISON_URL")]
    comparison_url: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VITA_LOG_LEVEL")]
    log_level: Option<String>,
}

fn load_config(cli: &Cli) -> Result<RpcConfig, vita_rpc::RpcError> {
    let mut config = match &cli.config {
        Some(path) => RpcConfig::from_toml_file(&path.display().to_string())?,
        None => RpcConfig::default(),
    };
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(url) = &cli.comparison_url {
        config.comparison_url = url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };
    let format = match config.log_format.parse::<LogFormat>() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    init_logging(format, &config.log_level);

    if let Err(e) = RpcServer::new(config).start().await {
        error!("server failed: {e}");
        std::process::exit(1);
    }
}
