use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};

use wschat::core::config::{self, CliOverrides};

#[derive(Parser)]
#[command(name = "wschat", about = "Terminal chat client over a single WebSocket")]
struct Args {
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Load config before the logger exists; report problems once it does
    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (config::ChatConfig::default(), Some(e)),
    };
    let cli = CliOverrides {
        log_level: args.log_level,
        log_file: args.log_file,
    };
    let resolved = config::resolve(&file_config, &cli);

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }
    if let Some(e) = config_error {
        log::warn!("Ignoring config file: {}", e);
    }

    // tokio-tungstenite's rustls backend needs a process-wide crypto provider
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        log::debug!("rustls crypto provider already installed");
    }

    log::info!("wschat starting up, endpoint {}", resolved.endpoint);

    wschat::tui::run(resolved)
}
