use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tourai::{AppState, TourAiConfig, logging, web};

#[derive(Debug, Parser)]
#[command(name = "tourai", version, about = "Walking tour planning backend")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides configuration)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = TourAiConfig::load_from_path(cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    logging::init(&config.logging)?;

    if config.maps.api_key.is_none() {
        tracing::warn!("GOOGLE_MAPS_API_KEY is not set; geocoding and distance requests will fail");
    }
    if config.llm.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; language model requests will be rejected upstream");
    }

    let state = AppState::from_config(&config)?;
    web::run(&config.server, state).await
}
