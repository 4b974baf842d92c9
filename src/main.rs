use clap::Parser;
use dotenvy::dotenv;
use tracing::error;

mod application;
mod domain;
mod infrastructure;
mod utils;

use crate::application::commands::Cli;
use crate::infrastructure::config::app_config::AppConfig;

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {:#}", e);
            std::process::exit(2);
        }
    };
    utils::setup_logging(config.log_level);

    if let Err(e) = application::handlers::run(cli, config).await {
        error!("{:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}
