mod config;
mod database;
mod datetime;
mod entities;
mod forms;
mod http_server;
mod logging;
mod ports;
mod services;
#[cfg(test)]
mod test_utils;
mod text_search;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config, database::Database, http_server::app::HttpServerConfig,
    logging::setup_logging,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "FYYUR_CONFIG")]
    config: Option<PathBuf>,

    /// Console log level (default: off)
    #[arg(long, default_value = "off", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level (default: debug)
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "FYYUR_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the listings site
    Serve {
        /// Address to bind (overrides the config file)
        #[arg(long, env = "FYYUR_HTTP_HOST")]
        host: Option<String>,

        /// The port to run the server on (overrides the config file)
        #[arg(short, long, env = "FYYUR_HTTP_PORT")]
        port: Option<u16>,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let mut config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .with_context(|| "Failed to load fyyur config")?;

    setup_logging(
        args.log_level,
        args.log_file.clone(),
        args.log_file_level,
        &config.error_log_path(),
    )?;
    log::debug!("Fyyur starting");

    match args.command {
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                println!("{}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let database = Database::open(&config.database_path()).await?;

            log::info!(
                "Starting HTTP server on {}:{}",
                config.server.host,
                config.server.port
            );
            http_server::app::start(HttpServerConfig {
                host: config.server.host.clone(),
                port: config.server.port,
                database,
                config,
            })
            .await?;
        }
    }

    Ok(())
}
