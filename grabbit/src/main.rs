// Grabbit - shopping list tracker
// Entry point: CLI parsing, logging and the dashboard server

use anyhow::Context;
use clap::{Parser, Subcommand};
use grabbit::app::{self, AppState};
use grabbit::config::{AppConfig, DEFAULT_ADDR, IMPORT_SOURCE};
use grabbit::logging::init_logging;
use std::path::PathBuf;
use std::sync::Arc;

/// Grabbit - keeps track of everything you need to grab
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding items.json and the dashboard secret
    #[arg(long, env = "GRABBIT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Address to bind the dashboard server to
    #[arg(short, long, env = "GRABBIT_ADDR", default_value = DEFAULT_ADDR)]
    addr: String,

    /// Dashboard secret (default: stored in the data directory, generated on first run)
    #[arg(long, env = "GRABBIT_SECRET")]
    secret: Option<String>,

    /// Enable JSON log format
    #[arg(long, env = "GRABBIT_LOG_JSON", default_value = "false")]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the dashboard and API server (default)
    Serve,
    /// Import a plain-text list, one item per line
    Import {
        /// Text file to read
        path: PathBuf,
        /// Source tag recorded on imported items
        #[arg(long, default_value = IMPORT_SOURCE)]
        source: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(args.log_json).context("failed to initialize logging")?;

    let config = AppConfig::new(args.data_dir.unwrap_or_else(AppConfig::default_data_dir));

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!("Starting Grabbit server");

            let state = AppState::initialize(config, args.secret).await?;
            grabbit::server::serve(&args.addr, Arc::new(state))
                .await
                .with_context(|| format!("server on {} failed", args.addr))?;
        }
        Command::Import { path, source } => {
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {:?}", path))?;

            let grabbit = app::open_grabbit(&config).await?;
            let response = grabbit.import_list(&content, &source).await?;

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
