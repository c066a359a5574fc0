//! Jotter Binary Entry Point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use jotter_cli::{run_session, App};
use jotter_core::{JotterConfig, NotesEngine};
use tokio::io::BufReader;

#[derive(Debug, Parser)]
#[command(name = "jotter", version, about = "Terminal client for a remote notes service")]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Notes service base URL; overrides the config file and environment
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match JotterConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("failed to read {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => JotterConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
    }

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    let engine = match NotesEngine::connect(&config) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("cannot use base URL {}: {}", config.api.base_url, e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("using notes service at {}", config.api.base_url);

    let mut app = App::new(engine, &config);
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    match run_session(&mut app, stdin, stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("terminal I/O failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
