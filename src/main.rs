//! bookdl - Entry Point

use bookdl::provider::{LibgenProvider, LinkResolver, RowPolicy, SearchSession};
use bookdl::transfer::HttpTransfer;
use bookdl::view::{AppServices, TuiError};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// bookdl - search a book catalog and download results from the terminal
#[derive(Parser, Debug)]
#[command(name = "bookdl")]
#[command(version)]
#[command(about = "Interactive terminal client for catalog search and background downloads")]
pub struct Args {
    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = bookdl::config::load_config_with_precedence(args.config.clone())?;
        let merged = bookdl::config::merge_config(config_file);
        let with_env = bookdl::config::apply_env_overrides(merged);
        let no_color_override = args.no_color.then_some(true);
        bookdl::config::apply_cli_overrides(with_env, no_color_override)
    };

    // Keep the guard alive so buffered log lines are flushed at exit.
    let _log_guard = bookdl::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(TuiError::Runtime)?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(TuiError::HttpClient)?;

    let provider = LibgenProvider::new(
        client.clone(),
        config.catalog_base_url.clone(),
        config.results_per_page,
    );
    let policy = RowPolicy {
        head_skip: config.head_skip,
        max_rows: config.max_rows,
    };
    let services = AppServices {
        search: SearchSession::new(
            Arc::new(provider),
            LinkResolver::new(config.mirror_base_url.clone()),
            policy,
        ),
        transfer: Arc::new(HttpTransfer::new(client)),
    };

    let result = bookdl::view::run_app(&config, services, runtime.handle().clone());

    // Transfers still running are cancelled, not awaited.
    runtime.shutdown_background();
    info!("Session ended");

    result?;
    Ok(())
}
