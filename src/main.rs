// fichegen - product sheet generator client
//
// Terminal client for the product-sheet backend: generate products from an
// EAN barcode or a manual form, browse products and sheets, export them.
//
// Architecture:
// - API (reqwest): thin adapter over the backend's /api routes
// - Controller: session, tabs, collections and alerts; network work is
//   returned as detached futures and folded back in as outcomes
// - TUI (ratatui): renders controller state, spawns the futures
// - CLI (clap): the same operations, headless
// - Demo backend (axum): in-process mock for --demo and tests

mod api;
mod catalog;
mod cli;
mod config;
mod controller;
mod demo;
mod export;
mod form;
mod logging;
mod session;
mod theme;
mod tui;

use anyhow::Result;
use api::ApiClient;
use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, LoggingConfig};
use controller::Controller;
use demo::DemoBackend;
use logging::{LogBuffer, TuiLogLayer};
use session::{FileSessionStore, MemorySessionStore, SessionStore};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config management never touches the backend
    if let Some(Commands::Config {
        show,
        reset,
        edit,
        path,
    }) = cli.command
    {
        cli::handle_config(show, reset, edit, path);
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    if cli.demo {
        config.demo_mode = true;
    }

    let tui_mode = cli.command.is_none() && config.enable_tui;
    let log_buffer = LogBuffer::new();

    // The guard must live until exit so buffered file logs flush
    let _file_guard = init_logging(&config.logging, tui_mode, &log_buffer);

    // Demo backend runs on this runtime for the whole session
    let demo = if config.demo_mode {
        Some(DemoBackend::spawn().await?)
    } else {
        None
    };
    let backend_url = demo
        .as_ref()
        .map(|d| d.base_url())
        .unwrap_or_else(|| config.backend_url.clone());
    tracing::info!("fichegen {} using backend {}", config::VERSION, backend_url);

    let store = session_store(demo.is_some());
    let mut controller = Controller::new(
        ApiClient::new(&backend_url),
        store,
        config.controller_settings(),
    );

    match cli.command {
        Some(command) => cli::run(command, &mut controller, demo.is_some()).await,
        None if tui_mode => tui::run_tui(controller, log_buffer, config).await,
        None => {
            eprintln!("FICHEGEN_NO_TUI is set: pass a subcommand (see `fichegen --help`)");
            Ok(())
        }
    }
}

/// Demo sessions never touch the user's stored session
fn session_store(demo: bool) -> Arc<dyn SessionStore> {
    if demo {
        return Arc::new(MemorySessionStore::default());
    }
    match FileSessionStore::default_path() {
        Some(path) => Arc::new(FileSessionStore::new(path)),
        None => {
            tracing::warn!("No home directory: session will not persist");
            Arc::new(MemorySessionStore::default())
        }
    }
}

/// Initialize tracing
///
/// In TUI mode logs go to the in-memory buffer (stderr would garble the
/// display); otherwise to stderr. File logging adds a JSON layer on top.
/// Precedence: RUST_LOG > FICHEGEN_LOG_LEVEL > config file > "info".
fn init_logging(
    logging: &LoggingConfig,
    tui_mode: bool,
    log_buffer: &LogBuffer,
) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive()));

    let tui_layer = tui_mode.then(|| TuiLogLayer::new(log_buffer.clone()));
    let stderr_layer =
        (!tui_mode).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let mut guard = None;
    let file_layer = if logging.file_enabled {
        match std::fs::create_dir_all(&logging.file_dir) {
            Ok(()) => {
                let appender = logging
                    .file_rotation
                    .appender(&logging.file_dir, &logging.file_prefix);
                let (non_blocking, file_guard) = tracing_appender::non_blocking(appender);
                guard = Some(file_guard);
                Some(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    logging.file_dir, e
                );
                None
            }
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tui_layer)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}
