//! Entry point for the speed reader.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Point the document library at the configured cache directory.
//! - Import a file given on the command line, then launch the GUI.

mod app;

use crate::app::run_app;
use anyhow::{Context, Result, anyhow};
use rsvp_core::config::load_config;
use rsvp_core::library::{self, import_document};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

pub(crate) const CONFIG_PATH: &str = "conf/config.toml";

static SIGINT_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Returns true once per Ctrl+C received by the process.
pub(crate) fn take_sigint_requested() -> bool {
    SIGINT_REQUESTED.swap(false, Ordering::SeqCst)
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let initial_path = parse_args()?;
    let config = load_config(Path::new(CONFIG_PATH));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        level = %config.log_level,
        wpm = config.wpm,
        theme = %config.theme,
        "Starting speed reader"
    );

    let library = library::init_global(Path::new(&config.cache_dir).join("library"));

    let initial_document = match initial_path {
        Some(path) => {
            let document = import_document(library, &path)
                .with_context(|| format!("Failed to import {}", path.display()))?;
            info!(path = %path.display(), id = %document.id, "Opening document from command line");
            Some(document.id)
        }
        None => None,
    };

    if let Err(err) = ctrlc::set_handler(|| {
        info!("Received Ctrl+C; closing reading session");
        SIGINT_REQUESTED.store(true, Ordering::SeqCst);
    }) {
        warn!("Failed to install Ctrl+C signal handler: {err}");
    }

    run_app(config, initial_document).context("Failed to start the GUI")?;
    Ok(())
}

fn parse_args() -> Result<Option<PathBuf>> {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        return Ok(None);
    };

    let path = PathBuf::from(path);
    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.as_path().display()));
    }
    Ok(Some(path))
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
