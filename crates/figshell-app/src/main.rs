mod app_state;
mod cli;
mod dialogs;
mod manager;

use figshell_common::ConfigError;
use figshell_config::ShellConfig;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

/// Load config from `--config` when given, else the default location.
/// A broken file yields the defaults plus the error to report once logging
/// is up.
fn load_config(args: &cli::Args) -> (ShellConfig, Option<ConfigError>) {
    let loaded = match &args.config {
        Some(path) => figshell_config::load_config_from(path),
        None => figshell_config::load_config(),
    };
    match loaded {
        Ok(config) => (config, None),
        Err(e) => (ShellConfig::default(), Some(e)),
    }
}

fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    // Config comes first so `logging.level` can seed the filter
    let (config, config_error) = load_config(&args);

    // Initialize logging
    let log_directive = args
        .log_level
        .as_deref()
        .unwrap_or(config.logging.level.directive());
    let directive: Directive = log_directive
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    tracing::info!("figshell v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    match config_error {
        Some(e) => tracing::warn!("Config load failed, using defaults: {e}"),
        None => tracing::info!(home = %config.app.home_url, "Config loaded"),
    }

    // Create event loop and run
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    let mut app = app_state::ShellApp::new(config, args.url);

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}
