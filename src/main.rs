// Sayaç CRM - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Platform path and config.toml resolution
// 3. Logging initialisation (debug mode support)
// 4. Dispatch of the selected command against file-backed storage

mod cli;

// Re-export modules from the library crate so that `cli.rs` can use
// `crate::app::...`, `crate::core::...` etc.
pub use sayac_crm::app;
pub use sayac_crm::core;
pub use sayac_crm::platform;
pub use sayac_crm::util;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();

    // Paths and config come first so the configured log level applies.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (config, config_warnings) = platform::config::load_config(&platform_paths.config_dir);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "Sayaç CRM starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    // Storage directory: CLI override > config.toml > platform default
    let data_dir = cli
        .data_dir
        .clone()
        .or(config.data_dir)
        .unwrap_or(platform_paths.data_dir);
    let export_dir = config.export_dir.unwrap_or(platform_paths.export_dir);

    tracing::debug!(
        data = %data_dir.display(),
        export = %export_dir.display(),
        "Storage resolved"
    );

    let ctx = cli::Context {
        backend: platform::storage::FileStorage::new(data_dir),
        export_dir,
    };

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout().lock();

    if let Err(e) = cli::run(cli.command, ctx, &mut input, &mut out) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
