// Sayaç CRM - util/logging.rs
//
// Structured logging for a one-shot command-line tool.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or any EnvFilter directive)
//   - CLI flag: --debug
//   - Config file: [logging] level = "debug"
//
// Output: stderr, so stdout stays reserved for tables and export payloads.
// Default output is warnings only and carries no timestamps; source
// locations and targets appear only when debugging.
// Never logs contact names, phone numbers, or other lead PII at any level.

use super::constants::{DEFAULT_LOG_LEVEL, VALID_LOG_LEVELS};
use tracing_subscriber::EnvFilter;

/// Initialise the logging subsystem.
///
/// Priority: RUST_LOG > `--debug` > config level > warn.
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    let from_env = EnvFilter::try_from_default_env().ok();
    let verbose = debug_flag || from_env.is_some();
    let filter = from_env.unwrap_or_else(|| EnvFilter::new(pick_level(debug_flag, config_level)));

    // `try_init` so a second call (e.g. from tests) is a no-op instead of a panic.
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(verbose)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .try_init();

    if result.is_ok() {
        tracing::debug!(
            app = super::constants::APP_NAME,
            version = super::constants::APP_VERSION,
            "Logging initialised"
        );
    }
}

/// Level used when RUST_LOG does not decide. An unknown config level falls
/// back to the default; config loading has already warned about it.
fn pick_level(debug_flag: bool, config_level: Option<&str>) -> &str {
    if debug_flag {
        return "debug";
    }
    config_level
        .filter(|level| VALID_LOG_LEVELS.contains(level))
        .unwrap_or(DEFAULT_LOG_LEVEL)
}
