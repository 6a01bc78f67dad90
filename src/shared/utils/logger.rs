use log::info;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the logging system
/// Safe to call more than once; only the first call installs the logger.
pub fn init_logger() {
    INIT.call_once(|| {
        // `.env` may carry RUST_LOG for local runs
        dotenvy::dotenv().ok();

        let installed = env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info) // Default level
            .filter_module("number_core", log::LevelFilter::Debug)
            .filter_module("regex", log::LevelFilter::Warn)
            .parse_default_env()
            .format_timestamp_secs()
            .format_target(false)
            .format_module_path(false)
            .try_init();

        if installed.is_ok() {
            info!("Logging system initialized");
        }
    });
}

/// Structured logging helpers for the number pipeline
pub struct LogContext;

impl LogContext {
    /// Log a single rule application
    pub fn rule_applied(rule: &str, before: &str, after: &str) {
        if before != after {
            log::trace!("After {}: '{}' -> '{}'", rule, before, after);
        } else {
            log::trace!("After {}: '{}' (unchanged)", rule, after);
        }
    }

    /// Log a canonicalization that needed more than one pass
    pub fn extra_passes(input: &str, output: &str, passes: usize) {
        log::debug!(
            "Canonicalized '{}' to '{}' in {} passes",
            input,
            output,
            passes
        );
    }
}
