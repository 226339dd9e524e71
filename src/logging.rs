//! Logging setup for the command-line front end.
//!
//! The library only emits records through the `log` facade. The binary calls
//! [`init`] once at startup to route them to stderr with `env_logger`, so
//! diagnostics never mix with the selected/remaining listings on stdout.
//!
//! ## Levels
//!
//! - default: warnings and errors only (e.g. an encoding that failed to decode)
//! - `--verbose`: also `info` from this crate (records read, written, excluded)
//! - `RUST_LOG`: overrides both, e.g. `RUST_LOG=usamplex=debug` shows stage
//!   transitions
//!
//! ```no_run
//! usamplex::logging::init(false).expect("Failed to initialize logging");
//! log::warn!("shown by default");
//! ```

use log::LevelFilter;

/// Environment variable consulted for filter directives.
pub const LOG_ENV: &str = "RUST_LOG";

/// Default filter directives for the given verbosity.
pub fn default_filter(verbose: bool) -> String {
    if verbose {
        format!("warn,{}=info", env!("CARGO_CRATE_NAME"))
    } else {
        LevelFilter::Warn.to_string().to_lowercase()
    }
}

/// Initializes stderr logging.
///
/// # Errors
///
/// Returns error if a global logger was already installed.
pub fn init(verbose: bool) -> Result<(), log::SetLoggerError> {
    let env = env_logger::Env::new().filter_or(LOG_ENV, default_filter(verbose));

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "warn");
        assert_eq!(default_filter(true), "warn,usamplex=info");
    }

    #[test]
    fn test_second_init_fails() {
        let _first = init(false);
        assert!(init(false).is_err(), "a logger is already installed");
    }
}
