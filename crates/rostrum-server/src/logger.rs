//! Logging setup on the `tracing` ecosystem.
//!
//! Verbosity comes from the command line: `--verbose` for debug output,
//! `--quiet` for errors only. Without either flag the `RUST_LOG`
//! environment variable is honored, falling back to info level for the
//! rostrum crates.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Call once at startup before anything logs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("rostrum_server=debug,rostrum_engine=debug")
    } else if quiet {
        EnvFilter::new("rostrum_server=error,rostrum_engine=error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("rostrum_server=info,rostrum_engine=info"))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Check if colored output should be enabled.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise terminal capabilities
/// decide.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::Term::stdout().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // The subscriber is global and can only be installed once per process,
    // so these tests only cover the pieces that are inspectable.

    #[test]
    #[serial]
    fn test_no_color_disables_colors() {
        std::env::set_var("NO_COLOR", "1");
        assert!(!should_use_colors());
        std::env::remove_var("NO_COLOR");
    }

    #[test]
    #[serial]
    fn test_force_color_enables_colors() {
        std::env::remove_var("NO_COLOR");
        std::env::set_var("FORCE_COLOR", "1");
        assert!(should_use_colors());
        std::env::remove_var("FORCE_COLOR");
    }

    #[test]
    fn test_filters_parse() {
        let _ = EnvFilter::new("rostrum_server=debug,rostrum_engine=debug");
        let _ = EnvFilter::new("rostrum_server=error,rostrum_engine=error");
    }
}
