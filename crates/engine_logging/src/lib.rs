#![deny(missing_docs)]
//! Shared logging utilities for the picker workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Callers must depend on
//! the `log` crate themselves, since the macros expand to `log::*!` calls.

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Records that a single entry left the candidate set, and why.
///
/// Every filtering stage reports removals through this macro so a run leaves a
/// uniform trail: `dropped "<entry>" at <stage>: <reason>`.
///
/// ```
/// # use engine_logging::engine_dropped;
/// engine_dropped!("format", "README.txt", "does not match '{}'", "pkg-*.tar.gz");
/// ```
#[macro_export]
macro_rules! engine_dropped {
    ($stage:expr, $entry:expr, $($reason:tt)*) => {{
        log::info!(
            "dropped {:?} at {}: {}",
            $entry,
            $stage,
            format_args!($($reason)*)
        );
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Trace in debug builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
