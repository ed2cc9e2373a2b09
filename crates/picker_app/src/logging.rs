//! Terminal logging for the command line.

use log::LevelFilter;
use simplelog::{ColorChoice, Config, ConfigBuilder, TermLogger, TerminalMode};

/// Log level picked from the global flags. The most verbose flag wins.
pub fn level_for(quiet: bool, verbose: bool, debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Trace
    } else if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Installs a terminal logger. A second call is a no-op.
pub fn initialize(level: LevelFilter) {
    let _ = TermLogger::init(level, build_config(), terminal_mode(), ColorChoice::Auto);
}

/// Every level goes to stderr; stdout carries only the report.
fn terminal_mode() -> TerminalMode {
    TerminalMode::Stderr
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_verbose_flag_wins() {
        assert_eq!(level_for(false, false, false), LevelFilter::Info);
        assert_eq!(level_for(true, false, false), LevelFilter::Warn);
        assert_eq!(level_for(true, true, false), LevelFilter::Debug);
        assert_eq!(level_for(false, true, true), LevelFilter::Trace);
    }

    #[test]
    fn log_lines_stay_off_stdout() {
        assert!(matches!(terminal_mode(), TerminalMode::Stderr));
    }
}
