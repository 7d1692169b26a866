//! Logging setup.
//!
//! User-facing output is printed directly; the `log` facade carries
//! diagnostics (paths, byte counts, install decisions) to stderr.

use std::io::Write;

fn default_level(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

/// Initialize `env_logger`. `RUST_LOG` takes precedence over the flags.
pub fn init_logging(verbose: bool, quiet: bool) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level(verbose, quiet)),
    )
    .format(|buf, record| {
        let label = match record.level() {
            log::Level::Error => "ERROR",
            log::Level::Warn => "WARN ",
            log::Level::Info => "INFO ",
            log::Level::Debug => "DEBUG",
            log::Level::Trace => "TRACE",
        };
        writeln!(buf, "[{label}] {}", record.args())
    })
    .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(false, false), "warn");
        assert_eq!(default_level(true, false), "debug");
        assert_eq!(default_level(false, true), "error");
        assert_eq!(default_level(true, true), "debug");
    }
}
