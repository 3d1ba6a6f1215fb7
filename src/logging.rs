//! Logging setup: verbosity flags -> `tracing` subscriber on stderr.
//!
//! stdout is reserved for tables and JSON payloads.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum LogLevel {
    Error = 0,
    Info = 1,
    Debug = 2,
    Trace = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    pub fn as_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// `-q` wins over `-v`; each `-v` raises the level once.
pub fn derive_level(verbose: u8, quiet: bool) -> LogLevel {
    if quiet {
        return LogLevel::Error;
    }
    match verbose {
        0 => LogLevel::Info,
        1 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
/// Calling it twice is harmless.
pub fn init_logging(level: LogLevel) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.as_filter().into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_beats_verbose() {
        assert_eq!(derive_level(3, true), LogLevel::Error);
    }

    #[test]
    fn verbosity_steps() {
        assert_eq!(derive_level(0, false), LogLevel::Info);
        assert_eq!(derive_level(1, false), LogLevel::Debug);
        assert_eq!(derive_level(2, false), LogLevel::Trace);
        assert_eq!(derive_level(9, false), LogLevel::Trace);
        assert!(LogLevel::Trace > LogLevel::Info);
    }

    #[test]
    fn filters() {
        assert_eq!(LogLevel::Debug.as_filter(), LevelFilter::DEBUG);
        assert_eq!(LogLevel::Error.as_str(), "error");
    }

    #[test]
    fn init_twice_is_ok() {
        init_logging(LogLevel::Error);
        init_logging(LogLevel::Debug);
    }
}
