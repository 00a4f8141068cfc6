//! # Stdout log writer (feature: `logging`).
//!
//! A minimal [`log::Log`] backend for hosts that do not bring their own:
//! each record is prefixed with the wall-clock time elapsed since the
//! writer was installed, as `mm:ss.mmm`.
//!
//! ```text
//! 00:02.150 [WARN ] tickwork::values::promise: timed promise #7 expired ...
//! ```
//!
//! Install it once, early:
//! ```no_run
//! tickwork::logger::init(log::LevelFilter::Info).ok();
//! ```

use std::io::Write;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Elapsed-time-prefixed stdout logger.
pub struct StdoutLogger {
    start: Instant,
    max_level: LevelFilter,
}

impl StdoutLogger {
    pub fn new(max_level: LevelFilter) -> Self {
        Self {
            start: Instant::now(),
            max_level,
        }
    }

    fn prefix(&self) -> String {
        let elapsed = self.start.elapsed();
        let total = elapsed.as_secs();
        format!(
            "{:02}:{:02}.{:03}",
            total / 60,
            total % 60,
            elapsed.subsec_millis()
        )
    }
}

impl Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut out = std::io::stdout().lock();
        let _ = writeln!(
            out,
            "{} [{:<5}] {}: {}",
            self.prefix(),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

/// Installs a [`StdoutLogger`] as the global logger.
///
/// # Errors
/// [`SetLoggerError`] if a global logger is already installed.
pub fn init(max_level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(StdoutLogger::new(max_level)))?;
    log::set_max_level(max_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_shape() {
        let logger = StdoutLogger::new(LevelFilter::Trace);
        let prefix = logger.prefix();
        assert_eq!(prefix.len(), 9);
        assert_eq!(&prefix[2..3], ":");
        assert_eq!(&prefix[5..6], ".");
    }

    #[test]
    fn test_level_gating() {
        let logger = StdoutLogger::new(LevelFilter::Warn);
        let warn = Metadata::builder().level(log::Level::Warn).build();
        let debug = Metadata::builder().level(log::Level::Debug).build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&debug));
    }
}
