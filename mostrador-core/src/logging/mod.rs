//! Mostrador logging
//!
//! Built on the standard `log` facade: library code only uses `log::info!`
//! and friends, and the host installs a logger once at startup.
//!
//! # Example
//!
//! ```rust,no_run
//! use mostrador_core::logging::{init_logging, LoggingConfig};
//!
//! let config = LoggingConfig::production().with_context_field("terminal", "caja-3");
//! init_logging(&config).unwrap();
//!
//! log::info!("Back office starting");
//! ```

pub mod config;
pub mod formatter;

pub use config::{LogLevel, LogOutput, LoggingConfig};
pub use formatter::{LogEntry, LogFormat};

use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Install the Mostrador logger
///
/// Only the first call has an effect; later calls return `Ok(())`.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = log::set_boxed_logger(Box::new(MostradorLogger::new(config.clone())))
            .map(|()| log::set_max_level(config.level.into()))
            .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e));
    });
    result
}

/// `log::Log` implementation writing formatted entries to stdout/stderr
struct MostradorLogger {
    config: LoggingConfig,
}

impl MostradorLogger {
    fn new(config: LoggingConfig) -> Self {
        Self { config }
    }

    fn entry(&self, record: &log::Record) -> LogEntry {
        let mut entry =
            LogEntry::new(record.level().into(), record.args().to_string(), record.target());
        entry.fields = self.config.context_fields.clone();
        if self.config.with_location {
            if let (Some(file), Some(line)) = (record.file(), record.line()) {
                entry.location = Some(format!("{}:{}", file, line));
            }
        }
        entry
    }
}

impl log::Log for MostradorLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        LogLevel::from(metadata.level()) <= self.config.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = self.config.format.format_entry(&self.entry(record));
        let _ = match self.config.output {
            LogOutput::Stdout => writeln!(std::io::stdout().lock(), "{}", line),
            LogOutput::Stderr => writeln!(std::io::stderr().lock(), "{}", line),
        };
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_level_filtering() {
        let logger = MostradorLogger::new(LoggingConfig::default());
        let debug = log::Metadata::builder().level(log::Level::Debug).build();
        let warn = log::Metadata::builder().level(log::Level::Warn).build();

        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&warn));
    }

    #[test]
    fn test_entry_carries_context_fields() {
        let config = LoggingConfig::development().with_context_field("terminal", "caja-1");
        let logger = MostradorLogger::new(config);
        let entry = logger.entry(
            &log::Record::builder()
                .args(format_args!("hola"))
                .level(log::Level::Info)
                .target("mostrador_core::session")
                .file(Some("session/manager.rs"))
                .line(Some(42))
                .build(),
        );
        assert_eq!(entry.message, "hola");
        assert_eq!(entry.fields["terminal"], "caja-1");
        assert_eq!(entry.location.as_deref(), Some("session/manager.rs:42"));
    }
}
