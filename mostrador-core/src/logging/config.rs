//! Logging configuration structures for declarative setup

use crate::logging::LogFormat;
use std::collections::BTreeMap;

/// Where log lines are written
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
}

/// Main logging configuration
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Minimum log level to capture
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Include source file and line
    pub with_location: bool,
    /// Context fields added to every log entry
    pub context_fields: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Human,
            output: LogOutput::Stderr,
            with_location: false,
            context_fields: BTreeMap::new(),
        }
    }
}

/// Log levels in order of severity (compatible with standard log crate)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Trace => LogLevel::Trace,
        }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl LoggingConfig {
    /// JSON lines on stdout, info and above
    pub fn production() -> Self {
        Self { format: LogFormat::Json, output: LogOutput::Stdout, ..Self::default() }
    }

    /// Human-readable, debug and above, with source locations
    pub fn development() -> Self {
        Self { level: LogLevel::Debug, with_location: true, ..Self::default() }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Add a field to every log entry (e.g. the terminal or branch id)
    pub fn with_context_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_fields.insert(key.into(), value.into());
        self
    }
}
