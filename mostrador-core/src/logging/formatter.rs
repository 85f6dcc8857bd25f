//! Log formatting options for different output styles

use crate::logging::LogLevel;
use std::collections::BTreeMap;

/// A structured log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Usually the module path
    pub target: String,
    pub fields: BTreeMap<String, String>,
    /// `file:line` when available and enabled
    pub location: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            level,
            message: message.into(),
            target: target.into(),
            fields: BTreeMap::new(),
            location: None,
        }
    }
}

/// How logs should be formatted
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// `{"timestamp":"...","level":"INFO","target":"...","message":"..."}`
    Json,
    /// `2024-01-15 10:30:00.000 INFO  [mostrador_core::session] Session started`
    Human,
    /// `timestamp=... level=INFO target=... message="..."`
    Logfmt,
}

impl LogFormat {
    pub fn format_entry(&self, entry: &LogEntry) -> String {
        match self {
            LogFormat::Json => format_json(entry),
            LogFormat::Human => format_human(entry),
            LogFormat::Logfmt => format_logfmt(entry),
        }
    }
}

fn level_name(level: LogLevel) -> String {
    format!("{:?}", level).to_uppercase()
}

fn format_json(entry: &LogEntry) -> String {
    let mut json = serde_json::Map::new();
    json.insert("timestamp".to_string(), entry.timestamp.to_rfc3339().into());
    json.insert("level".to_string(), level_name(entry.level).into());
    json.insert("target".to_string(), entry.target.clone().into());
    json.insert("message".to_string(), entry.message.clone().into());
    if let Some(location) = &entry.location {
        json.insert("location".to_string(), location.clone().into());
    }
    for (key, value) in &entry.fields {
        json.insert(key.clone(), value.clone().into());
    }

    serde_json::to_string(&json).unwrap_or_else(|_| "Failed to serialize log entry".to_string())
}

fn format_human(entry: &LogEntry) -> String {
    let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
    let mut line = format!(
        "{} {:5} [{}] {}",
        timestamp,
        level_name(entry.level),
        entry.target,
        entry.message
    );
    for (key, value) in &entry.fields {
        line.push_str(&format!(" {}={}", key, value));
    }
    if let Some(location) = &entry.location {
        line.push_str(&format!(" ({})", location));
    }
    line
}

fn format_logfmt(entry: &LogEntry) -> String {
    let mut parts = vec![
        format!("timestamp={}", entry.timestamp.to_rfc3339()),
        format!("level={}", level_name(entry.level)),
        format!("target={}", entry.target),
        format!("message=\"{}\"", entry.message.replace('"', "\\\"")),
    ];
    for (key, value) in &entry.fields {
        parts.push(format!("{}=\"{}\"", key, value.replace('"', "\\\"")));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> LogEntry {
        let mut entry = LogEntry::new(LogLevel::Warn, "Session \"rejected\"", "mostrador_core::api");
        entry.fields.insert("terminal".to_string(), "caja-3".to_string());
        entry
    }

    #[test]
    fn test_json_format() {
        let line = LogFormat::Json.format_entry(&entry());
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["terminal"], "caja-3");
        assert_eq!(value["message"], "Session \"rejected\"");
    }

    #[test]
    fn test_human_format() {
        let line = LogFormat::Human.format_entry(&entry());
        assert!(line.contains("WARN  [mostrador_core::api] Session \"rejected\" terminal=caja-3"));
    }

    #[test]
    fn test_logfmt_escapes_quotes() {
        let line = LogFormat::Logfmt.format_entry(&entry());
        assert!(line.contains(r#"message="Session \"rejected\"""#));
        assert!(line.ends_with(r#"terminal="caja-3""#));
    }
}
