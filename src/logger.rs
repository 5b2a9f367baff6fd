//! Custom logging module.
//!
//! This module provides a logger implementation that formats entries with a
//! UTC timestamp and forwards them to a callback, which the terminal shell
//! uses to fill its log panel.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Arc, Mutex};

type LogCallback = Box<dyn Fn(String) + Send + Sync>;

/// Format a log record into a string for display
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!("{} {} {}", timestamp, level_str, record.args())
}

/// Logger that hands formatted entries to a callback
///
pub struct CustomLogger {
    level: LevelFilter,
    log_callback: Arc<Mutex<Option<LogCallback>>>,
}

impl Default for CustomLogger {
    fn default() -> Self {
        CustomLogger::new()
    }
}

impl CustomLogger {
    pub fn new() -> Self {
        CustomLogger {
            level: LevelFilter::Info,
            log_callback: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn set_log_callback(&self, callback: LogCallback) {
        // A poisoned lock only loses the panel feed.
        if let Ok(mut guard) = self.log_callback.lock() {
            *guard = Some(callback);
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(callback) = self.log_callback.lock() {
            if let Some(ref cb) = *callback {
                cb(format_log(record));
            }
        }
    }

    fn flush(&self) {}
}

/// Shared buffer of formatted log lines, newest last.
///
#[derive(Debug, Clone)]
pub struct LogBuffer {
    entries: Arc<Mutex<Vec<String>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        LogBuffer {
            entries: Arc::new(Mutex::new(Vec::new())),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&self, line: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(line);
            let overflow = entries.len().saturating_sub(self.capacity);
            if overflow > 0 {
                entries.drain(..overflow);
            }
        }
    }

    /// The most recent `count` lines.
    ///
    pub fn tail(&self, count: usize) -> Vec<String> {
        match self.entries.lock() {
            Ok(entries) => {
                let start = entries.len().saturating_sub(count);
                entries[start..].to_vec()
            }
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_log() {
        let line = format_log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("edge lost"))
                .build(),
        );
        assert!(line.ends_with(" WARN edge lost"));
    }

    #[test]
    fn test_logger_filters_and_forwards() {
        let buffer = LogBuffer::new(10);
        let sink = buffer.clone();
        let logger = CustomLogger::new().with_level(LevelFilter::Info);
        logger.set_log_callback(Box::new(move |line| sink.push(line)));

        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("hidden"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("shown"))
                .build(),
        );
        let lines = buffer.tail(10);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("INFO shown"));
    }

    #[test]
    fn test_buffer_keeps_newest() {
        let buffer = LogBuffer::new(2);
        buffer.push("a".to_string());
        buffer.push("b".to_string());
        buffer.push("c".to_string());
        assert_eq!(buffer.tail(5), vec!["b".to_string(), "c".to_string()]);
        assert_eq!(buffer.tail(1), vec!["c".to_string()]);
    }
}
