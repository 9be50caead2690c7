//! User-facing output.

use camino::Utf8PathBuf;
use std::sync::Mutex;

/// Receives the messages a run reports to the user.
pub trait Alerts: Send + Sync {
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn notice(&self, message: &str);
    fn success(&self, message: &str);
}

/// Writes errors and warnings to stderr, everything else to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleAlerts;

impl Alerts for ConsoleAlerts {
    fn error(&self, message: &str) {
        eprintln!("{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("{message}");
    }

    fn notice(&self, message: &str) {
        println!("{message}");
    }

    fn success(&self, message: &str) {
        println!("{message}");
    }
}

/// Severity of a recorded alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Error,
    Warn,
    Notice,
    Success,
}

/// Keeps every alert in memory.
#[derive(Debug, Default)]
pub struct RecordingAlerts {
    entries: Mutex<Vec<(AlertLevel, String)>>,
}

impl RecordingAlerts {
    /// Returns all alerts in the order they were raised.
    pub fn entries(&self) -> Vec<(AlertLevel, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Returns the messages raised at `level`.
    pub fn messages(&self, level: AlertLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    fn record(&self, level: AlertLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

impl Alerts for RecordingAlerts {
    fn error(&self, message: &str) {
        self.record(AlertLevel::Error, message);
    }

    fn warn(&self, message: &str) {
        self.record(AlertLevel::Warn, message);
    }

    fn notice(&self, message: &str) {
        self.record(AlertLevel::Notice, message);
    }

    fn success(&self, message: &str) {
        self.record(AlertLevel::Success, message);
    }
}

/// Summary of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CheckSummary {
    /// Number of files processed.
    pub file_count: usize,
    /// Files whose declarations are out of date, in path order.
    pub failed: Vec<Utf8PathBuf>,
}

impl CheckSummary {
    /// Returns true if no file failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
