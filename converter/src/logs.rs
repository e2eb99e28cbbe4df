//! Console logging for conversion runs.
//!
//! Every entry is printed to stdout and broadcast on a channel, so an
//! embedding program can follow a run (or a test can inspect it) by
//! subscribing to [`LOG_BROADCASTER`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Number of entries a slow subscriber may lag behind before losing some.
const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting level for display
    #[serde(default)]
    pub indent: u8,
    /// Physical spreadsheet row the entry is about, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl LogEntry {
    fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            indent: 0,
            row: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    pub fn for_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Console rendering of the entry.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        match self.row {
            Some(row) => format!("{}{} [row {}] {}", indent, prefix, row, self.message),
            None => format!("{}{} {}", indent, prefix, self.message),
        }
    }
}

/// Global log broadcaster
pub static LOG_BROADCASTER: Lazy<LogBroadcaster> = Lazy::new(LogBroadcaster::new);

pub struct LogBroadcaster {
    sender: broadcast::Sender<LogEntry>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Print an entry and send it to all subscribers
    pub fn log(&self, entry: LogEntry) {
        println!("{}", entry.render());

        // No subscribers is the normal case for the CLI
        let _ = self.sender.send(entry);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

pub fn log_info(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::error(msg));
}

pub fn log_warning_indent(msg: impl Into<String>, indent: u8) {
    LOG_BROADCASTER.log(LogEntry::warning(msg).with_indent(indent));
}

/// Row-scoped variants used by the batch driver
pub fn log_row_info(row: usize, msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::info(msg).for_row(row).with_indent(1));
}

pub fn log_row_warning(row: usize, msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::warning(msg).for_row(row).with_indent(1));
}
