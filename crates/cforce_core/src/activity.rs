use std::collections::VecDeque;

/// Number of most recent entries the activity log retains.
pub const LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSeverity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Local wall-clock time, `HH:MM:SS`.
    pub timestamp: String,
    pub message: String,
    pub severity: LogSeverity,
}

/// User-facing activity log: bounded, arrival-ordered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
}

impl ActivityLog {
    pub fn push(&mut self, message: impl Into<String>, severity: LogSeverity) {
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        self.push_entry(LogEntry {
            timestamp,
            message: message.into(),
            severity,
        });
    }

    pub fn push_entry(&mut self, entry: LogEntry) {
        while self.entries.len() >= LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}
