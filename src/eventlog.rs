use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use colored::{ColoredString, Colorize};
use parking_lot::Mutex;

/// Event categories, one per log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Info,
    Connect,
    Liveness,
    Stats,
    Points,
    Error,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Info => "INFO",
            EventKind::Connect => "CONNECT",
            EventKind::Liveness => "LIVENESS",
            EventKind::Stats => "STATS",
            EventKind::Points => "POINTS",
            EventKind::Error => "ERROR",
        }
    }

    /// Colorized `[KIND]` tag for the console line.
    fn tag(self) -> ColoredString {
        let label = format!("[{}]", self.as_str());
        match self {
            EventKind::Info => label.cyan(),
            EventKind::Connect => label.green(),
            EventKind::Liveness => label.blue(),
            EventKind::Stats => label.magenta(),
            EventKind::Points => label.yellow(),
            EventKind::Error => label.red(),
        }
    }
}

/// Append-only event log shared by every account.
///
/// Each event produces one colorized console line on stdout and one flat line
/// in the log file: `[ISO-timestamp] [EVENT-TYPE] [account-label] message`.
/// The file handle lives behind a mutex and every write is a single complete
/// line, so concurrent accounts never interleave partial records. Opened at
/// startup, flushed at shutdown.
pub struct EventLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl EventLog {
    /// Open the log file for appending, creating it if missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open event log {}", path.display()))?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Record one event. File write failures are swallowed; the console line
    /// already carries the event and the log stream must never take the
    /// process down.
    pub fn record(&self, kind: EventKind, label: &str, message: &str) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        println!("[{timestamp}] [{label}] {} {message}", kind.tag());

        let line = format!("[{timestamp}] [{}] [{label}] {message}\n", kind.as_str());
        let mut file = self.file.lock();
        let _ = file.write_all(line.as_bytes());
    }

    /// Flush buffered writes; called once at shutdown.
    pub fn flush(&self) -> Result<()> {
        self.file
            .lock()
            .flush()
            .with_context(|| format!("failed to flush event log {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn records_append_one_line_per_event() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("events.log");
        let log = EventLog::open(&path).expect("open");

        log.record(EventKind::Connect, "Account abcdef1234...", "Success for ext-1");
        log.record(EventKind::Error, "Account abcdef1234...", "Failed to connect: boom");
        log.flush().expect("flush");

        let contents = std::fs::read_to_string(&path).expect("read log");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let shape = Regex::new(
            r"^\[\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z\] \[[A-Z]+\] \[[^\]]+\] .+$",
        )
        .unwrap();
        assert!(shape.is_match(lines[0]), "unexpected line: {}", lines[0]);
        assert!(lines[0].contains("[CONNECT] [Account abcdef1234...] Success for ext-1"));
        assert!(lines[1].contains("[ERROR] [Account abcdef1234...] Failed to connect: boom"));
    }

    #[test]
    fn reopening_appends_instead_of_truncating() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("events.log");

        {
            let log = EventLog::open(&path).expect("open");
            log.record(EventKind::Info, "startup", "first run");
            log.flush().expect("flush");
        }
        {
            let log = EventLog::open(&path).expect("reopen");
            log.record(EventKind::Info, "startup", "second run");
            log.flush().expect("flush");
        }

        let contents = std::fs::read_to_string(&path).expect("read log");
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(EventKind::Connect.as_str(), "CONNECT");
        assert_eq!(EventKind::Liveness.as_str(), "LIVENESS");
        assert_eq!(EventKind::Stats.as_str(), "STATS");
        assert_eq!(EventKind::Points.as_str(), "POINTS");
        assert_eq!(EventKind::Error.as_str(), "ERROR");
        assert_eq!(EventKind::Info.as_str(), "INFO");
    }
}
