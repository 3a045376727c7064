/// Backend logger: env_logger filtering and stderr output, plus a bounded
/// in-memory ring (served at /logs) and an optional append-only log file.
use env_logger::Logger;
use log::{Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex};

const MAX_LOG_ENTRIES: usize = 1000;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp_ms: u64,
    pub level: String,
    pub target: String,
    pub message: String,
}

static RECENT: LazyLock<Mutex<VecDeque<LogEntry>>> =
    LazyLock::new(|| Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES)));

struct LogFile {
    path: PathBuf,
    file: File,
}

static LOG_FILE: LazyLock<Mutex<Option<LogFile>>> = LazyLock::new(|| Mutex::new(None));

fn push_recent(entry: LogEntry) {
    if let Ok(mut entries) = RECENT.lock() {
        entries.push_back(entry);
        while entries.len() > MAX_LOG_ENTRIES {
            entries.pop_front();
        }
    }
}

fn append_to_file(entry: &LogEntry) {
    let Ok(mut guard) = LOG_FILE.lock() else {
        return;
    };
    if let Some(log_file) = guard.as_mut() {
        let line = format!(
            "{} [{}] [{}] {}\n",
            entry.timestamp_ms,
            entry.level.to_uppercase(),
            entry.target,
            entry.message.replace('\n', "\\n")
        );
        let _ = log_file.file.write_all(line.as_bytes());
        let _ = log_file.file.flush();
    }
}

struct BackendLogger {
    inner: Logger,
}

impl Log for BackendLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let entry = LogEntry {
            timestamp_ms,
            level: record.level().to_string().to_lowercase(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };

        append_to_file(&entry);
        push_recent(entry);
        self.inner.log(record);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the logger. Filter comes from RUST_LOG, default `info`.
pub fn init() -> Result<(), SetLoggerError> {
    let logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .build();
    let max_level = logger.filter();
    let logger = Box::leak(Box::new(BackendLogger { inner: logger }));
    log::set_logger(logger)?;
    log::set_max_level(max_level);
    Ok(())
}

/// Start mirroring entries into `path` (created with its parent dirs).
pub fn attach_file(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut guard = LOG_FILE.lock().unwrap_or_else(|e| e.into_inner());
    *guard = Some(LogFile {
        path: path.to_path_buf(),
        file,
    });
    Ok(())
}

pub fn recent_entries() -> Vec<LogEntry> {
    RECENT
        .lock()
        .map(|entries| entries.iter().cloned().collect())
        .unwrap_or_default()
}

pub fn log_file_path() -> Option<String> {
    LOG_FILE
        .lock()
        .ok()
        .and_then(|guard| guard.as_ref().map(|f| f.path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_is_bounded() {
        for i in 0..(MAX_LOG_ENTRIES + 10) {
            push_recent(LogEntry {
                timestamp_ms: i as u64,
                level: "info".to_string(),
                target: "test".to_string(),
                message: format!("entry {}", i),
            });
        }
        let entries = recent_entries();
        assert_eq!(entries.len(), MAX_LOG_ENTRIES);
        assert_eq!(entries.last().unwrap().message, format!("entry {}", MAX_LOG_ENTRIES + 9));
    }
}
