//! Append-only conversation audit trail.
//!
//! Each [`ConversationLogEntry`] is written as one JSON line to
//! `<dir>/<YYYY-MM-DD>.jsonl`, where the date is taken from the entry's own
//! timestamp. The directory and file are created on demand. Files are never
//! rewritten, rotated, or deleted here.
//!
//! Appends from concurrent requests are serialized through a mutex so that
//! lines never interleave.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::models::ConversationLogEntry;

pub struct ConversationLogger {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl ConversationLogger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the day file an entry is appended to.
    pub fn file_for(&self, entry: &ConversationLogEntry) -> PathBuf {
        self.dir
            .join(format!("{}.jsonl", entry.timestamp.format("%Y-%m-%d")))
    }

    /// Append `entry` to its day file.
    pub fn record(&self, entry: &ConversationLogEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry).context("Failed to encode log entry")?;
        line.push('\n');
        let path = self.file_for(entry);

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("conversation log lock poisoned"))?;

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create log directory: {}", self.dir.display()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("Failed to append to log file: {}", path.display()))?;

        Ok(())
    }
}
