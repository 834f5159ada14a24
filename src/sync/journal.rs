//! Sync log: the user-facing, append-only record of applied operations
//!
//! One `FileJournal` is opened per sync batch. Writes are buffered and
//! flushed when it is dropped, so the batch reaches disk on every exit path.

use crate::error::SyncError;
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Header timestamp format: `DD/MM/YYYY HH:MM:SS`
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Line sink for sync log messages
pub trait Journal {
    /// Append one line; the sink adds the trailing newline
    fn append_line(&mut self, line: &str) -> io::Result<()>;
}

/// Format the batch header line
pub fn batch_header(at: &DateTime<Local>) -> String {
    format!("Sync {}", at.format(TIMESTAMP_FORMAT))
}

/// Appends to the sync log file and optionally mirrors every line to stdout
#[derive(Debug)]
pub struct FileJournal {
    path: PathBuf,
    file: BufWriter<File>,
    mirror: bool,
}

impl FileJournal {
    pub fn open(path: &Path, mirror: bool) -> Result<Self, SyncError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| SyncError::Journal {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            file: BufWriter::new(file),
            mirror,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Journal for FileJournal {
    fn append_line(&mut self, line: &str) -> io::Result<()> {
        if self.mirror {
            println!("{}", line);
        }
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")
    }
}

impl Drop for FileJournal {
    fn drop(&mut self) {
        if let Err(e) = self.file.flush() {
            warn!(path = %self.path.display(), error = %e, "Failed to flush sync log");
        }
    }
}

/// In-memory journal
#[derive(Debug, Default, Clone)]
pub struct MemoryJournal {
    pub lines: Vec<String>,
}

impl Journal for MemoryJournal {
    fn append_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}
