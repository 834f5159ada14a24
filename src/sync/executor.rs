//! Applies a diff to the replica tree
//!
//! Order is fixed: every delete, then every modify, then every create.
//! A failing operation is recorded and the pass continues with the rest.
//! Directories are created and removed entry by entry from the snapshot, and
//! each sync log line is written only once its entry has actually changed.

use crate::error::{Operation, SyncOperationError};
use crate::sync::diff::{Diff, Modification};
use crate::sync::fs::FileSystem;
use crate::sync::journal::Journal;
use crate::tree::node::FsEntry;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Outcome of one apply pass
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub deleted: usize,
    pub modified: usize,
    pub created: usize,
    pub errors: Vec<SyncOperationError>,
}

pub struct Executor<'a, F: FileSystem, J: Journal> {
    fs: &'a F,
    source_root: &'a Path,
    replica_root: &'a Path,
    journal: &'a mut J,
}

impl<'a, F: FileSystem, J: Journal> Executor<'a, F, J> {
    pub fn new(fs: &'a F, source_root: &'a Path, replica_root: &'a Path, journal: &'a mut J) -> Self {
        Self {
            fs,
            source_root,
            replica_root,
            journal,
        }
    }

    #[instrument(skip_all, fields(operations = diff.len()))]
    pub fn apply(mut self, diff: Diff) -> ApplyReport {
        let mut report = ApplyReport::default();

        for entry in &diff.deleted {
            if self.delete(entry, &mut report.errors) {
                report.deleted += 1;
            }
        }

        for modification in &diff.modified {
            match self.modify(modification) {
                Ok(()) => report.modified += 1,
                Err(e) => report.errors.push(failure(
                    Operation::Modify,
                    &modification.replica.relative_path,
                    e,
                )),
            }
        }

        for entry in &diff.created {
            if self.create(entry, &mut report.errors) {
                report.created += 1;
            }
        }

        debug!(
            deleted = report.deleted,
            modified = report.modified,
            created = report.created,
            failed = report.errors.len(),
            "Apply pass finished"
        );
        report
    }

    /// Remove an entry from the replica, children first
    ///
    /// Every failing entry is recorded under its own path. A directory with a
    /// failed child is left in place. Returns true if the whole subtree went.
    fn delete(&mut self, entry: &FsEntry, errors: &mut Vec<SyncOperationError>) -> bool {
        let (result, line) = match entry {
            FsEntry::File(file) => (
                self.fs.remove_file(&file.absolute_path),
                format!("Deleted file '{}'", file.relative_path.display()),
            ),
            FsEntry::Directory(dir) if dir.is_empty() => (
                self.fs.remove_empty_dir(&dir.absolute_path),
                format!("Deleted empty directory '{}'", dir.relative_path.display()),
            ),
            FsEntry::Directory(dir) => {
                let mut complete = true;
                for child in &dir.children {
                    complete &= self.delete(child, errors);
                }
                if !complete {
                    warn!(path = %dir.relative_path.display(), "Keeping directory with undeleted children");
                    return false;
                }
                (
                    self.fs.remove_empty_dir(&dir.absolute_path),
                    format!("Deleted directory '{}'", dir.relative_path.display()),
                )
            }
        };

        match result {
            Ok(()) => {
                self.record(line);
                true
            }
            Err(e) => {
                errors.push(failure(Operation::Delete, entry.relative_path(), e));
                false
            }
        }
    }

    /// Overwrite the replica file with the source file's bytes
    fn modify(&mut self, modification: &Modification) -> io::Result<()> {
        let content = self.fs.read_file(&modification.source.absolute_path)?;
        self.fs.write_file(&modification.replica.absolute_path, &content)?;
        self.record(format!(
            "Modified file '{}'",
            modification.replica.relative_path.display()
        ));
        Ok(())
    }

    /// Recreate a source-only entry in the replica, one primitive at a time
    ///
    /// Each line is logged as soon as its directory or file lands, so the log
    /// matches the replica even when a later child fails. Returns true if the
    /// whole subtree landed.
    fn create(&mut self, entry: &FsEntry, errors: &mut Vec<SyncOperationError>) -> bool {
        let relative = entry.relative_path();
        let replica_path = self.replica_path(relative);

        match entry {
            FsEntry::File(file) => {
                let source_path = self.source_path(relative);
                if let Err(e) = self.fs.copy_file(&source_path, &replica_path) {
                    errors.push(failure(Operation::Create, relative, e));
                    return false;
                }
                self.record(format!("Created file '{}'", file.relative_path.display()));
                true
            }
            FsEntry::Directory(dir) => {
                if let Err(e) = self.fs.create_dir(&replica_path) {
                    errors.push(failure(Operation::Create, relative, e));
                    return false;
                }
                if dir.is_empty() {
                    self.record(format!("Created empty directory '{}'", dir.relative_path.display()));
                } else {
                    self.record(format!("Created directory '{}'", dir.relative_path.display()));
                }

                let mut complete = true;
                for child in &dir.children {
                    complete &= self.create(child, errors);
                }
                complete
            }
        }
    }

    fn record(&mut self, line: String) {
        if let Err(e) = self.journal.append_line(&line) {
            warn!(error = %e, line = %line, "Failed to write sync log");
        }
    }

    fn source_path(&self, relative: &Path) -> PathBuf {
        self.source_root.join(relative)
    }

    fn replica_path(&self, relative: &Path) -> PathBuf {
        self.replica_root.join(relative)
    }
}

fn failure(operation: Operation, relative_path: &Path, source: io::Error) -> SyncOperationError {
    let error = SyncOperationError {
        operation,
        relative_path: relative_path.to_path_buf(),
        source,
    };
    warn!(error = %error, "Sync operation failed");
    error
}
