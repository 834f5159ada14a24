//! Snapshot builder for constructing hashed directory trees

use crate::error::{Operation, SyncError, SyncOperationError};
use crate::sync::fs::FileSystem;
use crate::tree::hasher::{self, DigestAlgorithm};
use crate::tree::node::{DirectoryEntry, FileEntry, FsEntry};
use crate::types::{Hash, ROOT_SENTINEL};
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, trace, warn};

/// A hashed, root-normalized view of one directory tree
#[derive(Debug)]
pub struct Snapshot {
    pub root: DirectoryEntry,
    /// Entries that could not be read; their names are skipped by the diff
    pub errors: Vec<SyncOperationError>,
}

impl Snapshot {
    /// Root hash after normalization; equal for content-identical trees
    pub fn root_hash(&self) -> Hash {
        self.root.hash
    }

    /// Number of entries below the root
    pub fn entry_count(&self) -> usize {
        self.root.children.iter().map(FsEntry::entry_count).sum()
    }

    pub fn into_root(self) -> DirectoryEntry {
        self.root
    }

    pub fn into_parts(self) -> (DirectoryEntry, Vec<SyncOperationError>) {
        (self.root, self.errors)
    }
}

/// Builds a `Snapshot` by walking a directory through a `FileSystem`
pub struct SnapshotBuilder<'a, F: FileSystem> {
    fs: &'a F,
    algorithm: DigestAlgorithm,
}

impl<'a, F: FileSystem> SnapshotBuilder<'a, F> {
    pub fn new(fs: &'a F, algorithm: DigestAlgorithm) -> Self {
        Self { fs, algorithm }
    }

    /// Walk `root` and hash it bottom-up
    ///
    /// The returned root is renamed to the shared sentinel and rehashed so that
    /// two trees rooted at different paths compare by content only. Only an
    /// unreadable root fails the build; unreadable entries below it are
    /// recorded in `Snapshot::errors` and skipped.
    #[instrument(skip(self), fields(root = %root.display(), algorithm = %self.algorithm))]
    pub fn build(&self, root: &Path) -> Result<Snapshot, SyncError> {
        let start = Instant::now();

        if !self.fs.is_dir(root) {
            return Err(SyncError::NotADirectory(root.to_path_buf()));
        }

        let mut errors = Vec::new();
        let mut root_entry = self
            .build_directory(root, PathBuf::new(), &mut errors)
            .map_err(|e| SyncError::io(root, e))?;
        root_entry.name = OsString::from(ROOT_SENTINEL);
        root_entry.rehash(self.algorithm);

        let snapshot = Snapshot {
            root: root_entry,
            errors,
        };
        info!(
            entry_count = snapshot.entry_count(),
            unreadable = snapshot.errors.len(),
            root_hash = %hasher::to_hex(&snapshot.root.hash),
            duration_ms = start.elapsed().as_millis(),
            "Snapshot built"
        );
        Ok(snapshot)
    }

    fn build_directory(
        &self,
        absolute_path: &Path,
        relative_path: PathBuf,
        errors: &mut Vec<SyncOperationError>,
    ) -> io::Result<DirectoryEntry> {
        let mut names = self.fs.list_directory(absolute_path)?;
        names.sort();

        let mut children = Vec::with_capacity(names.len());
        let mut skipped = Vec::new();
        for name in names {
            let child_absolute = absolute_path.join(&name);
            let child_relative = relative_path.join(&name);
            match self.build_entry(&name, &child_absolute, &child_relative, errors) {
                Ok(Some(entry)) => children.push(entry),
                Ok(None) => skipped.push(name),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!(path = %child_absolute.display(), "Entry vanished during walk, skipping");
                }
                Err(e) => {
                    warn!(
                        path = %child_absolute.display(),
                        error = %e,
                        "Unreadable entry, leaving it untouched"
                    );
                    errors.push(SyncOperationError {
                        operation: Operation::Read,
                        relative_path: child_relative,
                        source: e,
                    });
                    skipped.push(name);
                }
            }
        }

        let mut directory = DirectoryEntry {
            name: entry_name(absolute_path),
            hash: [0u8; 32],
            absolute_path: absolute_path.to_path_buf(),
            relative_path,
            children,
            skipped,
        };
        directory.rehash(self.algorithm);
        Ok(directory)
    }

    /// `Ok(None)` for links and special files, which are never followed
    fn build_entry(
        &self,
        name: &OsStr,
        absolute_path: &Path,
        relative_path: &Path,
        errors: &mut Vec<SyncOperationError>,
    ) -> io::Result<Option<FsEntry>> {
        if self.fs.is_symlink(absolute_path) {
            debug!(path = %absolute_path.display(), "Skipping symbolic link");
            return Ok(None);
        }

        if self.fs.is_file(absolute_path) {
            trace!(path = %absolute_path.display(), "Hashing file");
            let content = self.fs.read_file(absolute_path)?;
            let hash = hasher::compute_file_hash(self.algorithm, &content, name);
            return Ok(Some(FsEntry::File(FileEntry {
                name: name.to_os_string(),
                hash,
                absolute_path: absolute_path.to_path_buf(),
                relative_path: relative_path.to_path_buf(),
            })));
        }

        if self.fs.is_dir(absolute_path) {
            let directory =
                self.build_directory(absolute_path, relative_path.to_path_buf(), errors)?;
            return Ok(Some(FsEntry::Directory(directory)));
        }

        debug!(path = %absolute_path.display(), "Skipping entry that is neither file nor directory");
        Ok(None)
    }
}

fn entry_name(path: &Path) -> OsString {
    path.file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| path.as_os_str().to_os_string())
}
