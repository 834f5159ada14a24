//! Snapshot entry types

use crate::tree::hasher::{self, DigestAlgorithm};
use crate::types::Hash;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// A regular file captured in a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: OsString,
    pub hash: Hash,
    pub absolute_path: PathBuf,
    pub relative_path: PathBuf,
}

/// A directory captured in a snapshot, owning its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: OsString,
    pub hash: Hash,
    pub absolute_path: PathBuf,
    pub relative_path: PathBuf,
    /// Sorted by name
    pub children: Vec<FsEntry>,
    /// Names present on disk but left out of `children`: unreadable entries
    /// and symlinks. They take no part in the hash and are never diffed.
    pub skipped: Vec<OsString>,
}

/// A filesystem entry: either a leaf file or an interior directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEntry {
    File(FileEntry),
    Directory(DirectoryEntry),
}

impl DirectoryEntry {
    /// Recompute this directory's hash from its current children and name
    pub fn rehash(&mut self, algorithm: DigestAlgorithm) {
        self.hash =
            hasher::compute_directory_hash(algorithm, self.children.iter().map(FsEntry::hash), &self.name);
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl FsEntry {
    pub fn name(&self) -> &OsStr {
        match self {
            FsEntry::File(f) => &f.name,
            FsEntry::Directory(d) => &d.name,
        }
    }

    pub fn hash(&self) -> &Hash {
        match self {
            FsEntry::File(f) => &f.hash,
            FsEntry::Directory(d) => &d.hash,
        }
    }

    pub fn absolute_path(&self) -> &Path {
        match self {
            FsEntry::File(f) => &f.absolute_path,
            FsEntry::Directory(d) => &d.absolute_path,
        }
    }

    pub fn relative_path(&self) -> &Path {
        match self {
            FsEntry::File(f) => &f.relative_path,
            FsEntry::Directory(d) => &d.relative_path,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, FsEntry::Directory(_))
    }

    /// Number of entries in this subtree, including itself
    pub fn entry_count(&self) -> usize {
        match self {
            FsEntry::File(_) => 1,
            FsEntry::Directory(d) => 1 + d.children.iter().map(FsEntry::entry_count).sum::<usize>(),
        }
    }
}
