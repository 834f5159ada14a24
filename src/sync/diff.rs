//! Snapshot diff computation
//!
//! Compares two root-normalized snapshots level by level. Children are
//! matched by name among siblings only; matched pairs with equal hashes are
//! trusted identical and never descended into. A name skipped by either
//! snapshot is left alone on both sides.

use crate::tree::node::{DirectoryEntry, FileEntry, FsEntry};
use std::collections::{BTreeMap, VecDeque};
use std::ffi::OsString;
use tracing::{debug, instrument, trace};

/// A replica file whose content must be overwritten from the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    pub replica: FileEntry,
    pub source: FileEntry,
}

/// Operations needed to make the replica match the source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Source-only entries, copied wholesale
    pub created: Vec<FsEntry>,
    /// Replica-only entries, removed wholesale
    pub deleted: Vec<FsEntry>,
    pub modified: Vec<Modification>,
}

/// Counts of each operation set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub created: usize,
    pub deleted: usize,
    pub modified: usize,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }

    pub fn len(&self) -> usize {
        self.created.len() + self.deleted.len() + self.modified.len()
    }

    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            created: self.created.len(),
            deleted: self.deleted.len(),
            modified: self.modified.len(),
        }
    }
}

/// Diff two snapshot roots, consuming them
#[instrument(skip_all)]
pub fn diff(source: DirectoryEntry, replica: DirectoryEntry) -> Diff {
    let mut result = Diff::default();
    let mut worklist = VecDeque::from([(source, replica)]);

    while let Some((source_dir, replica_dir)) = worklist.pop_front() {
        trace!(path = %source_dir.relative_path.display(), "Comparing directory");

        let mut source_children = by_name(source_dir.children);
        let mut replica_children = by_name(replica_dir.children);
        for name in source_dir.skipped.iter().chain(&replica_dir.skipped) {
            let in_source = source_children.remove(name).is_some();
            let in_replica = replica_children.remove(name).is_some();
            if in_source || in_replica {
                trace!(name = ?name, "Leaving skipped entry untouched");
            }
        }

        for (name, replica_child) in replica_children {
            let Some(source_child) = source_children.remove(&name) else {
                result.deleted.push(replica_child);
                continue;
            };

            match (source_child, replica_child) {
                (FsEntry::File(source), FsEntry::File(replica)) => {
                    if source.hash != replica.hash {
                        result.modified.push(Modification { replica, source });
                    }
                }
                (FsEntry::Directory(source), FsEntry::Directory(replica)) => {
                    if source.hash != replica.hash {
                        worklist.push_back((source, replica));
                    }
                }
                // Same name, different kind: replace wholesale
                (source, replica) => {
                    result.deleted.push(replica);
                    result.created.push(source);
                }
            }
        }

        result.created.extend(source_children.into_values());
    }

    let summary = result.summary();
    debug!(
        created = summary.created,
        deleted = summary.deleted,
        modified = summary.modified,
        "Diff computed"
    );
    result
}

fn by_name(children: Vec<FsEntry>) -> BTreeMap<OsString, FsEntry> {
    children
        .into_iter()
        .map(|child| (child.name().to_os_string(), child))
        .collect()
}
