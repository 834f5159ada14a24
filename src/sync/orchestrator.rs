//! Sync orchestration: snapshot both trees, diff, apply

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncOperationError};
use crate::sync::diff::{diff, Diff};
use crate::sync::executor::Executor;
use crate::sync::fs::{FileSystem, LocalFileSystem};
use crate::sync::journal::{batch_header, FileJournal, Journal};
use crate::tree::builder::SnapshotBuilder;
use crate::types::Hash;
use chrono::{DateTime, Local};
use tracing::{debug, info, instrument, warn};

/// Both snapshots reduced to what a sync needs
#[derive(Debug)]
pub struct SyncPlan {
    pub diff: Diff,
    /// Root hashes of (source, replica) at snapshot time
    pub root_hashes: (Hash, Hash),
    /// Entries of either tree that could not be read
    pub unreadable: Vec<SyncOperationError>,
}

/// Outcome of one `sync()` call
#[derive(Debug)]
pub struct SyncReport {
    pub started_at: DateTime<Local>,
    /// Root hashes of (source, replica) before anything was applied
    pub root_hashes: (Hash, Hash),
    pub created: usize,
    pub deleted: usize,
    pub modified: usize,
    pub errors: Vec<SyncOperationError>,
}

impl SyncReport {
    pub fn unchanged(started_at: DateTime<Local>, root_hashes: (Hash, Hash)) -> Self {
        Self {
            started_at,
            root_hashes,
            created: 0,
            deleted: 0,
            modified: 0,
            errors: Vec::new(),
        }
    }

    /// True when nothing needed to change
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.deleted == 0 && self.modified == 0 && self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Replicates the configured source tree onto the replica tree
pub struct Synchronizer<F: FileSystem = LocalFileSystem> {
    fs: F,
    config: SyncConfig,
}

impl Synchronizer<LocalFileSystem> {
    pub fn new(config: SyncConfig) -> Self {
        Self::with_fs(LocalFileSystem, config)
    }
}

impl<F: FileSystem> Synchronizer<F> {
    pub fn with_fs(fs: F, config: SyncConfig) -> Self {
        Self { fs, config }
    }

    /// Snapshot both trees once and diff them
    pub fn plan(&self) -> Result<SyncPlan, SyncError> {
        let builder = SnapshotBuilder::new(&self.fs, self.config.digest);
        let source = builder.build(&self.config.source)?;
        let replica = builder.build(&self.config.replica)?;
        let root_hashes = (source.root_hash(), replica.root_hash());

        let (source_root, mut unreadable) = source.into_parts();
        let (replica_root, replica_unreadable) = replica.into_parts();
        unreadable.extend(replica_unreadable);

        Ok(SyncPlan {
            diff: diff(source_root, replica_root),
            root_hashes,
            unreadable,
        })
    }

    /// Snapshot both trees and compute the operations needed
    pub fn check_diff(&self) -> Result<Diff, SyncError> {
        self.plan().map(|plan| plan.diff)
    }

    /// Normalized root hashes of (source, replica)
    pub fn root_hashes(&self) -> Result<(Hash, Hash), SyncError> {
        let builder = SnapshotBuilder::new(&self.fs, self.config.digest);
        let source = builder.build(&self.config.source)?;
        let replica = builder.build(&self.config.replica)?;
        Ok((source.root_hash(), replica.root_hash()))
    }

    /// Bring the replica in line with the source
    ///
    /// The sync log is only opened when there is something to do. Unreadable
    /// entries are left untouched and reported in `SyncReport::errors`.
    #[instrument(skip(self), fields(source = %self.config.source.display(), replica = %self.config.replica.display()))]
    pub fn sync(&self) -> Result<SyncReport, SyncError> {
        let started_at = Local::now();
        let plan = self.plan()?;
        if plan.diff.is_empty() {
            info!(unreadable = plan.unreadable.len(), "Replica already up to date");
            let mut report = SyncReport::unchanged(started_at, plan.root_hashes);
            report.errors = plan.unreadable;
            return Ok(report);
        }

        let mut journal = FileJournal::open(&self.config.log_file, self.config.mirror_log)?;
        debug!(log = %journal.path().display(), "Appending to sync log");
        self.sync_into(plan, &mut journal, started_at)
    }

    fn sync_into<J: Journal>(
        &self,
        plan: SyncPlan,
        journal: &mut J,
        started_at: DateTime<Local>,
    ) -> Result<SyncReport, SyncError> {
        if let Err(e) = journal
            .append_line("")
            .and_then(|_| journal.append_line(&batch_header(&started_at)))
        {
            warn!(error = %e, "Failed to write sync log header");
        }

        let applied = Executor::new(&self.fs, &self.config.source, &self.config.replica, journal)
            .apply(plan.diff);

        let mut errors = plan.unreadable;
        errors.extend(applied.errors);
        let report = SyncReport {
            started_at,
            root_hashes: plan.root_hashes,
            created: applied.created,
            deleted: applied.deleted,
            modified: applied.modified,
            errors,
        };
        info!(
            created = report.created,
            deleted = report.deleted,
            modified = report.modified,
            failed = report.errors.len(),
            "Sync finished"
        );
        Ok(report)
    }
}
