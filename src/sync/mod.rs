//! One-way replication engine
//!
//! Snapshots the source and replica trees, diffs them and applies the
//! resulting delete/modify/create operations to the replica.

pub mod diff;
pub mod executor;
pub mod fs;
pub mod journal;
pub mod orchestrator;

pub use diff::{Diff, Modification};
pub use fs::{FileSystem, LocalFileSystem};
pub use orchestrator::{SyncPlan, SyncReport, Synchronizer};
