//! treesync: One-Way Directory Replication
//!
//! Keeps a replica directory identical to a source directory. Both trees are
//! snapshotted into hashed Merkle trees on every run, diffed, and the replica
//! is brought in line with delete, modify and create operations.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod scheduler;
pub mod sync;
pub mod tree;
pub mod types;
