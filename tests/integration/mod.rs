//! Integration tests for the treesync replication engine

mod convergence_property;
mod hasher_verification;
mod sync_behavior;
