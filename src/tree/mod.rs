//! Hashed directory snapshots
//!
//! Represents a directory as a Merkle tree, where each entry (file or
//! directory) carries a hash derived from its name and content or children.

pub mod builder;
pub mod hasher;
pub mod node;
pub mod path;
