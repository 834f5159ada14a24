//! Shared primitive types

/// 32-byte digest produced by every supported hash algorithm
pub type Hash = [u8; 32];

/// Name given to both snapshot roots before they are compared
pub const ROOT_SENTINEL: &str = "__root__";
