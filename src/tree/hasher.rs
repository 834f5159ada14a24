//! Hash computation for snapshot entries
//!
//! Leaf hash     = D( D(content) || D(name) )
//! Interior hash = D( child_hash_0 || child_hash_1 || ... || D(name) )
//!
//! The name is part of every hash, so identical bytes under two different
//! names never compare equal.

use crate::types::Hash;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ffi::OsStr;
use std::fmt;

/// Digest function used for every entry hash
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Blake3,
    Sha256,
}

impl DigestAlgorithm {
    /// Digest arbitrary bytes
    pub fn digest(self, data: &[u8]) -> Hash {
        match self {
            DigestAlgorithm::Blake3 => *blake3::hash(data).as_bytes(),
            DigestAlgorithm::Sha256 => Sha256::digest(data).into(),
        }
    }

    fn digest_parts<'a>(self, parts: impl IntoIterator<Item = &'a [u8]>) -> Hash {
        match self {
            DigestAlgorithm::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                for part in parts {
                    hasher.update(part);
                }
                *hasher.finalize().as_bytes()
            }
            DigestAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                for part in parts {
                    hasher.update(part);
                }
                hasher.finalize().into()
            }
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlgorithm::Blake3 => write!(f, "blake3"),
            DigestAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Compute the hash of a file entry from its content and name
pub fn compute_file_hash(algorithm: DigestAlgorithm, content: &[u8], name: &OsStr) -> Hash {
    let content_hash = algorithm.digest(content);
    let name_hash = algorithm.digest(name.as_encoded_bytes());
    algorithm.digest_parts([content_hash.as_slice(), name_hash.as_slice()])
}

/// Compute the hash of a directory entry from its children's hashes and its name
///
/// Children are concatenated in the order given; callers sort them by name first.
pub fn compute_directory_hash<'a>(
    algorithm: DigestAlgorithm,
    child_hashes: impl IntoIterator<Item = &'a Hash>,
    name: &OsStr,
) -> Hash {
    let name_hash = algorithm.digest(name.as_encoded_bytes());
    algorithm.digest_parts(
        child_hashes
            .into_iter()
            .map(|h| h.as_slice())
            .chain(std::iter::once(name_hash.as_slice())),
    )
}

/// Render a hash as lowercase hex
pub fn to_hex(hash: &Hash) -> String {
    hex::encode(hash)
}
