//! Integration tests for snapshot hashing

use super::test_utils::{populate, write, SyncFixture};
use std::ffi::OsStr;
use std::fs;
use treesync::sync::{LocalFileSystem, Synchronizer};
use treesync::tree::builder::SnapshotBuilder;
use treesync::tree::hasher::{compute_directory_hash, compute_file_hash, DigestAlgorithm};
use treesync::tree::node::FsEntry;
use treesync::types::ROOT_SENTINEL;

#[test]
fn test_snapshot_matches_manual_hashes() {
    let fixture = SyncFixture::new();
    write(&fixture.source, "docs/readme", "hello");
    write(&fixture.source, "top", "level");

    let alg = DigestAlgorithm::Blake3;
    let snapshot = SnapshotBuilder::new(&LocalFileSystem, alg)
        .build(&fixture.source)
        .unwrap();

    let readme = compute_file_hash(alg, b"hello", OsStr::new("readme"));
    let docs = compute_directory_hash(alg, [&readme], OsStr::new("docs"));
    let top = compute_file_hash(alg, b"level", OsStr::new("top"));
    let root = compute_directory_hash(alg, [&docs, &top], OsStr::new(ROOT_SENTINEL));

    assert_eq!(snapshot.root_hash(), root);
}

/// Two differently named roots with the same content hash the same
#[test]
fn test_root_name_does_not_affect_hash() {
    let fixture = SyncFixture::new();
    populate(&fixture.source);
    populate(&fixture.replica);

    let builder = SnapshotBuilder::new(&LocalFileSystem, DigestAlgorithm::Blake3);
    let source = builder.build(&fixture.source).unwrap();
    let replica = builder.build(&fixture.replica).unwrap();

    assert_eq!(source.root_hash(), replica.root_hash());
    assert_eq!(source.entry_count(), replica.entry_count());
}

#[test]
fn test_children_sorted_by_name() {
    let fixture = SyncFixture::new();
    write(&fixture.source, "zeta", "z");
    write(&fixture.source, "alpha", "a");
    write(&fixture.source, "mid", "m");

    let snapshot = SnapshotBuilder::new(&LocalFileSystem, DigestAlgorithm::Blake3)
        .build(&fixture.source)
        .unwrap();
    let names: Vec<_> = snapshot.root.children.iter().map(FsEntry::name).collect();
    assert_eq!(names, ["alpha", "mid", "zeta"]);
}

#[test]
fn test_empty_directory_differs_from_missing() {
    let fixture = SyncFixture::new();
    let builder = SnapshotBuilder::new(&LocalFileSystem, DigestAlgorithm::Blake3);
    let before = builder.build(&fixture.source).unwrap().root_hash();

    fs::create_dir(fixture.source.join("empty")).unwrap();
    let after = builder.build(&fixture.source).unwrap().root_hash();

    assert_ne!(before, after);
}

#[test]
fn test_algorithms_produce_different_roots() {
    let fixture = SyncFixture::new();
    populate(&fixture.source);

    let blake3 = SnapshotBuilder::new(&LocalFileSystem, DigestAlgorithm::Blake3)
        .build(&fixture.source)
        .unwrap();
    let sha256 = SnapshotBuilder::new(&LocalFileSystem, DigestAlgorithm::Sha256)
        .build(&fixture.source)
        .unwrap();

    assert_ne!(blake3.root_hash(), sha256.root_hash());
}

#[test]
fn test_sync_converges_with_sha256() {
    let fixture = SyncFixture::new();
    populate(&fixture.source);
    write(&fixture.replica, "stale", "old");

    let synchronizer = Synchronizer::new(fixture.config(DigestAlgorithm::Sha256));
    let report = synchronizer.sync().unwrap();
    assert!(!report.has_errors());

    let (source, replica) = synchronizer.root_hashes().unwrap();
    assert_eq!(source, replica);
    assert!(synchronizer.sync().unwrap().is_noop());
}

#[test]
fn test_content_change_changes_every_ancestor() {
    let fixture = SyncFixture::new();
    write(&fixture.source, "a/b/c", "one");
    let builder = SnapshotBuilder::new(&LocalFileSystem, DigestAlgorithm::Blake3);
    let before = builder.build(&fixture.source).unwrap();

    write(&fixture.source, "a/b/c", "two");
    let after = builder.build(&fixture.source).unwrap();

    let dir_a = |s: &treesync::tree::builder::Snapshot| *s.root.children[0].hash();
    assert_ne!(before.root_hash(), after.root_hash());
    assert_ne!(dir_a(&before), dir_a(&after));
}
