//! Integration tests for end-to-end sync behavior

use super::test_utils::{populate, write, SyncFixture};
use std::fs;
use std::path::Path;

/// A full tree lands in an empty replica and both roots hash the same afterwards
#[test]
fn test_initial_sync_converges() {
    let fixture = SyncFixture::new();
    populate(&fixture.source);
    assert!(!fixture.in_sync());

    let report = fixture.synchronizer().sync().unwrap();

    assert!(!report.has_errors());
    assert!(fixture.in_sync());
    assert_eq!(
        fs::read_to_string(fixture.replica.join("dir01/dir12/file21")).unwrap(),
        "twenty-one"
    );
    assert!(fixture.replica.join("dir02/dir14").is_dir());
}

/// A second sync without source changes does nothing and writes nothing
#[test]
fn test_sync_is_idempotent() {
    let fixture = SyncFixture::new();
    populate(&fixture.source);
    let synchronizer = fixture.synchronizer();

    synchronizer.sync().unwrap();
    let lines_after_first = fixture.log_lines();

    assert!(synchronizer.check_diff().unwrap().is_empty());
    let report = synchronizer.sync().unwrap();
    assert!(report.is_noop());
    assert_eq!(fixture.log_lines(), lines_after_first);
}

/// Nothing to do means the log file is never created
#[test]
fn test_noop_sync_does_not_create_log() {
    let fixture = SyncFixture::new();
    fixture.synchronizer().sync().unwrap();
    assert!(!fixture.log_file.exists());
}

/// A file added under existing directories is one created entry at its full path
#[test]
fn test_add_nested_file() {
    let fixture = SyncFixture::new();
    fs::create_dir_all(fixture.source.join("a/b")).unwrap();
    let synchronizer = fixture.synchronizer();
    synchronizer.sync().unwrap();

    write(&fixture.source, "a/b/c", "payload");
    let diff = synchronizer.check_diff().unwrap();
    assert_eq!(diff.created.len(), 1);
    assert_eq!(diff.created[0].relative_path(), Path::new("a/b/c"));
    assert!(diff.deleted.is_empty());
    assert!(diff.modified.is_empty());

    synchronizer.sync().unwrap();
    assert_eq!(fs::read(fixture.replica.join("a/b/c")).unwrap(), b"payload");
}

/// A file removed from the source disappears from the replica
#[test]
fn test_delete_propagates() {
    let fixture = SyncFixture::new();
    populate(&fixture.source);
    let synchronizer = fixture.synchronizer();
    synchronizer.sync().unwrap();

    fs::remove_file(fixture.source.join("dir01/file11")).unwrap();
    synchronizer.sync().unwrap();

    assert!(!fixture.replica.join("dir01/file11").exists());
    assert!(fixture.log_lines().contains(&"Deleted file 'dir01/file11'".to_string()));
    assert!(fixture.in_sync());
}

/// Changed bytes at the same path are an in-place modification
#[test]
fn test_modify_propagates() {
    let fixture = SyncFixture::new();
    populate(&fixture.source);
    let synchronizer = fixture.synchronizer();
    synchronizer.sync().unwrap();

    write(&fixture.source, "dir02/dir13/file22", "rewritten");
    let diff = synchronizer.check_diff().unwrap();
    assert_eq!(diff.modified.len(), 1);
    assert_eq!(
        diff.modified[0].replica.absolute_path,
        fixture.replica.join("dir02/dir13/file22")
    );
    assert_eq!(
        diff.modified[0].source.absolute_path,
        fixture.source.join("dir02/dir13/file22")
    );

    synchronizer.sync().unwrap();
    assert_eq!(
        fs::read_to_string(fixture.replica.join("dir02/dir13/file22")).unwrap(),
        "rewritten"
    );
    assert!(fixture
        .log_lines()
        .contains(&"Modified file 'dir02/dir13/file22'".to_string()));
}

/// Renaming with identical bytes is a delete and a create, never a move
#[test]
fn test_rename_is_not_a_move() {
    let fixture = SyncFixture::new();
    write(&fixture.source, "x", "identical");
    let synchronizer = fixture.synchronizer();
    synchronizer.sync().unwrap();

    fs::rename(fixture.source.join("x"), fixture.source.join("y")).unwrap();
    let diff = synchronizer.check_diff().unwrap();
    assert_eq!(diff.deleted.len(), 1);
    assert_eq!(diff.deleted[0].relative_path(), Path::new("x"));
    assert_eq!(diff.created.len(), 1);
    assert_eq!(diff.created[0].relative_path(), Path::new("y"));
    assert!(diff.modified.is_empty());
}

/// An empty directory only in the source shows up empty in the replica
#[test]
fn test_empty_directory_round_trip() {
    let fixture = SyncFixture::new();
    fs::create_dir(fixture.source.join("empty")).unwrap();

    fixture.synchronizer().sync().unwrap();

    let replica_dir = fixture.replica.join("empty");
    assert!(replica_dir.is_dir());
    assert_eq!(fs::read_dir(&replica_dir).unwrap().count(), 0);
    assert!(fixture
        .log_lines()
        .contains(&"Created empty directory 'empty'".to_string()));
}

/// Replacing a directory with a file of the same name converges
#[test]
fn test_directory_replaced_by_file() {
    let fixture = SyncFixture::new();
    write(&fixture.source, "thing/inner", "nested");
    let synchronizer = fixture.synchronizer();
    synchronizer.sync().unwrap();

    fs::remove_dir_all(fixture.source.join("thing")).unwrap();
    write(&fixture.source, "thing", "now a file");
    let report = synchronizer.sync().unwrap();

    assert!(!report.has_errors());
    assert!(fixture.replica.join("thing").is_file());
    assert!(fixture.in_sync());
}

/// Replica-only content is removed, including whole subtrees
#[test]
fn test_replica_only_subtree_removed() {
    let fixture = SyncFixture::new();
    write(&fixture.replica, "stray/deep/file", "x");
    fs::create_dir(fixture.replica.join("stray/empty")).unwrap();

    fixture.synchronizer().sync().unwrap();

    assert!(!fixture.replica.join("stray").exists());
    let lines = fixture.log_lines();
    assert!(lines.contains(&"Deleted directory 'stray'".to_string()));
    assert!(lines.contains(&"Deleted empty directory 'stray/empty'".to_string()));
}

/// Each batch starts with a blank line and a timestamped header
#[test]
fn test_log_batch_header() {
    let fixture = SyncFixture::new();
    write(&fixture.source, "f", "1");
    let synchronizer = fixture.synchronizer();
    synchronizer.sync().unwrap();
    write(&fixture.source, "f", "2");
    synchronizer.sync().unwrap();

    let lines = fixture.log_lines();
    let headers: Vec<_> = lines.iter().filter(|l| l.starts_with("Sync ")).collect();
    assert_eq!(headers.len(), 2);
    for header in headers {
        // "Sync DD/MM/YYYY HH:MM:SS"
        assert_eq!(header.len(), "Sync ".len() + 19);
        assert_eq!(&header[7..8], "/");
        assert_eq!(&header[10..11], "/");
    }
    assert_eq!(lines[0], "");
    assert_eq!(lines[2], "Created file 'f'");
    assert_eq!(lines.last().unwrap(), "Modified file 'f'");
}

/// A file moved into a sibling directory is deleted and recreated
#[test]
fn test_move_between_directories_is_delete_and_create() {
    let fixture = SyncFixture::new();
    write(&fixture.source, "left/file", "same");
    fs::create_dir(fixture.source.join("right")).unwrap();
    let synchronizer = fixture.synchronizer();
    synchronizer.sync().unwrap();

    fs::rename(fixture.source.join("left/file"), fixture.source.join("right/file")).unwrap();
    let diff = synchronizer.check_diff().unwrap();
    assert_eq!(diff.deleted[0].relative_path(), Path::new("left/file"));
    assert_eq!(diff.created[0].relative_path(), Path::new("right/file"));

    synchronizer.sync().unwrap();
    assert!(fixture.in_sync());
}

/// A replica-only link to an outside directory is never followed or deleted
#[cfg(unix)]
#[test]
fn test_replica_symlink_is_left_alone() {
    let fixture = SyncFixture::new();
    let outside = fixture.source.parent().unwrap().join("outside");
    write(&outside, "precious", "keep me");
    std::os::unix::fs::symlink(&outside, fixture.replica.join("link")).unwrap();
    write(&fixture.source, "f", "x");

    let report = fixture.synchronizer().sync().unwrap();

    assert!(!report.has_errors());
    assert_eq!(fs::read_to_string(outside.join("precious")).unwrap(), "keep me");
    assert!(fs::symlink_metadata(fixture.replica.join("link")).is_ok());
    assert!(fixture.replica.join("f").exists());
    assert!(fixture.in_sync());
}

/// Source links are not copied, and a dangling one does not fail the run
#[cfg(unix)]
#[test]
fn test_source_symlinks_are_skipped() {
    let fixture = SyncFixture::new();
    write(&fixture.source, "d/real", "r");
    std::os::unix::fs::symlink(fixture.source.join("d/nowhere"), fixture.source.join("d/dangling"))
        .unwrap();

    let report = fixture.synchronizer().sync().unwrap();

    assert!(!report.has_errors());
    assert!(fixture.replica.join("d/real").exists());
    assert!(fs::symlink_metadata(fixture.replica.join("d/dangling")).is_err());
    assert!(fixture.synchronizer().sync().unwrap().is_noop());
}
