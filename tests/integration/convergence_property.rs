//! Property tests: any pair of trees converges after one sync

use super::test_utils::SyncFixture;
use proptest::prelude::*;
use std::fs;
use std::path::Path;

const PATHS: &[&str] = &["a", "b", "a/x", "a/y", "b/z", "a/x/deep"];

#[derive(Debug, Clone)]
enum Op {
    Write(usize, Vec<u8>),
    Mkdir(usize),
    Remove(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..PATHS.len(), prop::collection::vec(any::<u8>(), 0..16))
            .prop_map(|(i, content)| Op::Write(i, content)),
        (0..PATHS.len()).prop_map(Op::Mkdir),
        (0..PATHS.len()).prop_map(Op::Remove),
    ]
}

/// Apply an operation, ignoring ones the current tree shape does not allow
fn apply(root: &Path, op: &Op) {
    match op {
        Op::Write(i, content) => {
            let path = root.join(PATHS[*i]);
            if path.is_dir() {
                return;
            }
            if let Some(parent) = path.parent() {
                if fs::create_dir_all(parent).is_err() {
                    return;
                }
            }
            let _ = fs::write(path, content);
        }
        Op::Mkdir(i) => {
            let path = root.join(PATHS[*i]);
            if !path.exists() {
                let _ = fs::create_dir_all(path);
            }
        }
        Op::Remove(i) => {
            let path = root.join(PATHS[*i]);
            if path.is_dir() {
                let _ = fs::remove_dir_all(path);
            } else if path.is_file() {
                let _ = fs::remove_file(path);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn sync_converges_and_is_idempotent(
        source_ops in prop::collection::vec(op_strategy(), 0..12),
        replica_ops in prop::collection::vec(op_strategy(), 0..12),
    ) {
        let fixture = SyncFixture::new();
        for op in &source_ops {
            apply(&fixture.source, op);
        }
        for op in &replica_ops {
            apply(&fixture.replica, op);
        }

        let synchronizer = fixture.synchronizer();
        let report = synchronizer.sync().unwrap();
        prop_assert!(!report.has_errors());

        let (source, replica) = synchronizer.root_hashes().unwrap();
        prop_assert_eq!(source, replica);
        prop_assert!(synchronizer.check_diff().unwrap().is_empty());
        prop_assert!(synchronizer.sync().unwrap().is_noop());
    }

    #[test]
    fn resync_after_source_edits_converges(
        initial in prop::collection::vec(op_strategy(), 0..10),
        edits in prop::collection::vec(op_strategy(), 1..10),
    ) {
        let fixture = SyncFixture::new();
        for op in &initial {
            apply(&fixture.source, op);
        }
        let synchronizer = fixture.synchronizer();
        synchronizer.sync().unwrap();

        for op in &edits {
            apply(&fixture.source, op);
        }
        let report = synchronizer.sync().unwrap();
        prop_assert!(!report.has_errors());
        prop_assert!(fixture.in_sync());
    }
}
