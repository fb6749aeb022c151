//! Version ledger tests
//!
//! Verifies that the ledger records the version DAG and keeps every
//! recorded version queryable

use perseg::{AddSum, Origin, PersistentSegTree, SegTreeError, SumCell, VersionLedger};

fn cells(values: &[i64]) -> Vec<SumCell> {
    values.iter().copied().map(SumCell::new).collect()
}

#[test]
fn test_ledger_records_branches() {
    let mut ledger = VersionLedger::<AddSum>::new();
    assert!(ledger.is_empty());

    let root = ledger.insert_root(
        PersistentSegTree::build(&cells(&[1, 2, 3, 4])),
        Origin::Build { len: 4 },
    );

    // Two children of the root, one grandchild
    let a = ledger
        .derive(root, Origin::Apply { start: 0, end: 2 }, |t| t.try_apply(0..2, 5))
        .unwrap();
    let b = ledger
        .derive(root, Origin::Set { index: 3 }, |t| t.try_set(3, SumCell::new(0)))
        .unwrap();
    let c = ledger
        .derive(a, Origin::Set { index: 0 }, |t| t.try_set(0, SumCell::new(-6)))
        .unwrap();

    assert_eq!(ledger.len(), 4);
    assert_eq!(ledger.parent(a).unwrap(), Some(root));
    assert_eq!(ledger.parent(b).unwrap(), Some(root));
    assert_eq!(ledger.lineage(c).unwrap(), vec![c, a, root]);

    let sums: Vec<i64> = (0..ledger.len())
        .map(|id| ledger.get(id).unwrap().fold_all().sum)
        .collect();
    assert_eq!(sums, vec![10, 20, 6, 8]);
}

#[test]
fn test_ledger_versions_share_nodes() {
    let mut ledger = VersionLedger::<AddSum>::new();
    let root = ledger.insert_root(
        PersistentSegTree::build(&cells(&[0; 64])),
        Origin::Build { len: 64 },
    );
    let before = ledger.get(root).unwrap().profile();

    let mut current = root;
    for i in 0..64 {
        current = ledger
            .derive(current, Origin::Set { index: i }, |t| t.try_set(i, SumCell::new(1)))
            .unwrap();
    }

    let after = ledger.get(current).unwrap().profile();
    // 64 full copies would need 64 * 127 nodes
    assert!(after.allocated_since(&before) <= 64 * (3 * 6 + 1));
    assert_eq!(ledger.get(current).unwrap().fold_all().sum, 64);
    assert_eq!(ledger.get(root).unwrap().fold_all().sum, 0);
}

#[test]
fn test_ledger_rejects_unknown_parent() {
    let mut ledger = VersionLedger::<AddSum>::new();
    let err = ledger
        .derive(0, Origin::Set { index: 0 }, |t| t.try_set(0, SumCell::new(1)))
        .unwrap_err();
    assert_eq!(err, SegTreeError::UnknownVersion { id: 0, count: 0 });
    assert!(ledger.lineage(7).is_err());
}

#[test]
fn test_origin_display() {
    assert_eq!(Origin::Build { len: 3 }.to_string(), "build(3)");
    assert_eq!(Origin::Empty { len: 2 }.to_string(), "empty(2)");
    assert_eq!(Origin::Set { index: 1 }.to_string(), "set(1)");
    assert_eq!(Origin::Apply { start: 0, end: 4 }.to_string(), "apply(0..4)");
}
