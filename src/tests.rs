use std::ops::Range;

use proptest::prelude::*;

use crate::{model, node::Dir};

use super::*;

fn insert_find_all(keys: &[i64]) {
    let mut tree = AvlTree::new();

    for &key in keys {
        tree.insert(key).unwrap();
        tree.assert_invariants();
    }

    for &key in keys {
        let node = tree.search(key);
        assert!(!node.is_nil(), "value not found");
        assert_eq!(node.value(), Ok(key));

        // Searching again without mutation lands on the same node.
        assert_eq!(node, tree.search(key));
    }

    let mut sorted = keys.to_vec();
    sorted.sort_unstable();
    assert_eq!(tree.iter().collect::<Vec<_>>(), sorted);
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn single_elem_find() {
    insert_find_all(&[0]);
}

#[test]
fn two_elems_find() {
    insert_find_all(&[0, 1]);
    insert_find_all(&[1, 0]);
}

#[test]
fn three_elems_find() {
    insert_find_all(&[0, 1, 2]);
    insert_find_all(&[0, 2, 1]);
    insert_find_all(&[1, 0, 2]);
    insert_find_all(&[1, 2, 0]);
    insert_find_all(&[2, 0, 1]);
    insert_find_all(&[2, 1, 0]);
}

#[test]
fn four_elems_find() {
    insert_find_all(&[0, 1, 2, 3]);
    insert_find_all(&[0, 1, 3, 2]);
    insert_find_all(&[0, 2, 1, 3]);
    insert_find_all(&[0, 2, 3, 1]);
    insert_find_all(&[0, 3, 1, 2]);
    insert_find_all(&[0, 3, 2, 1]);

    insert_find_all(&[1, 0, 2, 3]);
    insert_find_all(&[1, 0, 3, 2]);
    insert_find_all(&[1, 2, 0, 3]);
    insert_find_all(&[1, 2, 3, 0]);
    insert_find_all(&[1, 3, 0, 2]);
    insert_find_all(&[1, 3, 2, 0]);

    insert_find_all(&[2, 0, 1, 3]);
    insert_find_all(&[2, 0, 3, 1]);
    insert_find_all(&[2, 1, 0, 3]);
    insert_find_all(&[2, 1, 3, 0]);
    insert_find_all(&[2, 3, 0, 1]);
    insert_find_all(&[2, 3, 1, 0]);

    insert_find_all(&[3, 0, 1, 2]);
    insert_find_all(&[3, 0, 2, 1]);
    insert_find_all(&[3, 1, 0, 2]);
    insert_find_all(&[3, 1, 2, 0]);
    insert_find_all(&[3, 2, 0, 1]);
    insert_find_all(&[3, 2, 1, 0]);
}

fn insert_remove_all_avl(keys: &[i64]) {
    let mut tree = AvlTree::new();

    for &key in keys {
        tree.insert(key).unwrap();
        tree.assert_invariants();
    }

    for &key in keys {
        tree.delete(key).unwrap();
        tree.assert_invariants();
    }

    assert!(tree.is_empty());
    assert!(tree.root().is_nil());

    for &key in keys {
        tree.insert(key).unwrap();
        tree.assert_invariants();
    }

    for &key in keys.iter().rev() {
        tree.delete(key).unwrap();
        tree.assert_invariants();
    }

    assert!(tree.is_empty());
}

fn insert_remove_all_bst(keys: &[i64]) {
    let mut tree = BstTree::new();

    for &key in keys {
        tree.insert(key);
        tree.assert_invariants();
    }

    for &key in keys {
        tree.delete(key).unwrap();
        tree.assert_invariants();
    }

    assert!(tree.is_empty());
    assert!(tree.root().is_nil());
}

#[test]
fn remove_one() {
    insert_remove_all_avl(&[0]);
    insert_remove_all_bst(&[0]);
}

#[test]
fn remove_two() {
    insert_remove_all_avl(&[0, 1]);
    insert_remove_all_avl(&[1, 0]);
    insert_remove_all_bst(&[0, 1]);
    insert_remove_all_bst(&[1, 0]);
}

#[test]
fn remove_three() {
    insert_remove_all_avl(&[0, 1, 2]);
    insert_remove_all_avl(&[0, 2, 1]);
    insert_remove_all_avl(&[1, 0, 2]);
    insert_remove_all_avl(&[1, 2, 0]);
    insert_remove_all_avl(&[2, 0, 1]);
    insert_remove_all_avl(&[2, 1, 0]);

    insert_remove_all_bst(&[0, 1, 2]);
    insert_remove_all_bst(&[0, 2, 1]);
    insert_remove_all_bst(&[1, 0, 2]);
    insert_remove_all_bst(&[1, 2, 0]);
    insert_remove_all_bst(&[2, 0, 1]);
    insert_remove_all_bst(&[2, 1, 0]);
}

#[test]
fn remove_four() {
    insert_remove_all_avl(&[0, 1, 2, 3]);
    insert_remove_all_avl(&[0, 1, 3, 2]);
    insert_remove_all_avl(&[0, 2, 1, 3]);
    insert_remove_all_avl(&[0, 2, 3, 1]);
    insert_remove_all_avl(&[0, 3, 1, 2]);
    insert_remove_all_avl(&[0, 3, 2, 1]);

    insert_remove_all_avl(&[1, 0, 2, 3]);
    insert_remove_all_avl(&[1, 0, 3, 2]);
    insert_remove_all_avl(&[1, 2, 0, 3]);
    insert_remove_all_avl(&[1, 2, 3, 0]);
    insert_remove_all_avl(&[1, 3, 0, 2]);
    insert_remove_all_avl(&[1, 3, 2, 0]);

    insert_remove_all_avl(&[2, 0, 1, 3]);
    insert_remove_all_avl(&[2, 0, 3, 1]);
    insert_remove_all_avl(&[2, 1, 0, 3]);
    insert_remove_all_avl(&[2, 1, 3, 0]);
    insert_remove_all_avl(&[2, 3, 0, 1]);
    insert_remove_all_avl(&[2, 3, 1, 0]);

    insert_remove_all_avl(&[3, 0, 1, 2]);
    insert_remove_all_avl(&[3, 0, 2, 1]);
    insert_remove_all_avl(&[3, 1, 0, 2]);
    insert_remove_all_avl(&[3, 1, 2, 0]);
    insert_remove_all_avl(&[3, 2, 0, 1]);
    insert_remove_all_avl(&[3, 2, 1, 0]);
}

#[test]
fn bst_in_order_after_inserts() {
    let mut tree = BstTree::new();
    for value in [5, 3, 8, 1, 4] {
        tree.insert(value);
        tree.assert_invariants();
    }

    assert_eq!(tree.iter().collect::<Vec<_>>(), [1, 3, 4, 5, 8]);

    let mut collected = Vec::new();
    model::collect_in_order(tree.root(), &mut collected);
    assert_eq!(collected, [1, 3, 4, 5, 8]);
}

fn avl_from(values: &[i64]) -> AvlTree {
    let mut tree = AvlTree::new();
    for &value in values {
        tree.insert(value).unwrap();
        tree.assert_invariants();
    }
    tree
}

#[test]
fn right_right_case_rotates_left() {
    let tree = avl_from(&[10, 20, 30]);
    let root = tree.root();
    assert_eq!(root.value(), Ok(20));
    assert_eq!(root.left().unwrap().value(), Ok(10));
    assert_eq!(root.right().unwrap().value(), Ok(30));
}

#[test]
fn left_left_case_rotates_right() {
    let tree = avl_from(&[30, 20, 10]);
    let root = tree.root();
    assert_eq!(root.value(), Ok(20));
    assert_eq!(root.left().unwrap().value(), Ok(10));
    assert_eq!(root.right().unwrap().value(), Ok(30));
}

#[test]
fn left_right_case_rotates_doubly() {
    let tree = avl_from(&[30, 10, 20]);
    let root = tree.root();
    assert_eq!(root.value(), Ok(20));
    assert_eq!(root.left().unwrap().value(), Ok(10));
    assert_eq!(root.right().unwrap().value(), Ok(30));
}

#[test]
fn right_left_case_rotates_doubly() {
    let tree = avl_from(&[10, 30, 20]);
    let root = tree.root();
    assert_eq!(root.value(), Ok(20));
    assert_eq!(root.left().unwrap().value(), Ok(10));
    assert_eq!(root.right().unwrap().value(), Ok(30));
}

#[test]
fn delete_rebalances_multiple_levels() {
    let mut tree = AvlTree::new();
    for value in [8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1] {
        tree.insert(value).unwrap();
        tree.assert_invariants();
    }

    // Removing the leaf unbalances both the subtree at 11 and the root.
    tree.delete(12).unwrap();
    tree.assert_invariants();

    assert_eq!(tree.root().value(), Ok(5));
    assert_eq!(
        tree.iter().collect::<Vec<_>>(),
        (1..=11).collect::<Vec<_>>()
    );
}

#[test]
fn ascending_inserts_then_delete_stay_balanced() {
    let operations: Vec<Operation> = (1..=7)
        .map(Operation::insert)
        .chain([Operation::delete(1)])
        .collect();
    model::run_task_equivalence::<AvlTree>(operations, true);
}

#[test]
fn delete_only_element() {
    let mut tree = AvlTree::new();
    tree.insert(7).unwrap();
    tree.delete(7).unwrap();

    assert!(tree.root().is_nil());
    assert_eq!(tree.delete(7), Err(TreeError::ValueNotFound(7)));
}

#[test]
fn duplicate_values_go_right() {
    let mut tree = AvlTree::new();
    for value in [5, 5, 5, 3, 5] {
        tree.insert(value).unwrap();
        tree.assert_invariants();
        model::check_balanced(tree.root());
    }
    assert_eq!(tree.iter().collect::<Vec<_>>(), [3, 5, 5, 5, 5]);

    tree.delete(5).unwrap();
    tree.assert_invariants();
    assert_eq!(tree.iter().collect::<Vec<_>>(), [3, 5, 5, 5]);

    let mut tree = BstTree::new();
    for value in [2, 2, 1, 2] {
        tree.insert(value);
        tree.assert_invariants();
    }
    assert_eq!(tree.iter().collect::<Vec<_>>(), [1, 2, 2, 2]);
}

#[test]
fn rotation_roundtrip_restores_shape() {
    let mut tree = BstTree::new();
    for value in [5, 3, 8, 2, 4] {
        tree.insert(value);
    }

    let before = format!("{tree:?}");
    let in_order_before: Vec<i64> = tree.iter().collect();

    let node = tree.core.search(5).expect("node not found");
    let up = tree.core.rotate(node, Dir::Right).unwrap();
    tree.assert_invariants();
    assert_eq!(unsafe { up.as_ref() }.value, 3);
    assert_eq!(tree.iter().collect::<Vec<_>>(), in_order_before);

    let restored = tree.core.rotate(up, Dir::Left).unwrap();
    tree.assert_invariants();
    assert_eq!(unsafe { restored.as_ref() }.value, 5);
    assert_eq!(format!("{tree:?}"), before);
    assert_eq!(tree.iter().collect::<Vec<_>>(), in_order_before);
}

#[test]
fn rotation_without_child_fails() {
    let mut tree = BstTree::new();
    tree.insert(1);
    let root = tree.core.root.unwrap();

    assert_eq!(
        tree.core.rotate(root, Dir::Right),
        Err(TreeError::InvalidRotation(
            "right rotate on a node that does not have a left child"
        ))
    );
    assert_eq!(
        tree.core.rotate(root, Dir::Left),
        Err(TreeError::InvalidRotation(
            "left rotate on a node that does not have a right child"
        ))
    );
    tree.assert_invariants();
}

#[test]
fn nil_accessors_fail() {
    let tree = BstTree::new();
    let root = tree.root();

    assert!(root.is_nil());
    assert!(!root.is_root());
    assert_eq!(root.value(), Err(TreeError::InvalidNodeAccess("value")));
    assert!(root.left().is_err());
    assert!(root.right().is_err());
    assert!(root.parent().is_err());
    assert!(root.min().is_err());
    assert!(root.max().is_err());
    assert!(tree.search(3).is_nil());
}

#[test]
fn extrema() {
    let mut tree = BstTree::new();
    assert_eq!(tree.first(), None);
    assert_eq!(tree.last(), None);

    for value in [5, 3, 8, 1, 4] {
        tree.insert(value);
    }

    assert_eq!(tree.first(), Some(1));
    assert_eq!(tree.last(), Some(8));
    assert_eq!(tree.root().min().unwrap().value(), Ok(1));
    assert_eq!(tree.root().max().unwrap().value(), Ok(8));
    assert!(tree.root().is_root());
    assert!(!tree.root().left().unwrap().is_root());
    assert!(tree.contains(4));
    assert!(!tree.contains(6));
}

#[test]
fn iter_handles_zigzag_shapes() {
    let mut tree = BstTree::new();
    for value in [3, 1, 2] {
        tree.insert(value);
    }
    assert_eq!(tree.iter().len(), 3);
    assert_eq!(tree.iter().collect::<Vec<_>>(), [1, 2, 3]);

    let mut tree = BstTree::new();
    for value in [1, 3, 2] {
        tree.insert(value);
    }
    assert_eq!(tree.iter().collect::<Vec<_>>(), [1, 2, 3]);

    assert_eq!(BstTree::new().iter().next(), None);
}

#[test]
fn clear_empties_the_tree() {
    let mut tree = AvlTree::new();
    for value in 0..32 {
        tree.insert(value).unwrap();
    }
    assert_eq!(tree.len(), 32);

    tree.clear();
    assert!(tree.is_empty());
    assert!(tree.root().is_nil());
    assert_eq!(tree.iter().next(), None);

    // Reusable after clearing.
    tree.insert(1).unwrap();
    assert_eq!(tree.len(), 1);
}

#[test]
fn operation_display_and_parse() {
    assert_eq!(Operation::insert(5).to_string(), "insert 5");
    assert_eq!(Operation::delete(3).to_string(), "delete 3");

    assert_eq!("+5".parse(), Ok(Operation::insert(5)));
    assert_eq!("-17".parse(), Ok(Operation::delete(17)));
    assert_eq!("-0".parse(), Ok(Operation::delete(0)));

    assert!("".parse::<Operation>().is_err());
    assert!("5".parse::<Operation>().is_err());
    assert!("+x".parse::<Operation>().is_err());

    assert!(Operation::insert(5).is_kind(OperationKind::Insert));
    assert!(!Operation::insert(5).is_kind(OperationKind::Delete));
}

fn parse_ops(input: &str) -> Vec<Operation> {
    input.split(',').map(|op| op.parse().unwrap()).collect()
}

#[test]
fn bst_task_delete_before_insert_fails() {
    let mut task = BstTask::new(parse_ops("+10,+5,+15,-5"));

    let mut labels = Vec::new();
    task.run(|snapshot| labels.push(snapshot.operation.to_string()))
        .unwrap();
    assert_eq!(labels, ["insert 10", "insert 5", "insert 15", "delete 5"]);

    let tree = task.tree();
    tree.assert_invariants();
    assert_eq!(tree.iter().collect::<Vec<_>>(), [10, 15]);

    // Deleting 5 a second time has nothing left to delete.
    let mut task = BstTask::new(parse_ops("+10,+5,+15,-5,-5"));
    assert_eq!(task.run(|_| ()), Err(TreeError::ValueNotFound(5)));
}

#[test]
fn failed_step_stays_stuck() {
    let mut task = BstTask::new(vec![Operation::delete(1)]);

    assert_eq!(task.advance().err(), Some(TreeError::ValueNotFound(1)));
    assert_eq!(task.advance().err(), Some(TreeError::ValueNotFound(1)));

    // A restart with the failing operation gone from the front is not
    // possible; the run replays the same sequence from an empty tree.
    task.restart();
    assert_eq!(task.advance().err(), Some(TreeError::ValueNotFound(1)));
}

#[test]
fn restart_replays_identically() {
    let mut task = AvlTask::new(parse_ops("+4,+2,+6,-2,+1"));

    let mut runs = Vec::new();
    for _ in 0..2 {
        let mut states: Vec<(String, Vec<i64>)> = Vec::new();
        task.run(|snapshot| {
            let mut in_order = Vec::new();
            model::collect_in_order(snapshot.root, &mut in_order);
            states.push((snapshot.operation.to_string(), in_order));
        })
        .unwrap();
        runs.push(states);
    }

    assert_eq!(runs[0].len(), task.operations().len());
    assert_eq!(runs[0], runs[1]);
}

#[test]
fn dotgraph_smoke() {
    let empty = BstTree::new();
    let mut out = String::new();
    empty.dotgraph("t", &mut out).unwrap();
    assert_eq!(out, "digraph \"graph-t\" {}");

    let mut tree = AvlTree::new();
    for value in [2, 1, 3] {
        tree.insert(value).unwrap();
    }
    let mut out = String::new();
    tree.dotgraph("t", &mut out).unwrap();
    assert!(out.contains("[label=\"2\"]"));
    assert!(out.contains("rank=same"));
    assert!(out.contains("shape=point"));
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn bst_reference_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_bst_equivalence(ops);
    }

    #[test]
    fn avl_reference_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_avl_equivalence(ops);
    }

    #[test]
    fn bst_task_snapshot_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_task_equivalence::<BstTree>(model::finalize_valid(ops), false);
    }

    #[test]
    fn avl_task_snapshot_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_task_equivalence::<AvlTree>(model::finalize_valid(ops), true);
    }
}
