//! Reference-model checks shared by the property tests and the fuzz
//! targets.
//!
//! Scripts are sequences of symbolic operations whose values are
//! resolved against the tree's current contents, so deletes usually hit
//! a live value. Every runner checks the tree against a sorted multiset
//! after each step, through the same read-only node views a renderer
//! would use.

use arbitrary::Arbitrary;
use proptest::strategy::Strategy;

use crate::{
    AvlTree, BstTree, NodeRef, Operation, OperationKind, OperationTree, TreeError, TreeTask,
};

/// Value selector: either an index into the currently held values or a
/// raw value.
#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    Index(usize),
    Random(i64),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0i64..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

/// A tree operation with its value still symbolic.
#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ScriptOp {
    Insert(ItemValue),
    Delete(ItemValue),
}

impl ScriptOp {
    fn finalize(self, held: &[i64]) -> Operation {
        fn get_value(held: &[i64], item: ItemValue) -> i64 {
            match item {
                ItemValue::Index(index) => {
                    if held.is_empty() {
                        index as i64
                    } else {
                        held[index % held.len()]
                    }
                }
                ItemValue::Random(value) => value,
            }
        }

        match self {
            ScriptOp::Insert(item) => Operation::insert(get_value(held, item)),
            ScriptOp::Delete(item) => Operation::delete(get_value(held, item)),
        }
    }
}

pub fn op_strategy() -> impl Strategy<Value = ScriptOp> {
    proptest::prop_oneof![
        value_strategy().prop_map(ScriptOp::Insert),
        value_strategy().prop_map(ScriptOp::Delete),
    ]
}

/// Collects the values of `node`'s subtree in order.
pub fn collect_in_order(node: NodeRef<'_>, out: &mut Vec<i64>) {
    if node.is_nil() {
        return;
    }
    collect_in_order(node.left().unwrap(), out);
    out.push(node.value().unwrap());
    collect_in_order(node.right().unwrap(), out);
}

/// Checks the search-tree ordering: at every node, the left subtree is
/// below the node's value and the right subtree is not.
pub fn check_search_tree(root: NodeRef<'_>) {
    check_search_tree_in(root, None, None);
}

fn check_search_tree_in(node: NodeRef<'_>, lower: Option<i64>, upper: Option<i64>) {
    if node.is_nil() {
        return;
    }

    let value = node.value().unwrap();
    if let Some(lower) = lower {
        assert!(value >= lower, "right subtree holds a value below its ancestor");
    }
    if let Some(upper) = upper {
        assert!(value < upper, "left subtree holds a value not below its ancestor");
    }

    check_search_tree_in(node.left().unwrap(), lower, Some(value));
    check_search_tree_in(node.right().unwrap(), Some(value), upper);
}

/// Checks that every child's parent link points back at the node holding
/// it and that the root's parent is nil.
pub fn check_parent_links(root: NodeRef<'_>) {
    if root.is_nil() {
        return;
    }
    assert!(root.parent().unwrap().is_nil(), "root has a real parent");
    check_parent_links_in(root);
}

fn check_parent_links_in(node: NodeRef<'_>) {
    for child in [node.left().unwrap(), node.right().unwrap()] {
        if !child.is_nil() {
            assert!(
                child.parent().unwrap() == node,
                "child's parent link does not point back"
            );
            check_parent_links_in(child);
        }
    }
}

/// Recomputes subtree depths and checks the balance bound at every node.
/// Returns the subtree's depth.
pub fn check_balanced(node: NodeRef<'_>) -> i8 {
    if node.is_nil() {
        return -1;
    }

    let left = check_balanced(node.left().unwrap());
    let right = check_balanced(node.right().unwrap());
    assert!((left - right).abs() <= 1, "node is out of balance");

    left.max(right) + 1
}

fn insert_sorted(held: &mut Vec<i64>, value: i64) {
    let idx = held.partition_point(|&v| v < value);
    held.insert(idx, value);
}

fn remove_sorted(held: &mut Vec<i64>, value: i64) -> bool {
    match held.binary_search(&value) {
        Ok(idx) => {
            held.remove(idx);
            true
        }
        Err(_) => false,
    }
}

/// Replays `ops` against a fresh tree, checking it against a sorted
/// multiset after every step. Deletes of absent values must fail with
/// `ValueNotFound` and leave the tree untouched.
fn run_equivalence<T, C>(ops: Vec<ScriptOp>, mut check: C)
where
    T: OperationTree,
    C: FnMut(&T),
{
    let mut held: Vec<i64> = Vec::new();
    let mut tree = T::default();

    for (op_id, op) in ops.into_iter().enumerate() {
        let operation = op.finalize(&held);

        match operation.kind() {
            OperationKind::Insert => {
                tree.insert(operation.value()).unwrap();
                insert_sorted(&mut held, operation.value());
            }
            OperationKind::Delete => {
                let expected = remove_sorted(&mut held, operation.value());
                let result = tree.delete(operation.value());
                if expected {
                    assert!(
                        result.is_ok(),
                        "op #{op_id} ({operation}): unexpected {result:?}"
                    );
                } else {
                    assert_eq!(
                        result,
                        Err(TreeError::ValueNotFound(operation.value())),
                        "op #{op_id} ({operation})"
                    );
                }
            }
        }

        let root = tree.root();
        check_search_tree(root);
        check_parent_links(root);

        let mut in_order = Vec::new();
        collect_in_order(root, &mut in_order);
        assert_eq!(
            in_order, held,
            "op #{op_id} ({operation}): in-order sequence diverged"
        );

        check(&tree);
    }
}

/// Replays symbolic ops against a [`BstTree`], checking structure after
/// every step.
pub fn run_bst_equivalence(ops: Vec<ScriptOp>) {
    run_equivalence::<BstTree, _>(ops, |tree| tree.assert_invariants());
}

/// Replays symbolic ops against an [`AvlTree`], additionally checking
/// the balance bound after every step.
pub fn run_avl_equivalence(ops: Vec<ScriptOp>) {
    run_equivalence::<AvlTree, _>(ops, |tree| {
        tree.assert_invariants();
        check_balanced(tree.root());
    });
}

/// Finalizes symbolic ops into a concrete sequence whose deletes always
/// target held values, so a full task run never aborts.
pub fn finalize_valid(ops: Vec<ScriptOp>) -> Vec<Operation> {
    let mut held: Vec<i64> = Vec::new();
    let mut operations = Vec::with_capacity(ops.len());

    for op in ops {
        let mut operation = op.finalize(&held);
        if operation.kind() == OperationKind::Delete && !held.contains(&operation.value()) {
            // Nothing to delete; insert the value instead.
            operation = Operation::insert(operation.value());
        }

        match operation.kind() {
            OperationKind::Insert => insert_sorted(&mut held, operation.value()),
            OperationKind::Delete => {
                remove_sorted(&mut held, operation.value());
            }
        }
        operations.push(operation);
    }

    operations
}

/// Runs a full task over `operations`, checking that exactly one
/// snapshot is produced per operation, labeled with that operation, and
/// that the exposed state matches the reference multiset at every step.
pub fn run_task_equivalence<T: OperationTree>(operations: Vec<Operation>, balanced: bool) {
    let mut task: TreeTask<T> = TreeTask::new(operations.clone());
    let mut held: Vec<i64> = Vec::new();
    let mut seen = 0usize;

    task.run(|snapshot| {
        let operation = &operations[seen];
        assert_eq!(snapshot.operation, operation, "snapshot label out of order");

        match operation.kind() {
            OperationKind::Insert => insert_sorted(&mut held, operation.value()),
            OperationKind::Delete => {
                remove_sorted(&mut held, operation.value());
            }
        }

        let mut in_order = Vec::new();
        collect_in_order(snapshot.root, &mut in_order);
        assert_eq!(in_order, held, "snapshot state diverged at step {seen}");

        check_search_tree(snapshot.root);
        check_parent_links(snapshot.root);
        if balanced {
            check_balanced(snapshot.root);
        }

        seen += 1;
    })
    .unwrap();

    assert_eq!(seen, operations.len(), "one snapshot per operation");
}
