use core::ptr::NonNull;

use crate::{
    error::TreeError,
    iter::InOrderIter,
    node::{Dir, Link, Node, NodeRef},
    tree::TreeCore,
};

// The balance metric is the recomputed subtree depth: `depth(nil) = -1`,
// `depth(leaf) = 0`, `depth(n) = max(depth(left), depth(right)) + 1`.
// A node is out of balance when its children's depths differ by two.

fn depth_of(link: Link) -> i8 {
    link.map(|node| unsafe { node.as_ref() }.depth).unwrap_or(-1)
}

fn update_depth(node: NonNull<Node>) {
    unsafe {
        let left = depth_of((*node.as_ptr()).left());
        let right = depth_of((*node.as_ptr()).right());
        (*node.as_ptr()).depth = left.max(right) + 1;
    }
}

/// A self-balancing search tree in the style of Adelson-Velsky and
/// Landis.
///
/// Every node stores the depth of its subtree; after each insert or
/// delete the depths along the search path are recomputed bottom-up and
/// any node whose children's depths differ by two is rotated back into
/// balance.
///
/// Equal values are allowed; ties descend into the right subtree.
pub struct AvlTree {
    pub(crate) core: TreeCore,
}

impl AvlTree {
    /// Returns a new empty tree.
    pub const fn new() -> AvlTree {
        AvlTree {
            core: TreeCore::new(),
        }
    }

    /// Returns the number of nodes in the tree.
    pub const fn len(&self) -> usize {
        self.core.len
    }

    /// Returns `true` if the tree holds no nodes.
    pub const fn is_empty(&self) -> bool {
        self.core.len == 0
    }

    /// A view of the root node, nil while the tree is empty.
    pub fn root(&self) -> NodeRef<'_> {
        self.core.root_ref()
    }

    /// Looks up `value`, returning the topmost node holding it (nil if
    /// absent).
    pub fn search(&self, value: i64) -> NodeRef<'_> {
        NodeRef::new(self.core.search(value))
    }

    /// Returns `true` if `value` is present.
    pub fn contains(&self, value: i64) -> bool {
        self.core.search(value).is_some()
    }

    /// The smallest value in the tree.
    pub fn first(&self) -> Option<i64> {
        self.core
            .root
            .map(|root| unsafe { TreeCore::min_node(root).as_ref() }.value)
    }

    /// The largest value in the tree.
    pub fn last(&self) -> Option<i64> {
        self.core
            .root
            .map(|root| unsafe { TreeCore::max_node(root).as_ref() }.value)
    }

    /// Inserts `value` and restores balance along the search path.
    ///
    /// An insert needs at most one single or double rotation; the walk
    /// continues to the root afterward only to keep the depths correct.
    pub fn insert(&mut self, value: i64) -> Result<(), TreeError> {
        let node = self.core.insert_value(value);
        let parent = unsafe { node.as_ref() }.parent();
        self.rebalance_from(parent)
    }

    /// Deletes one occurrence of `value` and restores balance starting
    /// at the node whose subtree shrank.
    pub fn delete(&mut self, value: i64) -> Result<(), TreeError> {
        let start = self.core.remove_value(value)?;
        self.rebalance_from(start)
    }

    /// Visits every value in ascending order.
    pub fn iter(&self) -> InOrderIter<'_> {
        self.core.iter()
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        self.core.clear();
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        self.core.assert_invariants(true);
    }

    /// Walks from `cur` to the root, recomputing each node's depth and
    /// fixing any two-deep imbalance on the way. Deletions can leave
    /// several ancestors unbalanced, so the walk never stops early.
    fn rebalance_from(&mut self, mut cur: Link) -> Result<(), TreeError> {
        while let Some(node) = cur {
            let node = self.restore_balance(node)?;
            cur = unsafe { node.as_ref() }.parent();
        }
        Ok(())
    }

    /// Recomputes `node`'s depth and rotates once (singly or doubly) if
    /// its children's depths differ by two. Returns the subtree's new
    /// root.
    fn restore_balance(&mut self, node: NonNull<Node>) -> Result<NonNull<Node>, TreeError> {
        update_depth(node);

        let (left, right) = unsafe {
            let node = node.as_ref();
            (depth_of(node.left()), depth_of(node.right()))
        };

        if left == right + 2 {
            self.balance_left(node)
        } else if right == left + 2 {
            self.balance_right(node)
        } else {
            Ok(node)
        }
    }

    /// The left subtree is two levels deeper than the right.
    fn balance_left(&mut self, node: NonNull<Node>) -> Result<NonNull<Node>, TreeError> {
        let left = unsafe { node.as_ref() }.left().ok_or(TreeError::InvalidRotation(
            "right rotate on a node that does not have a left child",
        ))?;

        let (ll, lr) = unsafe {
            let left = left.as_ref();
            (depth_of(left.left()), depth_of(left.right()))
        };

        if ll >= lr {
            // Left-leaning or even: one right rotation.
            let up = self.core.rotate(node, Dir::Right)?;
            update_depth(node);
            update_depth(up);
            Ok(up)
        } else {
            // The left child leans right: rotate it left first, then the
            // grandchild ends up on top with `left` and `node` below it.
            self.core.rotate(left, Dir::Left)?;
            let up = self.core.rotate(node, Dir::Right)?;
            update_depth(left);
            update_depth(node);
            update_depth(up);
            Ok(up)
        }
    }

    /// The right subtree is two levels deeper than the left.
    fn balance_right(&mut self, node: NonNull<Node>) -> Result<NonNull<Node>, TreeError> {
        let right = unsafe { node.as_ref() }.right().ok_or(TreeError::InvalidRotation(
            "left rotate on a node that does not have a right child",
        ))?;

        let (rl, rr) = unsafe {
            let right = right.as_ref();
            (depth_of(right.left()), depth_of(right.right()))
        };

        if rl <= rr {
            // Right-leaning or even: one left rotation.
            let up = self.core.rotate(node, Dir::Left)?;
            update_depth(node);
            update_depth(up);
            Ok(up)
        } else {
            // The right child leans left: rotate it right first.
            self.core.rotate(right, Dir::Right)?;
            let up = self.core.rotate(node, Dir::Left)?;
            update_depth(node);
            update_depth(right);
            update_depth(up);
            Ok(up)
        }
    }
}

impl Default for AvlTree {
    fn default() -> AvlTree {
        AvlTree::new()
    }
}
