use core::{cmp::Ordering, ptr::NonNull};

use crate::{
    error::TreeError,
    iter::InOrderIter,
    node::{Dir, Link, Node, NodeRef},
};

/// Link structure and relinking primitives shared by the search trees.
///
/// Owns every node reachable from `root`. All pointer surgery lives
/// here; the public tree types decide when to rebalance.
pub(crate) struct TreeCore {
    pub(crate) root: Link,
    pub(crate) len: usize,
}

impl TreeCore {
    pub(crate) const fn new() -> TreeCore {
        TreeCore { root: None, len: 0 }
    }

    pub(crate) fn root_ref(&self) -> NodeRef<'_> {
        NodeRef::new(self.root)
    }

    /// Standard binary search descent. Returns the topmost node holding
    /// `value`, or `None` if absent.
    pub(crate) fn search(&self, value: i64) -> Link {
        let mut cur = self.root;

        while let Some(node) = cur {
            let node = unsafe { node.as_ref() };
            cur = match value.cmp(&node.value) {
                Ordering::Less => node.left(),
                Ordering::Equal => break,
                Ordering::Greater => node.right(),
            };
        }

        cur
    }

    /// Descends from the root comparing values (ties go right) and links
    /// a freshly allocated node into the nil slot found there.
    pub(crate) fn insert_value(&mut self, value: i64) -> NonNull<Node> {
        let node = Node::alloc(value);

        let mut parent: Link = None;
        let mut cur = self.root;
        while let Some(step) = cur {
            parent = cur;
            let step = unsafe { step.as_ref() };
            cur = if value < step.value {
                step.left()
            } else {
                step.right()
            };
        }

        unsafe {
            (*node.as_ptr()).set_parent(parent);
            match parent {
                None => self.root = Some(node),
                Some(parent) => {
                    let dir = if value < (*parent.as_ptr()).value {
                        Dir::Left
                    } else {
                        Dir::Right
                    };
                    (*parent.as_ptr()).set_child(dir, Some(node));
                }
            }
        }

        self.len += 1;
        node
    }

    fn which_child(parent: NonNull<Node>, child: NonNull<Node>) -> Dir {
        if unsafe { parent.as_ref() }.left() == Some(child) {
            Dir::Left
        } else {
            Dir::Right
        }
    }

    /// Replaces the subtree rooted at `to` with the subtree rooted at
    /// `from` in `to`'s parent slot (or at the tree root). `to`'s own
    /// links are left untouched.
    pub(crate) fn transplant(&mut self, to: NonNull<Node>, from: Link) {
        unsafe {
            let parent = (*to.as_ptr()).parent();
            match parent {
                None => self.root = from,
                Some(parent) => {
                    let dir = Self::which_child(parent, to);
                    (*parent.as_ptr()).set_child(dir, from);
                }
            }
            if let Some(from) = from {
                (*from.as_ptr()).set_parent(parent);
            }
        }
    }

    /// Rotates the subtree rooted at `node` in direction `dir`, promoting
    /// the opposite child into `node`'s place. Returns the new subtree
    /// root.
    pub(crate) fn rotate(
        &mut self,
        node: NonNull<Node>,
        dir: Dir,
    ) -> Result<NonNull<Node>, TreeError> {
        unsafe {
            let up = (*node.as_ptr()).child(!dir).ok_or(match dir {
                Dir::Right => TreeError::InvalidRotation(
                    "right rotate on a node that does not have a left child",
                ),
                Dir::Left => TreeError::InvalidRotation(
                    "left rotate on a node that does not have a right child",
                ),
            })?;

            // The inner grandchild crosses over to `node`.
            let across = (*up.as_ptr()).child(dir);
            (*node.as_ptr()).set_child(!dir, across);
            if let Some(across) = across {
                (*across.as_ptr()).set_parent(Some(node));
            }

            let parent = (*node.as_ptr()).set_parent(Some(up));
            match parent {
                None => self.root = Some(up),
                Some(parent) => {
                    let pdir = Self::which_child(parent, node);
                    (*parent.as_ptr()).set_child(pdir, Some(up));
                }
            }
            (*up.as_ptr()).set_parent(parent);
            (*up.as_ptr()).set_child(dir, Some(node));

            Ok(up)
        }
    }

    /// Returns the minimum node of the subtree rooted at `node`.
    pub(crate) fn min_node(mut node: NonNull<Node>) -> NonNull<Node> {
        while let Some(left) = unsafe { node.as_ref() }.left() {
            node = left;
        }
        node
    }

    /// Returns the maximum node of the subtree rooted at `node`.
    pub(crate) fn max_node(mut node: NonNull<Node>) -> NonNull<Node> {
        while let Some(right) = unsafe { node.as_ref() }.right() {
            node = right;
        }
        node
    }

    /// Unlinks and frees the topmost node holding `value`, following the
    /// usual three-case discipline: a node with fewer than two children
    /// is replaced by its other child; a node with two children is
    /// replaced by its successor, the minimum of its right subtree.
    ///
    /// Returns the node whose subtree shrank, from which an upward
    /// rebalancing walk must start.
    pub(crate) fn remove_value(&mut self, value: i64) -> Result<Link, TreeError> {
        let node = self
            .search(value)
            .ok_or(TreeError::ValueNotFound(value))?;

        unsafe {
            let left = (*node.as_ptr()).left();
            let right = (*node.as_ptr()).right();

            let start = if left.is_none() {
                let parent = (*node.as_ptr()).parent();
                self.transplant(node, right);
                parent
            } else if right.is_none() {
                let parent = (*node.as_ptr()).parent();
                self.transplant(node, left);
                parent
            } else {
                let right = right.unwrap();
                let successor = Self::min_node(right);

                let start;
                if successor != right {
                    start = (*successor.as_ptr()).parent();
                    self.transplant(successor, (*successor.as_ptr()).right());
                    (*successor.as_ptr()).set_child(Dir::Right, Some(right));
                    (*right.as_ptr()).set_parent(Some(successor));
                } else {
                    start = Some(successor);
                }

                self.transplant(node, Some(successor));
                (*successor.as_ptr()).set_child(Dir::Left, left);
                if let Some(left) = left {
                    (*left.as_ptr()).set_parent(Some(successor));
                }

                start
            };

            drop(Node::dealloc(node));
            self.len -= 1;

            Ok(start)
        }
    }

    /// Removes and frees every node without recursing.
    pub(crate) fn clear(&mut self) {
        let mut opt_cur = self.root;

        while let Some(cur) = opt_cur {
            unsafe {
                // Descend to the minimum and elevate its right child
                // (which may be nil) into its place.
                let cur = Self::min_node(cur);
                let parent = (*cur.as_ptr()).parent();
                let right = (*cur.as_ptr()).right();

                match parent {
                    None => self.root = right,
                    Some(parent) => {
                        let dir = Self::which_child(parent, cur);
                        (*parent.as_ptr()).set_child(dir, right);
                    }
                }
                if let Some(right) = right {
                    (*right.as_ptr()).set_parent(parent);
                }

                drop(Node::dealloc(cur));
                self.len -= 1;

                // If the node had no right child, climb to the parent. If
                // it had no parent either, the tree is empty.
                opt_cur = right.or(parent);
            }
        }

        debug_assert!(self.root.is_none());
        debug_assert_eq!(self.len, 0);
    }

    pub(crate) fn iter(&self) -> InOrderIter<'_> {
        InOrderIter::new(self)
    }

    /// Verifies the search-tree ordering, parent links and node count,
    /// and with `check_depth` also the stored depths and the balance
    /// bound.
    pub(crate) fn assert_invariants(&self, check_depth: bool) {
        match self.root {
            None => assert_eq!(self.len, 0, "empty tree with a nonzero length"),
            Some(root) => {
                assert!(
                    unsafe { root.as_ref() }.parent().is_none(),
                    "root has a parent"
                );
                let (count, _) = unsafe { Self::check_subtree(root, None, None, check_depth) };
                assert_eq!(count, self.len, "node count out of sync");
            }
        }
    }

    unsafe fn check_subtree(
        node: NonNull<Node>,
        lower: Option<i64>,
        upper: Option<i64>,
        check_depth: bool,
    ) -> (usize, i8) {
        let n = unsafe { node.as_ref() };

        if let Some(lower) = lower {
            assert!(n.value >= lower, "right subtree holds a value below its ancestor");
        }
        if let Some(upper) = upper {
            assert!(n.value < upper, "left subtree holds a value not below its ancestor");
        }

        let mut count = 1;
        let mut depths = [-1i8; 2];

        for dir in [Dir::Left, Dir::Right] {
            if let Some(child) = n.child(dir) {
                assert_eq!(
                    unsafe { child.as_ref() }.parent(),
                    Some(node),
                    "child's parent link does not point back"
                );

                let (lo, hi) = match dir {
                    Dir::Left => (lower, Some(n.value)),
                    Dir::Right => (Some(n.value), upper),
                };
                let (child_count, child_depth) =
                    unsafe { Self::check_subtree(child, lo, hi, check_depth) };
                count += child_count;
                depths[dir as usize] = child_depth;
            }
        }

        let depth = depths[0].max(depths[1]) + 1;
        if check_depth {
            assert_eq!(n.depth, depth, "stored depth is stale");
            assert!(
                (depths[0] - depths[1]).abs() <= 1,
                "subtree depths differ by more than one"
            );
        }

        (count, depth)
    }
}

impl Drop for TreeCore {
    fn drop(&mut self) {
        self.clear();
    }
}

/// A plain binary search tree following the usual insert/delete
/// discipline, with no rebalancing.
///
/// Equal values are allowed; ties descend into the right subtree.
pub struct BstTree {
    pub(crate) core: TreeCore,
}

impl BstTree {
    /// Returns a new empty tree.
    pub const fn new() -> BstTree {
        BstTree {
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

    /// Inserts `value` as a new leaf.
    pub fn insert(&mut self, value: i64) {
        self.core.insert_value(value);
    }

    /// Deletes one occurrence of `value`.
    pub fn delete(&mut self, value: i64) -> Result<(), TreeError> {
        self.core.remove_value(value).map(|_| ())
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
        self.core.assert_invariants(false);
    }
}

impl Default for BstTree {
    fn default() -> BstTree {
        BstTree::new()
    }
}
