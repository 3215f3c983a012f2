//! Step-by-step replay of search-tree algorithms for exercise sheets.
//!
//! The crate runs a reference implementation of each algorithm one
//! operation at a time and exposes every intermediate state as a
//! snapshot, which a rendering layer turns into a page of an exercise or
//! solution sheet. Two tree structures are provided — a plain binary
//! search tree ([`BstTree`]) and a self-balancing AVL tree ([`AvlTree`])
//! — together with the task engines ([`BstTask`], [`AvlTask`]) that
//! replay an [`Operation`] sequence against them, and the [`Algorithm`]
//! contract those engines share with other task families.

// Conventions used in comments:
// - The depth of a node `x` is the height of its subtree, with
//   `depth(leaf) = 0` and `depth(nil) = -1`.
// - A node is left-heavy when its left child is deeper than its right.
//
// The fundamental invariants of the trees are:
// 1. Search order: every value left of a node is less than the node's
//    value, and every value right of it is not (ties go right).
// 2. Parent agreement: a child's parent link points at the node holding
//    it, and the root's parent is nil.
// 3. (AVL only) The depths of a node's children differ by at most one.

mod avl;
mod debug;
mod error;
mod iter;
mod node;
mod op;
mod task;
mod tree;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

pub use crate::{
    avl::AvlTree,
    error::TreeError,
    iter::InOrderIter,
    node::NodeRef,
    op::{Operation, OperationKind, ParseOperationError},
    task::{Algorithm, AvlTask, BstTask, OperationTree, TreeSnapshot, TreeTask},
    tree::BstTree,
};
