use crate::{
    avl::AvlTree,
    error::TreeError,
    node::NodeRef,
    op::{Operation, OperationKind},
    tree::BstTree,
};

/// An exercise algorithm replayed step by step for rendering.
///
/// A run is driven by calling [`advance`] until it returns `Ok(None)`;
/// each intermediate call applies exactly one step and exposes one
/// snapshot of the algorithm state. Snapshots borrow the engine, so a
/// snapshot must be fully consumed before the next step can be applied.
///
/// [`advance`]: Algorithm::advance
pub trait Algorithm {
    /// One observation of the algorithm state, yielded after a step has
    /// been fully applied.
    type Snapshot<'a>
    where
        Self: 'a;

    /// Error aborting a run.
    type Error;

    /// Resets the run to its initial state, discarding all progress.
    fn restart(&mut self);

    /// Applies the next step and exposes the state it produced, or
    /// `Ok(None)` once every step has been applied.
    ///
    /// A failing step yields no snapshot and leaves the run stuck at the
    /// failure; only [`restart`](Algorithm::restart) recovers.
    fn advance(&mut self) -> Result<Option<Self::Snapshot<'_>>, Self::Error>;
}

/// Search trees a [`TreeTask`] can replay insert/delete operations
/// against.
pub trait OperationTree: Default {
    /// Removes every node, returning the tree to its empty state.
    fn clear(&mut self);

    /// Inserts `value`.
    fn insert(&mut self, value: i64) -> Result<(), TreeError>;

    /// Deletes one occurrence of `value`.
    fn delete(&mut self, value: i64) -> Result<(), TreeError>;

    /// A view of the current root, nil while the tree is empty.
    fn root(&self) -> NodeRef<'_>;
}

impl OperationTree for BstTree {
    fn clear(&mut self) {
        BstTree::clear(self);
    }

    fn insert(&mut self, value: i64) -> Result<(), TreeError> {
        BstTree::insert(self, value);
        Ok(())
    }

    fn delete(&mut self, value: i64) -> Result<(), TreeError> {
        BstTree::delete(self, value)
    }

    fn root(&self) -> NodeRef<'_> {
        BstTree::root(self)
    }
}

impl OperationTree for AvlTree {
    fn clear(&mut self) {
        AvlTree::clear(self);
    }

    fn insert(&mut self, value: i64) -> Result<(), TreeError> {
        AvlTree::insert(self, value)
    }

    fn delete(&mut self, value: i64) -> Result<(), TreeError> {
        AvlTree::delete(self, value)
    }

    fn root(&self) -> NodeRef<'_> {
        AvlTree::root(self)
    }
}

/// The tree state after one applied operation, labeled with that
/// operation.
///
/// `root` aliases the task's live tree; the borrow keeps the task from
/// advancing while the snapshot is in use.
pub struct TreeSnapshot<'run> {
    /// The tree's current root.
    pub root: NodeRef<'run>,
    /// The operation that was just applied.
    pub operation: &'run Operation,
}

/// Replays a fixed operation sequence against an owned tree, exposing
/// one snapshot per operation.
///
/// The task owns its tree and updates the root internally; a run is not
/// resumable from the middle, and a fresh [`run`](TreeTask::run) (or
/// [`restart`](Algorithm::restart)) replays from an empty tree.
pub struct TreeTask<T> {
    tree: T,
    operations: Vec<Operation>,
    cursor: usize,
}

/// Insert/delete exercises on a plain binary search tree.
pub type BstTask = TreeTask<BstTree>;

/// Insert/delete exercises on an AVL tree.
pub type AvlTask = TreeTask<AvlTree>;

impl<T: OperationTree> TreeTask<T> {
    /// Creates a task replaying `operations` against an initially empty
    /// tree.
    pub fn new(operations: Vec<Operation>) -> TreeTask<T> {
        TreeTask {
            tree: T::default(),
            operations,
            cursor: 0,
        }
    }

    /// The operation sequence this task replays.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The tree being operated on.
    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// Replays the whole sequence from an empty tree, feeding each
    /// snapshot to `render` as it is produced.
    pub fn run(&mut self, mut render: impl FnMut(TreeSnapshot<'_>)) -> Result<(), TreeError> {
        self.restart();
        while let Some(snapshot) = self.advance()? {
            render(snapshot);
        }
        Ok(())
    }
}

impl<T: OperationTree> Algorithm for TreeTask<T> {
    type Snapshot<'a>
        = TreeSnapshot<'a>
    where
        Self: 'a;

    type Error = TreeError;

    fn restart(&mut self) {
        self.tree.clear();
        self.cursor = 0;
    }

    fn advance(&mut self) -> Result<Option<TreeSnapshot<'_>>, TreeError> {
        let Some(operation) = self.operations.get(self.cursor) else {
            return Ok(None);
        };

        match operation.kind() {
            OperationKind::Insert => self.tree.insert(operation.value())?,
            OperationKind::Delete => self.tree.delete(operation.value())?,
        }
        self.cursor += 1;

        Ok(Some(TreeSnapshot {
            root: self.tree.root(),
            operation,
        }))
    }
}
