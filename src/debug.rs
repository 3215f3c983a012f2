use core::fmt::{self, Write};
use core::ptr::NonNull;
use std::collections::VecDeque;

use crate::{
    avl::AvlTree,
    node::{Node, NodeRef},
    tree::BstTree,
};

impl NodeRef<'_> {
    /// Writes the subtree as a Graphviz digraph, one `rank=same` row per
    /// level, with a point for every nil child.
    ///
    /// Nodes are numbered in visit order rather than labeled by value,
    /// since equal values may occur more than once.
    pub fn dotgraph<W: Write>(&self, name: &str, mut w: W) -> fmt::Result {
        let root = match self.raw() {
            Some(root) => root,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item {
            Node(u32, NonNull<Node>),
            Missing(u32),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(0, root));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut next_id = 1u32;
        let mut links = String::new();

        while !queue.is_empty() {
            let remaining = queue.len();

            write!(w, "{{rank=same; ")?;

            for _ in 0..remaining {
                let item = queue.pop_front().unwrap();

                let (id, node) = match item {
                    Item::Node(id, node) => (id, node),
                    Item::Missing(id) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                };

                let node = unsafe { node.as_ref() };
                write!(w, "\"graph{name}-{id}\" [label=\"{}\"]; ", node.value)?;

                for child in [node.left(), node.right()] {
                    let child_id = next_id;
                    next_id += 1;

                    match child {
                        Some(child) => {
                            queue.push_back(Item::Node(child_id, child));
                            writeln!(
                                links,
                                "\"graph{name}-{id}\" -> \"graph{name}-{child_id}\";"
                            )?;
                        }
                        None => {
                            queue.push_back(Item::Missing(child_id));
                            writeln!(
                                links,
                                "\"graph{name}-{id}\" -> \"graph{name}-missing{child_id}\";"
                            )?;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}

impl BstTree {
    /// Writes the tree as a Graphviz digraph for debugging.
    pub fn dotgraph<W: Write>(&self, name: &str, w: W) -> fmt::Result {
        self.root().dotgraph(name, w)
    }
}

impl AvlTree {
    /// Writes the tree as a Graphviz digraph for debugging.
    pub fn dotgraph<W: Write>(&self, name: &str, w: W) -> fmt::Result {
        self.root().dotgraph(name, w)
    }
}

fn fmt_node(node: NodeRef<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if node.is_nil() {
        return f.write_str("Nil");
    }

    // The accessors cannot fail after the nil check.
    write!(f, "[{} ", node.value().map_err(|_| fmt::Error)?)?;
    fmt_node(node.left().map_err(|_| fmt::Error)?, f)?;
    f.write_str(" ")?;
    fmt_node(node.right().map_err(|_| fmt::Error)?, f)?;
    f.write_str("]")
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_node(*self, f)
    }
}

impl fmt::Debug for BstTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_node(self.root(), f)
    }
}

impl fmt::Debug for AvlTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_node(self.root(), f)
    }
}
