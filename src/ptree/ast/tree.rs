//! Arena view over the flat node sequence
//!
//!     Hierarchy is never stored: it is derived from the pre-order sequence and node depths with
//!     a depth stack. Each node attaches to the nearest preceding node that is shallower than it,
//!     so a depth jump still yields a tree (the jump itself is reported by the builder).
//!
//!         index   depth   name          parent
//!         0       0       src/          -
//!         1       1       main.rs       0
//!         2       1       lib/          0
//!         3       2       mod.rs        2
//!         4       0       readme.md     -
use std::cmp::Ordering;

use super::Node;
use crate::ptree::naming::{DIR_MARKER, META_MARKER};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    /// Top-level nodes (children of the root), in source order
    pub roots: Vec<usize>,
    pub children: Vec<Vec<usize>>,
    pub parents: Vec<Option<usize>>,
}

impl Tree {
    pub fn build(nodes: &[Node]) -> Self {
        let mut tree = Tree {
            roots: Vec::new(),
            children: vec![Vec::new(); nodes.len()],
            parents: vec![None; nodes.len()],
        };
        let mut stack: Vec<usize> = Vec::new();
        for (index, node) in nodes.iter().enumerate() {
            while let Some(&top) = stack.last() {
                if nodes[top].depth >= node.depth {
                    stack.pop();
                } else {
                    break;
                }
            }
            match stack.last() {
                Some(&parent) => {
                    tree.children[parent].push(index);
                    tree.parents[index] = Some(parent);
                }
                None => tree.roots.push(index),
            }
            stack.push(index);
        }
        tree
    }

    /// Every sibling group: the top level first, then each parent's children in source order.
    pub fn sibling_groups(&self) -> impl Iterator<Item = &[usize]> {
        std::iter::once(self.roots.as_slice())
            .chain(self.children.iter().map(Vec::as_slice))
            .filter(|group| !group.is_empty())
    }
}

/// Canonical sibling order: directories before files, then alphabetical with markers stripped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    is_file: bool,
    name: String,
}

impl SortKey {
    pub fn new(name: &str, is_dir: bool, case_sensitive: bool) -> Self {
        let stripped = name
            .strip_suffix(META_MARKER)
            .or_else(|| name.strip_suffix(DIR_MARKER))
            .unwrap_or(name);
        Self {
            is_file: !is_dir,
            name: if case_sensitive {
                stripped.to_string()
            } else {
                stripped.to_lowercase()
            },
        }
    }

    pub fn of(node: &Node, case_sensitive: bool) -> Self {
        Self::new(&node.name, node.is_directory(), case_sensitive)
    }
}

pub fn compare_siblings(a: &Node, b: &Node, case_sensitive: bool) -> Ordering {
    SortKey::of(a, case_sensitive).cmp(&SortKey::of(b, case_sensitive))
}
