//! Self-balancing binary search tree that uses a color bit on every node to keep the tree
//! approximately balanced during insertions and deletions.
//!
//! Nodes live in a `TypedArena` and are linked through arena entries. Every node carries a
//! back-reference to its parent so that both fixup passes can walk up the tree iteratively.

mod node;
mod tree;

pub use self::tree::{RedBlackTree, RedBlackTreeIntoIter, RedBlackTreeIter};

use std::error;
use std::fmt;
use std::result;

/// A structural defect found by `RedBlackTree::check_invariants`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The root node is red.
    RedRoot,
    /// A red node has a red child.
    RedViolation,
    /// Two paths from the same node down to a leaf cross a different number of black nodes.
    BlackHeightMismatch,
    /// An in-order walk produced a key that is smaller than its predecessor.
    OrderViolation,
    /// A node's parent back-reference does not point at the node that holds it as a child.
    ParentMismatch,
    /// The number of nodes reachable from the root differs from the number of allocated nodes.
    LengthMismatch { reachable: usize, allocated: usize },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::RedRoot => write!(f, "root node is red"),
            Error::RedViolation => write!(f, "red node has a red child"),
            Error::BlackHeightMismatch => write!(f, "black height differs between subtrees"),
            Error::OrderViolation => write!(f, "keys are not in ascending order"),
            Error::ParentMismatch => write!(f, "parent link does not match child link"),
            Error::LengthMismatch {
                reachable,
                allocated,
            } => write!(
                f,
                "{} nodes reachable from the root, but {} nodes allocated",
                reachable, allocated,
            ),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
