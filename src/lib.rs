//! An ordered multiset backed by a red black tree with parent back-references.
//!
//! Nodes are stored in a `TypedArena` and refer to each other through arena entries, so the
//! owning child links and the non-owning parent links never alias a live reference.

pub mod arena;
pub mod red_black_tree;
