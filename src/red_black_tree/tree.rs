use crate::arena::{Entry, TypedArena};
use crate::red_black_tree::node::{Color, Node};
use crate::red_black_tree::{Error, Result};
use log::trace;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::vec;

/// An ordered multiset implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree that colors every node red or black
/// and maintains the following invariants:
///
/// 1. The root is black.
/// 2. Absent children count as black leaves.
/// 3. A red node never has a red child.
/// 4. Every path from a node down to a leaf crosses the same number of black nodes.
///
/// Equal keys are allowed. A key equal to an existing key is placed after it in ascending order.
///
/// # Examples
///
/// ```
/// use rb_collections::red_black_tree::RedBlackTree;
///
/// let mut tree = RedBlackTree::new();
/// tree.insert(3);
/// tree.insert(0);
/// tree.insert(3);
///
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.linearize(), vec![&0, &3, &3]);
///
/// assert_eq!(tree.get(&0), Some(&0));
/// assert_eq!(tree.delete(&0), Some(0));
/// assert_eq!(tree.delete(&1), None);
/// ```
pub struct RedBlackTree<T> {
    root: Option<Entry>,
    arena: TypedArena<Node<T>>,
}

impl<T> RedBlackTree<T> {
    /// Constructs a new, empty `RedBlackTree<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = RedBlackTree::new();
    /// ```
    pub fn new() -> Self {
        RedBlackTree {
            root: None,
            arena: TypedArena::new(),
        }
    }

    /// Constructs a new, empty `RedBlackTree<T>` that can hold `capacity` keys before its node
    /// storage reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = RedBlackTree::with_capacity(1024);
    /// assert!(tree.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        RedBlackTree {
            root: None,
            arena: TypedArena::with_capacity(capacity),
        }
    }

    fn color(&self, entry: Option<Entry>) -> Color {
        entry.map_or(Color::Black, |entry| self.arena[entry].color)
    }

    fn is_red(&self, entry: Option<Entry>) -> bool {
        self.color(entry) == Color::Red
    }

    fn is_black(&self, entry: Option<Entry>) -> bool {
        self.color(entry) == Color::Black
    }

    fn set_color(&mut self, entry: Option<Entry>, color: Color) {
        if let Some(entry) = entry {
            self.arena[entry].color = color;
        }
    }

    fn parent(&self, entry: Entry) -> Entry {
        self.arena[entry]
            .parent
            .expect("Expected node to have a parent.")
    }

    // Points the child link of `parent` that currently holds `old` at `new`. A missing parent
    // means `old` is the root.
    fn replace_child(&mut self, parent: Option<Entry>, old: Entry, new: Option<Entry>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent_node = &mut self.arena[parent];
                if parent_node.left == Some(old) {
                    parent_node.left = new;
                } else {
                    parent_node.right = new;
                }
            },
        }
    }

    fn transplant(&mut self, old: Entry, new: Option<Entry>) {
        let parent = self.arena[old].parent;
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.arena[new].parent = parent;
        }
    }

    // precondition: `x` has a right child
    fn rotate_left(&mut self, x: Entry) {
        let y = self.arena[x]
            .right
            .expect("Expected right child node to be `Some`.");
        trace!("rotating left at {:?}", x);

        let y_left = self.arena[y].left;
        self.arena[x].right = y_left;
        if let Some(y_left) = y_left {
            self.arena[y_left].parent = Some(x);
        }

        let x_parent = self.arena[x].parent;
        self.arena[y].parent = x_parent;
        self.replace_child(x_parent, x, Some(y));

        self.arena[y].left = Some(x);
        self.arena[x].parent = Some(y);
    }

    // precondition: `y` has a left child
    fn rotate_right(&mut self, y: Entry) {
        let x = self.arena[y]
            .left
            .expect("Expected left child node to be `Some`.");
        trace!("rotating right at {:?}", y);

        let x_right = self.arena[x].right;
        self.arena[y].left = x_right;
        if let Some(x_right) = x_right {
            self.arena[x_right].parent = Some(y);
        }

        let y_parent = self.arena[y].parent;
        self.arena[x].parent = y_parent;
        self.replace_child(y_parent, y, Some(x));

        self.arena[x].right = Some(y);
        self.arena[y].parent = Some(x);
    }

    fn minimum(&self, mut entry: Entry) -> Entry {
        while let Some(left) = self.arena[entry].left {
            entry = left;
        }
        entry
    }

    fn maximum(&self, mut entry: Entry) -> Entry {
        while let Some(right) = self.arena[entry].right {
            entry = right;
        }
        entry
    }

    fn successor(&self, entry: Entry) -> Option<Entry> {
        if let Some(right) = self.arena[entry].right {
            return Some(self.minimum(right));
        }

        let mut curr = entry;
        let mut parent = self.arena[curr].parent;
        while let Some(parent_entry) = parent {
            if self.arena[parent_entry].right != Some(curr) {
                break;
            }
            curr = parent_entry;
            parent = self.arena[curr].parent;
        }
        parent
    }

    // Entries of every node in ascending key order, collected with an explicit stack so that the
    // walk does not depend on the depth of the tree.
    fn entries(&self) -> Vec<Entry> {
        let mut ret = Vec::with_capacity(self.len());
        let mut stack = Vec::new();
        let mut curr = self.root;
        loop {
            while let Some(entry) = curr {
                stack.push(entry);
                curr = self.arena[entry].left;
            }
            match stack.pop() {
                Some(entry) => {
                    ret.push(entry);
                    curr = self.arena[entry].right;
                },
                None => return ret,
            }
        }
    }

    /// Inserts a key into the tree. Keys equal to an existing key are kept and ordered after it.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, key: T)
    where
        T: Ord,
    {
        let mut parent = None;
        let mut is_left = false;
        let mut curr = self.root;
        while let Some(entry) = curr {
            let node = &self.arena[entry];
            parent = Some(entry);
            is_left = key < node.key;
            curr = if is_left { node.left } else { node.right };
        }

        let new_entry = self.arena.allocate(Node::new(key, parent));
        match parent {
            None => self.root = Some(new_entry),
            Some(parent) if is_left => self.arena[parent].left = Some(new_entry),
            Some(parent) => self.arena[parent].right = Some(new_entry),
        }

        self.insert_fixup(new_entry);
    }

    fn insert_fixup(&mut self, mut node: Entry) {
        while let Some(parent) = self.arena[node].parent {
            if self.arena[parent].color == Color::Black {
                break;
            }
            // a red node is never the root, so it has a parent
            let grandparent = self.parent(parent);

            if self.arena[grandparent].left == Some(parent) {
                let uncle = self.arena[grandparent].right;
                if self.is_red(uncle) {
                    trace!("insert fixup: recoloring red uncle of {:?}", node);
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(grandparent), Color::Red);
                    node = grandparent;
                } else {
                    if self.arena[parent].right == Some(node) {
                        node = parent;
                        self.rotate_left(node);
                    }
                    let parent = self.parent(node);
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(Some(grandparent), Color::Red);
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.arena[grandparent].left;
                if self.is_red(uncle) {
                    trace!("insert fixup: recoloring red uncle of {:?}", node);
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(grandparent), Color::Red);
                    node = grandparent;
                } else {
                    if self.arena[parent].left == Some(node) {
                        node = parent;
                        self.rotate_right(node);
                    }
                    let parent = self.parent(node);
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(Some(grandparent), Color::Red);
                    self.rotate_left(grandparent);
                }
            }
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    fn find<V>(&self, key: &V) -> Option<Entry>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(entry) = curr {
            let node = &self.arena[entry];
            curr = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(entry),
            };
        }
        None
    }

    /// Returns a reference to a key in the tree equal to `key`, or `None` if no such key exists.
    /// If several equal keys exist, the one closest to the root is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.get(&1), Some(&1));
    /// assert_eq!(tree.get(&2), None);
    /// ```
    pub fn get<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.find(key).map(|entry| &self.arena[entry].key)
    }

    /// Checks if a key exists in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// assert!(!tree.contains(&0));
    /// assert!(tree.contains(&1));
    /// ```
    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Removes one key equal to `key` from the tree and returns it. Returns `None` and leaves the
    /// tree untouched if no such key exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.delete(&1), Some(1));
    /// assert_eq!(tree.delete(&1), None);
    /// ```
    pub fn delete<V>(&mut self, key: &V) -> Option<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let entry = self.find(key)?;
        Some(self.delete_node(entry))
    }

    fn delete_node(&mut self, node: Entry) -> T {
        trace!("deleting node {:?}", node);
        let Node {
            color,
            parent,
            left,
            right,
            ..
        } = self.arena[node];

        let mut removed_color = color;
        let fixup_node;
        let fixup_parent;

        match (left, right) {
            (None, _) => {
                fixup_node = right;
                fixup_parent = parent;
                self.transplant(node, right);
            },
            (_, None) => {
                fixup_node = left;
                fixup_parent = parent;
                self.transplant(node, left);
            },
            (Some(left), Some(right)) => {
                let successor = self.minimum(right);
                removed_color = self.arena[successor].color;
                fixup_node = self.arena[successor].right;

                if successor == right {
                    fixup_parent = Some(successor);
                } else {
                    fixup_parent = self.arena[successor].parent;
                    self.transplant(successor, fixup_node);
                    self.arena[successor].right = Some(right);
                    self.arena[right].parent = Some(successor);
                }

                self.transplant(node, Some(successor));
                self.arena[successor].left = Some(left);
                self.arena[left].parent = Some(successor);
                self.arena[successor].color = color;
            },
        }

        let removed = self.arena.free(&node);
        if removed_color == Color::Black {
            self.delete_fixup(fixup_node, fixup_parent);
        }
        removed.key
    }

    // `node` is the subtree that lost one black node on every path, and `parent` is its parent.
    // `node` may be absent, in which case `parent` identifies the position of the absent leaf.
    fn delete_fixup(&mut self, mut node: Option<Entry>, mut parent: Option<Entry>) {
        while node != self.root && self.is_black(node) {
            let parent_entry = parent.expect("Expected non-root node to have a parent.");

            if self.arena[parent_entry].left == node {
                let mut sibling = self.arena[parent_entry]
                    .right
                    .expect("Expected sibling of a black-deficient node to be `Some`.");

                if self.arena[sibling].color == Color::Red {
                    trace!("delete fixup: red sibling {:?}", sibling);
                    self.set_color(Some(sibling), Color::Black);
                    self.set_color(Some(parent_entry), Color::Red);
                    self.rotate_left(parent_entry);
                    sibling = self.arena[parent_entry]
                        .right
                        .expect("Expected sibling of a black-deficient node to be `Some`.");
                }

                let Node {
                    left: sibling_left,
                    right: sibling_right,
                    ..
                } = self.arena[sibling];
                if self.is_black(sibling_left) && self.is_black(sibling_right) {
                    self.set_color(Some(sibling), Color::Red);
                    node = Some(parent_entry);
                    parent = self.arena[parent_entry].parent;
                } else {
                    if self.is_black(sibling_right) {
                        self.set_color(sibling_left, Color::Black);
                        self.set_color(Some(sibling), Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.arena[parent_entry]
                            .right
                            .expect("Expected sibling of a black-deficient node to be `Some`.");
                    }

                    let parent_color = self.arena[parent_entry].color;
                    let sibling_right = self.arena[sibling].right;
                    self.set_color(Some(sibling), parent_color);
                    self.set_color(Some(parent_entry), Color::Black);
                    self.set_color(sibling_right, Color::Black);
                    self.rotate_left(parent_entry);
                    node = self.root;
                    parent = None;
                }
            } else {
                let mut sibling = self.arena[parent_entry]
                    .left
                    .expect("Expected sibling of a black-deficient node to be `Some`.");

                if self.arena[sibling].color == Color::Red {
                    trace!("delete fixup: red sibling {:?}", sibling);
                    self.set_color(Some(sibling), Color::Black);
                    self.set_color(Some(parent_entry), Color::Red);
                    self.rotate_right(parent_entry);
                    sibling = self.arena[parent_entry]
                        .left
                        .expect("Expected sibling of a black-deficient node to be `Some`.");
                }

                let Node {
                    left: sibling_left,
                    right: sibling_right,
                    ..
                } = self.arena[sibling];
                if self.is_black(sibling_left) && self.is_black(sibling_right) {
                    self.set_color(Some(sibling), Color::Red);
                    node = Some(parent_entry);
                    parent = self.arena[parent_entry].parent;
                } else {
                    if self.is_black(sibling_left) {
                        self.set_color(sibling_right, Color::Black);
                        self.set_color(Some(sibling), Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.arena[parent_entry]
                            .left
                            .expect("Expected sibling of a black-deficient node to be `Some`.");
                    }

                    let parent_color = self.arena[parent_entry].color;
                    let sibling_left = self.arena[sibling].left;
                    self.set_color(Some(sibling), parent_color);
                    self.set_color(Some(parent_entry), Color::Black);
                    self.set_color(sibling_left, Color::Black);
                    self.rotate_right(parent_entry);
                    node = self.root;
                    parent = None;
                }
            }
        }

        self.set_color(node, Color::Black);
    }

    /// Returns every key of the tree in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(2);
    /// tree.insert(1);
    /// tree.insert(2);
    /// assert_eq!(tree.linearize(), vec![&1, &2, &2]);
    /// ```
    pub fn linearize(&self) -> Vec<&T> {
        self.entries()
            .into_iter()
            .map(|entry| &self.arena[entry].key)
            .collect()
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Clears the tree, removing all keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
    }

    /// Returns the minimum key of the tree. Returns `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// tree.insert(3);
    /// assert_eq!(tree.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.root.map(|root| &self.arena[self.minimum(root)].key)
    }

    /// Returns the maximum key of the tree. Returns `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// tree.insert(3);
    /// assert_eq!(tree.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.root.map(|root| &self.arena[self.maximum(root)].key)
    }

    /// Returns an iterator over the tree. The iterator yields keys in ascending order by
    /// following parent links, so it needs no auxiliary storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(3);
    /// tree.insert(1);
    ///
    /// let mut iterator = tree.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackTreeIter<'_, T> {
        RedBlackTreeIter {
            tree: self,
            next: self.root.map(|root| self.minimum(root)),
            remaining: self.len(),
        }
    }

    /// Walks the whole tree and verifies every red black invariant, the ordering of keys, the
    /// parent back-references, and that no allocated node is unreachable. On success returns the
    /// number of black nodes on every path from the root down to a leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.check_invariants(), Ok(0));
    ///
    /// tree.insert(1);
    /// tree.insert(2);
    /// assert_eq!(tree.check_invariants(), Ok(1));
    /// ```
    pub fn check_invariants(&self) -> Result<usize>
    where
        T: Ord,
    {
        let mut reachable = 0;
        let black_height = match self.root {
            None => 0,
            Some(root) => {
                if self.arena[root].parent.is_some() {
                    return Err(Error::ParentMismatch);
                }
                if self.arena[root].color == Color::Red {
                    return Err(Error::RedRoot);
                }
                self.check_subtree(root, &mut reachable)?
            },
        };

        if reachable != self.arena.len() {
            return Err(Error::LengthMismatch {
                reachable,
                allocated: self.arena.len(),
            });
        }

        let keys = self.linearize();
        if keys.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(Error::OrderViolation);
        }

        Ok(black_height)
    }

    fn check_subtree(&self, entry: Entry, reachable: &mut usize) -> Result<usize> {
        *reachable += 1;
        let node = &self.arena[entry];

        let mut heights = [0; 2];
        for (height, child) in heights.iter_mut().zip([node.left, node.right].iter()) {
            if let Some(child) = *child {
                let child_node = &self.arena[child];
                if child_node.parent != Some(entry) {
                    return Err(Error::ParentMismatch);
                }
                if node.color == Color::Red && child_node.color == Color::Red {
                    return Err(Error::RedViolation);
                }
                *height = self.check_subtree(child, reachable)?;
            }
        }

        if heights[0] != heights[1] {
            return Err(Error::BlackHeightMismatch);
        }

        match node.color {
            Color::Black => Ok(heights[0] + 1),
            Color::Red => Ok(heights[0]),
        }
    }
}

impl<T> IntoIterator for RedBlackTree<T> {
    type IntoIter = RedBlackTreeIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            order: self.entries().into_iter(),
            arena: self.arena,
        }
    }
}

impl<'a, T> IntoIterator for &'a RedBlackTree<T>
where
    T: 'a,
{
    type IntoIter = RedBlackTreeIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RedBlackTree<T>`.
///
/// This iterator traverses the keys of the tree in ascending order and yields owned keys.
pub struct RedBlackTreeIntoIter<T> {
    arena: TypedArena<Node<T>>,
    order: vec::IntoIter<Entry>,
}

impl<T> Iterator for RedBlackTreeIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = &mut self.arena;
        self.order.next().map(|entry| arena.free(&entry).key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<T> ExactSizeIterator for RedBlackTreeIntoIter<T> {}

/// An iterator for `RedBlackTree<T>`.
///
/// This iterator traverses the keys of the tree in ascending order and yields immutable
/// references.
pub struct RedBlackTreeIter<'a, T> {
    tree: &'a RedBlackTree<T>,
    next: Option<Entry>,
    remaining: usize,
}

impl<'a, T> Iterator for RedBlackTreeIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let entry = self.next?;
        self.next = tree.successor(entry);
        self.remaining -= 1;
        Some(&tree.arena[entry].key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for RedBlackTreeIter<'a, T> where T: 'a {}

impl<T> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for RedBlackTree<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T> FromIterator<T> for RedBlackTree<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = RedBlackTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T> fmt::Debug for RedBlackTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
