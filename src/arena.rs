//! Typed arena used as backing storage for linked structures.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object allocated in a `TypedArena<T>`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Entry {
    index: usize,
}

enum Block<T> {
    Occupied(T),
    Vacant(Option<usize>),
}

/// An allocator that only allocates a single type of object.
///
/// Objects live in one contiguous `Vec`. Freed blocks are threaded into a free list and are
/// handed out again before the vector grows, so an `Entry` stays valid until it is freed, no
/// matter how many other objects are allocated or freed in the meantime. All objects are dropped
/// when the arena is dropped.
///
/// # Examples
///
/// ```
/// use rb_collections::arena::TypedArena;
///
/// let mut arena = TypedArena::new();
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(&x), 2);
/// assert!(arena.is_empty());
/// ```
pub struct TypedArena<T> {
    head: Option<usize>,
    blocks: Vec<Block<T>>,
    len: usize,
}

impl<T> TypedArena<T> {
    /// Constructs a new, empty `TypedArena<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new();
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Constructs a new, empty `TypedArena<T>` that can hold `capacity` objects without
    /// reallocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::with_capacity(1024);
    /// assert!(arena.capacity() >= 1024);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        TypedArena {
            head: None,
            blocks: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    /// Allocates an object in the arena and returns its `Entry`. Vacant blocks are reused before
    /// new ones are appended.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(&x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> Entry {
        self.len += 1;
        match self.head.take() {
            None => {
                self.blocks.push(Block::Occupied(value));
                Entry {
                    index: self.blocks.len() - 1,
                }
            },
            Some(index) => {
                match mem::replace(&mut self.blocks[index], Block::Occupied(value)) {
                    Block::Vacant(next) => self.head = next,
                    Block::Occupied(_) => panic!("Expected a vacant block."),
                }
                Entry { index }
            },
        }
    }

    /// Deallocates an object in the arena and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `entry` does not refer to an occupied block.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(&x), 0);
    /// ```
    pub fn free(&mut self, entry: &Entry) -> T {
        match self.blocks.get(entry.index) {
            Some(Block::Occupied(_)) => {},
            Some(Block::Vacant(_)) => panic!("Error: attempting to free vacant block."),
            None => panic!("Error: attempting to free invalid block."),
        }
        let old_block = mem::replace(&mut self.blocks[entry.index], Block::Vacant(self.head));
        self.head = Some(entry.index);
        self.len -= 1;
        match old_block {
            Block::Occupied(value) => value,
            Block::Vacant(_) => unreachable!(),
        }
    }

    /// Returns an immutable reference to an object in the arena, or `None` if the entry does
    /// not refer to an occupied block.
    pub fn get(&self, entry: &Entry) -> Option<&T> {
        match self.blocks.get(entry.index) {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the arena, or `None` if the entry does not
    /// refer to an occupied block.
    pub fn get_mut(&mut self, entry: &Entry) -> Option<&mut T> {
        match self.blocks.get_mut(entry.index) {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of objects the arena can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.blocks.capacity()
    }

    /// Drops every object in the arena. Previously issued entries become invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new();
    /// let x = arena.allocate(0);
    /// arena.clear();
    /// assert_eq!(arena.get(&x), None);
    /// ```
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.head = None;
        self.len = 0;
    }
}

impl<T> Default for TypedArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Entry> for TypedArena<T> {
    type Output = T;

    fn index(&self, entry: Entry) -> &Self::Output {
        self.get(&entry).expect("Error: entry out of bounds.")
    }
}

impl<T> IndexMut<Entry> for TypedArena<T> {
    fn index_mut(&mut self, entry: Entry) -> &mut Self::Output {
        self.get_mut(&entry).expect("Error: entry out of bounds.")
    }
}

#[cfg(test)]
mod tests {
    use super::Entry;
    use super::TypedArena;

    #[test]
    #[should_panic]
    fn test_free_invalid_block() {
        let mut arena: TypedArena<u32> = TypedArena::new();
        arena.free(&Entry { index: 0 });
    }

    #[test]
    #[should_panic]
    fn test_free_vacant_block() {
        let mut arena = TypedArena::new();
        let entry = arena.allocate(0);
        arena.free(&entry);
        arena.free(&entry);
    }

    #[test]
    fn test_allocate() {
        let mut arena = TypedArena::new();
        assert_eq!(arena.allocate(0), Entry { index: 0 });
        assert_eq!(arena.allocate(0), Entry { index: 1 });
        assert_eq!(arena.allocate(0), Entry { index: 2 });
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_free_reuses_blocks_in_lifo_order() {
        let mut arena = TypedArena::new();
        let a = arena.allocate(0);
        let b = arena.allocate(1);
        arena.allocate(2);

        assert_eq!(arena.free(&a), 0);
        assert_eq!(arena.free(&b), 1);
        assert_eq!(arena.len(), 1);

        assert_eq!(arena.allocate(3), b);
        assert_eq!(arena.allocate(4), a);
        assert_eq!(arena.allocate(5), Entry { index: 3 });
    }

    #[test]
    fn test_get_vacant_block() {
        let mut arena = TypedArena::new();
        let entry = arena.allocate(0);
        arena.free(&entry);
        assert_eq!(arena.get(&entry), None);
        assert_eq!(arena.get_mut(&entry), None);
    }

    #[test]
    fn test_get_invalid_block() {
        let arena: TypedArena<u32> = TypedArena::new();
        assert_eq!(arena.get(&Entry { index: 0 }), None);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = TypedArena::new();
        let entry = arena.allocate(0);
        *arena.get_mut(&entry).unwrap() = 1;
        assert_eq!(arena[entry], 1);
    }

    #[test]
    #[should_panic]
    fn test_index_vacant_block() {
        let mut arena = TypedArena::new();
        let entry = arena.allocate(0);
        arena.free(&entry);
        let value = arena[entry];
        assert_eq!(value, 0);
    }

    #[test]
    fn test_clear() {
        let mut arena = TypedArena::with_capacity(16);
        let entry = arena.allocate(0);
        arena.allocate(1);
        arena.clear();

        assert!(arena.is_empty());
        assert_eq!(arena.get(&entry), None);
        assert_eq!(arena.allocate(2), Entry { index: 0 });
    }
}
