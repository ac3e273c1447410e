//! Typed, append-only storage for graph nodes.
//!
//! The type model is cyclic (a type lists its generic parameters, each parameter points back at
//! its owner; a nested type points at its declaring type, which lists it). Nodes live in an
//! [`Arena`] and refer to each other through small copyable ids, so back-references never form
//! ownership cycles. Nodes are never removed; an id stays valid for the lifetime of its arena.

use std::{
    marker::PhantomData,
    ops::{Index, IndexMut},
};

/// An id minted by an [`Arena`].
pub trait ArenaId: Copy {
    /// Build the id for slot `index`.
    fn from_index(index: usize) -> Self;

    /// The slot this id refers to.
    fn index(self) -> usize;
}

/// Append-only storage addressed by a typed id.
#[derive(Debug, Clone)]
pub struct Arena<I, T> {
    items: Vec<T>,
    _marker: PhantomData<fn() -> I>,
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Arena {
            items: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Number of stored nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Store `item` and return its id.
    pub fn alloc(&mut self, item: T) -> I {
        let id = I::from_index(self.items.len());
        self.items.push(item);
        id
    }

    /// Look up a node, returning `None` for an id from another arena.
    #[must_use]
    pub fn get(&self, id: I) -> Option<&T> {
        self.items.get(id.index())
    }

    /// Mutable variant of [`Arena::get`].
    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.items.get_mut(id.index())
    }

    /// Iterate over every node with its id, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| (I::from_index(index), item))
    }
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Arena::new()
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        match self.items.get(id.index()) {
            Some(item) => item,
            None => panic!("arena id {} out of range ({} nodes)", id.index(), self.items.len()),
        }
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        let len = self.items.len();
        match self.items.get_mut(id.index()) {
            Some(item) => item,
            None => panic!("arena id {} out of range ({len} nodes)", id.index()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    arena_id!(
        /// Test id
        NodeId
    );

    #[test]
    fn test_alloc_and_index() {
        let mut arena: Arena<NodeId, &str> = Arena::new();
        let a = arena.alloc("a");
        let b = arena.alloc("b");

        assert_eq!(arena.len(), 2);
        assert_eq!(arena[a], "a");
        assert_eq!(arena[b], "b");
        assert_eq!(b.index(), 1);

        arena[a] = "c";
        assert_eq!(arena.get(a), Some(&"c"));
        assert!(arena.get(NodeId(7)).is_none());
        assert_eq!(
            arena.iter().map(|(id, item)| (id, *item)).collect::<Vec<_>>(),
            vec![(a, "c"), (b, "b")]
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_foreign_id_panics() {
        let arena: Arena<NodeId, u8> = Arena::new();
        let _ = arena[NodeId(0)];
    }
}
