//! Owner-synchronized member collections.
//!
//! Generic-parameter lists, parameter lists and the local types declared inside a method are
//! stored as [`OwnedCollection`]s. Between mutations every element's stored owner equals the
//! collection's owner and every element's stored position equals its index. Elements are arena
//! ids; the back-references live on the elements themselves and are written through a
//! [`CollectionLinker`], which also invalidates whatever the owner caches about the list.
//!
//! After an insert, remove or replace at index `i`, every element from `i` on is renumbered in
//! one linear pass. Removed and replaced-out elements are unlinked. A frozen collection
//! rejects every structural mutation with a panic.

use std::fmt;

/// Writes element back-references on behalf of an [`OwnedCollection`].
pub trait CollectionLinker<I> {
    /// The kind of owner recorded on elements.
    type Owner: Copy;

    /// Record `owner` and `position` on `item`.
    fn link(&mut self, item: I, owner: Self::Owner, position: usize);

    /// Clear the owner recorded on `item`.
    fn unlink(&mut self, item: I);

    /// Drop any cached state of the owner derived from the list contents.
    fn invalidate(&mut self);
}

/// An ordered list of arena ids kept consistent with the ids' back-references.
#[derive(Clone)]
pub struct OwnedCollection<I, O> {
    owner: O,
    items: Vec<I>,
    frozen: bool,
}

impl<I: Copy + PartialEq, O: Copy> OwnedCollection<I, O> {
    /// Create an empty collection belonging to `owner`.
    #[must_use]
    pub fn new(owner: O) -> Self {
        OwnedCollection {
            owner,
            items: Vec::new(),
            frozen: false,
        }
    }

    /// The declared owner.
    #[must_use]
    pub fn owner(&self) -> O {
        self.owner
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<I> {
        self.items.get(index).copied()
    }

    /// The elements in order.
    #[must_use]
    pub fn as_slice(&self) -> &[I] {
        &self.items
    }

    /// Iterate over the elements in order.
    pub fn iter(&self) -> impl Iterator<Item = I> + '_ {
        self.items.iter().copied()
    }

    /// Index of `item`, if present.
    #[must_use]
    pub fn position_of(&self, item: I) -> Option<usize> {
        self.items.iter().position(|candidate| *candidate == item)
    }

    /// Returns `true` if `item` is an element.
    #[must_use]
    pub fn contains(&self, item: I) -> bool {
        self.position_of(item).is_some()
    }

    /// Returns `true` once [`OwnedCollection::freeze`] has been called.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Reject all further structural mutation.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Append `item`.
    ///
    /// # Panics
    /// Panics if the collection is frozen.
    pub fn push<L>(&mut self, linker: &mut L, item: I)
    where
        L: CollectionLinker<I, Owner = O>,
    {
        let index = self.items.len();
        self.insert(linker, index, item);
    }

    /// Insert `item` at `index`, shifting later elements.
    ///
    /// # Panics
    /// Panics if the collection is frozen or `index > len`.
    pub fn insert<L>(&mut self, linker: &mut L, index: usize, item: I)
    where
        L: CollectionLinker<I, Owner = O>,
    {
        self.ensure_mutable();
        assert!(
            index <= self.items.len(),
            "insert index {index} out of range ({} elements)",
            self.items.len()
        );

        self.items.insert(index, item);
        self.renumber(linker, index);
        linker.invalidate();
    }

    /// Remove and return the element at `index`, clearing its owner.
    ///
    /// # Panics
    /// Panics if the collection is frozen or `index >= len`.
    pub fn remove<L>(&mut self, linker: &mut L, index: usize) -> I
    where
        L: CollectionLinker<I, Owner = O>,
    {
        self.ensure_mutable();
        assert!(
            index < self.items.len(),
            "remove index {index} out of range ({} elements)",
            self.items.len()
        );

        let removed = self.items.remove(index);
        linker.unlink(removed);
        self.renumber(linker, index);
        linker.invalidate();
        removed
    }

    /// Replace the element at `index` with `item`, returning the old element unlinked.
    ///
    /// # Panics
    /// Panics if the collection is frozen or `index >= len`.
    pub fn replace<L>(&mut self, linker: &mut L, index: usize, item: I) -> I
    where
        L: CollectionLinker<I, Owner = O>,
    {
        self.ensure_mutable();
        assert!(
            index < self.items.len(),
            "replace index {index} out of range ({} elements)",
            self.items.len()
        );

        let old = std::mem::replace(&mut self.items[index], item);
        linker.unlink(old);
        self.renumber(linker, index);
        linker.invalidate();
        old
    }

    /// Remove every element, clearing their owners.
    ///
    /// # Panics
    /// Panics if the collection is frozen.
    pub fn clear<L>(&mut self, linker: &mut L)
    where
        L: CollectionLinker<I, Owner = O>,
    {
        self.ensure_mutable();
        for item in self.items.drain(..) {
            linker.unlink(item);
        }
        linker.invalidate();
    }

    fn renumber<L>(&self, linker: &mut L, from: usize)
    where
        L: CollectionLinker<I, Owner = O>,
    {
        for (position, item) in self.items.iter().enumerate().skip(from) {
            linker.link(*item, self.owner, position);
        }
    }

    fn ensure_mutable(&self) {
        assert!(!self.frozen, "attempted to modify a frozen collection");
    }
}

impl<I: fmt::Debug, O: fmt::Debug> fmt::Debug for OwnedCollection<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedCollection")
            .field("owner", &self.owner)
            .field("items", &self.items)
            .field("frozen", &self.frozen)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Recorder {
        links: HashMap<u32, (Option<char>, usize)>,
        invalidations: usize,
    }

    impl CollectionLinker<u32> for Recorder {
        type Owner = char;

        fn link(&mut self, item: u32, owner: char, position: usize) {
            self.links.insert(item, (Some(owner), position));
        }

        fn unlink(&mut self, item: u32) {
            if let Some(entry) = self.links.get_mut(&item) {
                entry.0 = None;
            }
        }

        fn invalidate(&mut self) {
            self.invalidations += 1;
        }
    }

    fn assert_consistent(collection: &OwnedCollection<u32, char>, recorder: &Recorder) {
        for (index, item) in collection.iter().enumerate() {
            assert_eq!(recorder.links[&item], (Some('m'), index));
        }
    }

    #[test]
    fn test_mutations_keep_positions_dense() {
        let mut recorder = Recorder::default();
        let mut collection = OwnedCollection::new('m');

        collection.push(&mut recorder, 10);
        collection.push(&mut recorder, 11);
        collection.push(&mut recorder, 12);
        assert_consistent(&collection, &recorder);

        collection.insert(&mut recorder, 0, 9);
        assert_eq!(collection.as_slice(), &[9, 10, 11, 12]);
        assert_consistent(&collection, &recorder);

        assert_eq!(collection.remove(&mut recorder, 1), 10);
        assert_eq!(recorder.links[&10].0, None);
        assert_consistent(&collection, &recorder);

        assert_eq!(collection.replace(&mut recorder, 2, 20), 12);
        assert_eq!(recorder.links[&12].0, None);
        assert_eq!(collection.as_slice(), &[9, 11, 20]);
        assert_consistent(&collection, &recorder);

        assert_eq!(recorder.invalidations, 6);
        assert_eq!(collection.position_of(20), Some(2));
    }

    #[test]
    fn test_clear_unlinks_everything() {
        let mut recorder = Recorder::default();
        let mut collection = OwnedCollection::new('m');
        collection.push(&mut recorder, 1);
        collection.push(&mut recorder, 2);

        collection.clear(&mut recorder);

        assert!(collection.is_empty());
        assert_eq!(recorder.links[&1].0, None);
        assert_eq!(recorder.links[&2].0, None);
    }

    #[test]
    #[should_panic(expected = "frozen collection")]
    fn test_frozen_rejects_mutation() {
        let mut recorder = Recorder::default();
        let mut collection = OwnedCollection::new('m');
        collection.push(&mut recorder, 1);
        collection.freeze();

        collection.push(&mut recorder, 2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_remove_out_of_range() {
        let mut recorder = Recorder::default();
        let mut collection: OwnedCollection<u32, char> = OwnedCollection::new('m');
        collection.remove(&mut recorder, 0);
    }
}
