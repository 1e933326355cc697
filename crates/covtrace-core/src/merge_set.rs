//! Identity-keyed sets whose duplicates merge instead of accumulating.

use std::collections::BTreeMap;
use std::collections::btree_map::{self, Entry};

use serde::{Serialize, Serializer};

/// An aggregate with an identity key and mergeable children.
///
/// Two values with the same [`identity`](Identified::identity) describe the
/// same logical entity; their children never participate in identity.
pub trait Identified {
    /// The key this value is deduplicated and ordered by.
    fn identity(&self) -> &str;

    /// Fold `other`'s children into `self`. Callers guarantee both share the
    /// same identity.
    fn absorb(&mut self, other: Self)
    where
        Self: Sized;
}

/// Set of [`Identified`] values, unique by identity and ordered ascending by it.
///
/// Inserting a value whose identity is already present merges it into the
/// stored one via [`Identified::absorb`].
#[derive(Debug, Clone)]
pub struct MergeSet<T> {
    items: BTreeMap<String, T>,
}

impl<T> Default for MergeSet<T> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }
}

impl<T: Identified> MergeSet<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or merge `item`. Returns `true` when its identity was new.
    pub fn insert(&mut self, item: T) -> bool {
        match self.items.entry(item.identity().to_owned()) {
            Entry::Occupied(mut slot) => {
                slot.get_mut().absorb(item);
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(item);
                true
            }
        }
    }

    /// Insert every item, merging duplicates both against stored values and
    /// against each other.
    pub fn merge_all(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.insert(item);
        }
    }

    pub fn get(&self, identity: &str) -> Option<&T> {
        self.items.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.items.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Values in ascending identity order.
    pub fn iter(&self) -> btree_map::Values<'_, String, T> {
        self.items.values()
    }

    /// Identity keys in ascending order.
    pub fn keys(&self) -> btree_map::Keys<'_, String, T> {
        self.items.keys()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Identified> Extend<T> for MergeSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.merge_all(iter);
    }
}

impl<T: Identified> FromIterator<T> for MergeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.merge_all(iter);
        set
    }
}

impl<T> IntoIterator for MergeSet<T> {
    type Item = T;
    type IntoIter = btree_map::IntoValues<String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_values()
    }
}

impl<'a, T> IntoIterator for &'a MergeSet<T> {
    type Item = &'a T;
    type IntoIter = btree_map::Values<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

/// Serializes as a JSON array in identity order.
impl<T: Serialize> Serialize for MergeSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.values())
    }
}
