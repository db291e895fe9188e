#![forbid(unsafe_code)]

//! Immutable, structurally shared todo list snapshots.
//!
//! # Design
//!
//! A [`TodoList`] is a frozen `Arc<[Arc<Item>]>` plus a revision stamp.
//! Every mutation helper returns a **new** list; the receiver is never
//! touched. Items that a mutation does not affect are shared by pointer
//! between the old and new snapshot, so downstream caches can compare
//! items with `Arc::ptr_eq` before falling back to field equality.
//!
//! # Invariants
//!
//! 1. A list is never mutated after construction.
//! 2. `revision` increases by exactly 1 per derived snapshot.
//! 3. Ids within a list are pairwise distinct.
//!
//! # Performance
//!
//! | Operation        | Complexity |
//! |------------------|------------|
//! | `len()` / `get()`| O(1)       |
//! | `same_snapshot()`| O(1)       |
//! | `position()`     | O(n)       |
//! | derive (append / remove / replace) | O(n) pointer copies |

use std::fmt;
use std::sync::Arc;

use crate::item::{Item, ItemId};

/// Build `n` unchecked items with ids `1..=n` and text `"Task {i}"`.
#[must_use]
pub fn create_bulk(n: usize) -> Vec<Item> {
    (1..=n as u64)
        .map(|i| Item::new(ItemId(i), format!("Task {i}")))
        .collect()
}

/// An immutable snapshot of the ordered todo collection.
///
/// Cloning is O(1): clones share the same backing slice.
#[derive(Clone)]
pub struct TodoList {
    items: Arc<[Arc<Item>]>,
    revision: u64,
}

impl Default for TodoList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TodoList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoList")
            .field("revision", &self.revision)
            .field("len", &self.items.len())
            .field("items", &self.items)
            .finish()
    }
}

/// Content equality: same items in the same order. Revisions are ignored.
impl PartialEq for TodoList {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.items, &other.items) {
            return true;
        }
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|(a, b)| Arc::ptr_eq(a, b) || a == b)
    }
}

impl Eq for TodoList {}

impl TodoList {
    /// Empty list at revision 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Arc::from(Vec::<Arc<Item>>::new()),
            revision: 0,
        }
    }

    /// List seeded from literal items at revision 0.
    ///
    /// Duplicate ids are a caller bug and trip a debug assertion.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let items: Vec<Arc<Item>> = items.into_iter().map(Arc::new).collect();
        debug_assert!(
            ids_are_distinct(&items),
            "initial todo list contains duplicate ids"
        );
        Self {
            items: Arc::from(items),
            revision: 0,
        }
    }

    /// Number of items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot revision. Derived lists carry `parent.revision() + 1`.
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Item at `index`, if in bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Arc<Item>> {
        self.items.get(index)
    }

    /// Iterate items in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Arc<Item>> + '_ {
        self.items.iter()
    }

    /// Index of the item with `id`.
    #[must_use]
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Whether an item with `id` exists.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.position(id).is_some()
    }

    /// Largest id present, if any.
    #[must_use]
    pub fn max_id(&self) -> Option<ItemId> {
        self.items.iter().map(|item| item.id).max()
    }

    /// O(1) check that both handles point at the very same snapshot.
    #[inline]
    #[must_use]
    pub fn same_snapshot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items) && self.revision == other.revision
    }

    /// Owned copy of the items, mostly for assertions.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Item> {
        self.items.iter().map(|item| Item::clone(item)).collect()
    }

    /// New list with `item` appended.
    #[must_use]
    pub fn with_appended(&self, item: Item) -> Self {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend(self.items.iter().cloned());
        items.push(Arc::new(item));
        self.derive(items)
    }

    /// New list without the item at `index`. Out-of-bounds yields a copy of
    /// the same content.
    #[must_use]
    pub fn without_index(&self, index: usize) -> Self {
        let items: Vec<Arc<Item>> = self
            .items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, item)| Arc::clone(item))
            .collect();
        self.derive(items)
    }

    /// New list with the item at `index` replaced by `item`.
    #[must_use]
    pub fn with_replaced(&self, index: usize, item: Item) -> Self {
        let mut items = self.items.to_vec();
        if let Some(slot) = items.get_mut(index) {
            *slot = Arc::new(item);
        }
        self.derive(items)
    }

    fn derive(&self, items: Vec<Arc<Item>>) -> Self {
        Self {
            items: Arc::from(items),
            revision: self.revision + 1,
        }
    }
}

impl<'a> IntoIterator for &'a TodoList {
    type Item = &'a Arc<Item>;
    type IntoIter = std::slice::Iter<'a, Arc<Item>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Item> for TodoList {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}

fn ids_are_distinct(items: &[Arc<Item>]) -> bool {
    let mut ids: Vec<ItemId> = items.iter().map(|item| item.id).collect();
    ids.sort_unstable();
    ids.windows(2).all(|pair| pair[0] != pair[1])
}
