#![forbid(unsafe_code)]

//! Monotonic item id allocation.
//!
//! # Invariants
//!
//! 1. [`IdGenerator::next_id`] never returns the same id twice.
//! 2. The counter never decreases; removing items does not rewind it.
//! 3. The counter is an owned value, not process-global state: two stores
//!    own two independent generators.
//!
//! Running past `u64::MAX` would break (1). It is treated as an invariant
//! violation: fatal in debug builds, and the counter stays pinned at
//! `u64::MAX` in release builds.

use crate::item::{Item, ItemId};

/// Owned counter producing monotonically increasing [`ItemId`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    /// Generator for an empty collection (first id is 1).
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Generator starting at a caller-supplied seed.
    ///
    /// A seed of 0 is raised to 1 so ids stay positive.
    #[must_use]
    pub const fn seeded(next: u64) -> Self {
        Self {
            next: if next == 0 { 1 } else { next },
        }
    }

    /// Generator seeded from an existing collection: `max(id) + 1`, or 1 when
    /// the collection is empty.
    #[must_use]
    pub fn after<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let max = items.into_iter().map(|item| item.id.0).max().unwrap_or(0);
        Self::seeded(advance(max))
    }

    /// Return the current id and advance the counter.
    pub fn next_id(&mut self) -> ItemId {
        let id = ItemId(self.next);
        self.next = advance(self.next);
        id
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    #[must_use]
    pub const fn peek(&self) -> ItemId {
        ItemId(self.next)
    }

    /// Raise the counter so it is strictly above `id`. Never lowers it.
    pub fn reserve_through(&mut self, id: ItemId) {
        if id.0 >= self.next {
            self.next = advance(id.0);
        }
    }
}

fn advance(from: u64) -> u64 {
    let next = from.checked_add(1);
    debug_assert!(next.is_some(), "item id space exhausted at {from}");
    next.unwrap_or(u64::MAX)
}
