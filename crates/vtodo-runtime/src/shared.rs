#![forbid(unsafe_code)]

//! Thread-shareable todo store.
//!
//! [`SharedStore`] applies the same reducer as [`crate::TodoStore`] but
//! publishes snapshots through an [`ArcSwap`], so reader threads load the
//! current list without taking a lock. Writers are serialized by a mutex
//! that also guards the id generator, which keeps "allocate id, then
//! insert" atomic.
//!
//! | Operation    | Cost                    |
//! |--------------|-------------------------|
//! | `load()`     | lock-free, O(1)         |
//! | `dispatch()` | mutex + O(n) reducer    |

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;
use tracing::{debug, trace};

use vtodo_core::{IdGenerator, Item, ItemId, TodoList, create_bulk};

use crate::action::{Action, Reduced, reduce};

/// Single-writer, many-reader todo store.
pub struct SharedStore {
    snapshot: ArcSwap<TodoList>,
    writer: Mutex<IdGenerator>,
}

impl fmt::Debug for SharedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.snapshot.load();
        f.debug_struct("SharedStore")
            .field("len", &current.len())
            .field("revision", &current.revision())
            .finish()
    }
}

impl Default for SharedStore {
    fn default() -> Self {
        Self::with_items(Vec::new())
    }
}

impl SharedStore {
    /// Store seeded with `items`; ids continue after the largest one.
    #[must_use]
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let list = TodoList::from_items(items);
        let ids = IdGenerator::after(list.iter().map(|item| &**item));
        Self {
            snapshot: ArcSwap::from_pointee(list),
            writer: Mutex::new(ids),
        }
    }

    /// Store seeded with `n` bulk items.
    #[must_use]
    pub fn with_bulk(n: usize) -> Self {
        Self::with_items(create_bulk(n))
    }

    /// Current snapshot without blocking writers.
    #[must_use]
    pub fn load(&self) -> Arc<TodoList> {
        self.snapshot.load_full()
    }

    /// Apply `action` and return the resulting snapshot. A no-op returns the
    /// current one.
    ///
    /// An applied `Insert` moves the generator past the inserted id.
    pub fn dispatch(&self, action: &Action) -> Arc<TodoList> {
        let mut writer = self.lock_writer();
        self.apply(&mut writer, action)
    }

    /// Allocate an id and insert `text` under one writer lock.
    pub fn insert_text(&self, text: impl Into<String>) -> ItemId {
        let mut writer = self.lock_writer();
        let id = writer.next_id();
        self.apply(&mut writer, &Action::insert(Item::new(id, text)));
        id
    }

    /// The id the next insert will use.
    #[must_use]
    pub fn peek_next_id(&self) -> ItemId {
        self.lock_writer().peek()
    }

    // `ids` is the generator behind the writer lock the caller holds.
    fn apply(&self, ids: &mut IdGenerator, action: &Action) -> Arc<TodoList> {
        let current = self.snapshot.load_full();
        match reduce(&current, action) {
            Reduced::Changed(next) => {
                if let Action::Insert { todo } = action {
                    ids.reserve_through(todo.id);
                }
                debug!(
                    action = %action.kind(),
                    revision = next.revision(),
                    len = next.len(),
                    "shared dispatch applied"
                );
                let next = Arc::new(next);
                self.snapshot.store(Arc::clone(&next));
                next
            }
            Reduced::Unchanged(reason) => {
                trace!(action = %action.kind(), ?reason, "shared dispatch was a no-op");
                current
            }
        }
    }

    // The generator holds no invariant a panicking writer could break, so a
    // poisoned lock is recovered.
    fn lock_writer(&self) -> MutexGuard<'_, IdGenerator> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn readers_keep_their_snapshot() {
        let store = SharedStore::with_bulk(3);
        let before = store.load();
        store.dispatch(&Action::remove(ItemId(1)));
        assert_eq!(before.len(), 3);
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn noop_returns_current_snapshot() {
        let store = SharedStore::with_bulk(3);
        let before = store.load();
        let after = store.dispatch(&Action::toggle(ItemId(9)));
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn external_insert_advances_generator() {
        let store = SharedStore::with_bulk(3);
        store.dispatch(&Action::insert(Item::new(ItemId(4), "from host")));
        assert_eq!(store.insert_text("next"), ItemId(5));
        assert_eq!(store.load().len(), 5);
    }

    #[test]
    fn concurrent_inserts_get_unique_ids() {
        let store = Arc::new(SharedStore::with_bulk(10));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    (0..50)
                        .map(|i| store.insert_text(format!("t{t}-{i}")))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer thread");
        }

        let list = store.load();
        assert_eq!(list.len(), 210);
        let mut ids: Vec<u64> = list.iter().map(|item| item.id.get()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 210);
        assert_eq!(store.peek_next_id(), ItemId(211));
    }
}
