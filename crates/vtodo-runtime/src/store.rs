#![forbid(unsafe_code)]

//! The canonical todo store.
//!
//! [`TodoStore`] owns the current [`TodoList`] snapshot and the id
//! generator. All writes go through [`TodoStore::dispatch`], which runs the
//! pure reducer and publishes the result. Readers take O(1) snapshot clones
//! and can hold them as long as they like; a later dispatch never changes a
//! snapshot already handed out.
//!
//! The store is single-threaded and meant to be shared as `Rc<TodoStore>`.
//! Subscribers may dispatch from inside their callback.

use std::cell::RefCell;
use std::fmt;

use tracing::{debug, trace};

use vtodo_core::{IdGenerator, Item, ItemId, TodoList, create_bulk};

use crate::action::{Action, Reduced, reduce};
use crate::reactive::{Observable, Subscription};

/// Canonical owner of the todo list.
pub struct TodoStore {
    state: Observable<TodoList>,
    ids: RefCell<IdGenerator>,
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoStore")
            .field("len", &self.len())
            .field("revision", &self.revision())
            .field("next_id", &self.peek_next_id())
            .finish()
    }
}

impl TodoStore {
    /// Empty store; the first id handed out is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(TodoList::new(), IdGenerator::new())
    }

    /// Store seeded with `items`; ids continue after the largest seeded id.
    #[must_use]
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let list = TodoList::from_items(items);
        let ids = IdGenerator::after(list.iter().map(|item| &**item));
        Self::from_parts(list, ids)
    }

    /// Store seeded with `items` and an explicit starting id. The seed is
    /// raised past any seeded id so a fresh id never collides.
    #[must_use]
    pub fn with_items_and_seed(items: impl IntoIterator<Item = Item>, seed: u64) -> Self {
        let list = TodoList::from_items(items);
        let mut ids = IdGenerator::seeded(seed);
        if let Some(max) = list.max_id() {
            ids.reserve_through(max);
        }
        Self::from_parts(list, ids)
    }

    /// Store seeded with `n` bulk items (`"Task 1"` .. `"Task n"`); the
    /// next id is `n + 1`.
    #[must_use]
    pub fn with_bulk(n: usize) -> Self {
        Self::with_items_and_seed(create_bulk(n), n as u64 + 1)
    }

    fn from_parts(list: TodoList, ids: IdGenerator) -> Self {
        debug!(len = list.len(), next_id = %ids.peek(), "todo store created");
        Self {
            state: Observable::new(list),
            ids: RefCell::new(ids),
        }
    }

    /// Apply `action` and return the resulting snapshot.
    ///
    /// A no-op returns the current snapshot itself (same revision), so
    /// `dispatch(..).same_snapshot(&before)` tells callers nothing changed.
    ///
    /// An applied `Insert` carrying a caller-built id moves the generator
    /// past that id, so later [`next_id`](Self::next_id) calls never hand
    /// it out again.
    pub fn dispatch(&self, action: Action) -> TodoList {
        let current = self.state.get();
        let kind = action.kind();
        match reduce(&current, &action) {
            Reduced::Changed(next) => {
                if let Action::Insert { todo } = &action {
                    self.ids.borrow_mut().reserve_through(todo.id);
                }
                debug!(
                    action = %kind,
                    revision = next.revision(),
                    len = next.len(),
                    "dispatch applied"
                );
                self.state.publish_changed(next.clone(), 1);
                next
            }
            Reduced::Unchanged(reason) => {
                trace!(action = %kind, ?reason, "dispatch was a no-op");
                current
            }
        }
    }

    /// Allocate a fresh id and insert an unchecked item with `text`.
    ///
    /// Returns the id that was used.
    pub fn insert_text(&self, text: impl Into<String>) -> ItemId {
        let id = self.next_id();
        self.dispatch(Action::insert(Item::new(id, text)));
        id
    }

    /// Current snapshot. O(1).
    #[must_use]
    pub fn snapshot(&self) -> TodoList {
        self.state.get()
    }

    /// Revision of the current snapshot.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.state.with(TodoList::revision)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.with(TodoList::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.with(TodoList::is_empty)
    }

    /// Take the next id. Never repeats within this store.
    pub fn next_id(&self) -> ItemId {
        self.ids.borrow_mut().next_id()
    }

    /// The id [`next_id`](Self::next_id) would return, without taking it.
    #[must_use]
    pub fn peek_next_id(&self) -> ItemId {
        self.ids.borrow().peek()
    }

    /// Run `callback` with each new snapshot until the guard is dropped.
    pub fn subscribe(&self, callback: impl Fn(&TodoList) + 'static) -> Subscription {
        self.state.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn three() -> TodoStore {
        TodoStore::with_items([
            Item::new(ItemId(1), "one").with_checked(true),
            Item::new(ItemId(2), "two").with_checked(true),
            Item::new(ItemId(3), "three"),
        ])
    }

    #[test]
    fn seeded_ids_continue_after_max() {
        let store = three();
        assert_eq!(store.peek_next_id(), ItemId(4));
        assert_eq!(store.next_id(), ItemId(4));
        assert_eq!(store.next_id(), ItemId(5));
    }

    #[test]
    fn bulk_seed_matches_count() {
        let store = TodoStore::with_bulk(2500);
        assert_eq!(store.len(), 2500);
        assert_eq!(store.peek_next_id(), ItemId(2501));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn explicit_seed_is_raised_past_existing_ids() {
        let store = TodoStore::with_items_and_seed([Item::new(ItemId(10), "x")], 3);
        assert_eq!(store.peek_next_id(), ItemId(11));
        let store = TodoStore::with_items_and_seed([Item::new(ItemId(2), "x")], 50);
        assert_eq!(store.peek_next_id(), ItemId(50));
    }

    #[test]
    fn external_insert_advances_generator() {
        let store = three();
        store.dispatch(Action::insert(Item::new(ItemId(4), "from host")));
        assert_eq!(store.peek_next_id(), ItemId(5));
        let id = store.insert_text("next");
        assert_eq!(id, ItemId(5));

        store.dispatch(Action::insert(Item::new(ItemId(40), "jump")));
        assert_eq!(store.insert_text("after jump"), ItemId(41));
        let ids: Vec<u64> = store.snapshot().iter().map(|item| item.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 40, 41]);
    }

    #[test]
    fn external_insert_below_counter_keeps_it() {
        let store = TodoStore::with_items_and_seed([Item::new(ItemId(1), "a")], 10);
        store.dispatch(Action::insert(Item::new(ItemId(5), "low")));
        assert_eq!(store.peek_next_id(), ItemId(10));
    }

    #[test]
    fn dispatch_publishes_new_snapshot_and_keeps_old() {
        let store = three();
        let before = store.snapshot();
        let after = store.dispatch(Action::toggle(ItemId(3)));
        assert!(after.get(2).unwrap().checked);
        assert!(!before.get(2).unwrap().checked);
        assert_eq!(store.revision(), 1);
        assert!(store.snapshot().same_snapshot(&after));
    }

    #[test]
    fn noop_dispatch_returns_same_snapshot() {
        let store = three();
        let before = store.snapshot();
        let after = store.dispatch(Action::remove(ItemId(99)));
        assert!(after.same_snapshot(&before));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn insert_text_uses_fresh_id() {
        let store = three();
        let id = store.insert_text("Buy milk");
        assert_eq!(id, ItemId(4));
        let snapshot = store.snapshot();
        assert_eq!(**snapshot.get(3).unwrap(), Item::new(ItemId(4), "Buy milk"));
        assert_eq!(store.peek_next_id(), ItemId(5));
    }

    #[test]
    fn subscribers_see_each_change() {
        let store = three();
        let seen = Rc::new(Cell::new(0u64));
        let seen_clone = Rc::clone(&seen);
        let _sub = store.subscribe(move |list| seen_clone.set(list.revision()));
        store.dispatch(Action::toggle(ItemId(1)));
        store.dispatch(Action::remove(ItemId(42)));
        store.dispatch(Action::remove(ItemId(1)));
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn subscriber_may_dispatch() {
        let store = Rc::new(three());
        let inner = Rc::clone(&store);
        let _sub = store.subscribe(move |list| {
            if list.contains(ItemId(2)) {
                inner.dispatch(Action::remove(ItemId(2)));
            }
        });
        store.dispatch(Action::toggle(ItemId(1)));
        assert!(!store.snapshot().contains(ItemId(2)));
        assert_eq!(store.revision(), 2);
    }
}
