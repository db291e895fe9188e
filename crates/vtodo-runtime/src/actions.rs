#![forbid(unsafe_code)]

//! Insert/remove/toggle handlers with stable identity.
//!
//! [`TodoActions`] builds its three callbacks once, closing over the store
//! handle. Every accessor returns a clone of the same [`Callback`], so the
//! identity a row captured on its first render is still the identity it
//! sees after any number of dispatches. Row memoization depends on that.

use std::rc::Rc;

use vtodo_core::{Callback, ItemId, RowCallbacks};

use crate::action::Action;
use crate::store::TodoStore;

/// The three mutation entry points handed to rows and to the host.
#[derive(Clone, Debug)]
pub struct TodoActions {
    store: Rc<TodoStore>,
    on_insert: Callback<String>,
    on_remove: Callback<ItemId>,
    on_toggle: Callback<ItemId>,
}

impl TodoActions {
    /// Build the callbacks for `store`. Call once per session.
    #[must_use]
    pub fn new(store: Rc<TodoStore>) -> Self {
        let on_insert = {
            let store = Rc::clone(&store);
            Callback::new(move |text: String| {
                store.insert_text(text);
            })
        };
        let on_remove = {
            let store = Rc::clone(&store);
            Callback::new(move |id: ItemId| {
                store.dispatch(Action::remove(id));
            })
        };
        let on_toggle = {
            let store = Rc::clone(&store);
            Callback::new(move |id: ItemId| {
                store.dispatch(Action::toggle(id));
            })
        };
        Self {
            store,
            on_insert,
            on_remove,
            on_toggle,
        }
    }

    /// Append an unchecked item with a freshly allocated id. Empty text is
    /// accepted.
    pub fn on_insert(&self, text: impl Into<String>) {
        self.on_insert.call(text.into());
    }

    /// Remove the item with `id`; unknown ids are ignored.
    pub fn on_remove(&self, id: ItemId) {
        self.on_remove.call(id);
    }

    /// Flip `checked` on the item with `id`; unknown ids are ignored.
    pub fn on_toggle(&self, id: ItemId) {
        self.on_toggle.call(id);
    }

    #[must_use]
    pub fn insert_callback(&self) -> Callback<String> {
        self.on_insert.clone()
    }

    #[must_use]
    pub fn remove_callback(&self) -> Callback<ItemId> {
        self.on_remove.clone()
    }

    #[must_use]
    pub fn toggle_callback(&self) -> Callback<ItemId> {
        self.on_toggle.clone()
    }

    /// Toggle and remove callbacks bundled for row descriptors.
    #[must_use]
    pub fn row_callbacks(&self) -> RowCallbacks {
        RowCallbacks::new(self.on_toggle.clone(), self.on_remove.clone())
    }

    /// The store these callbacks write to.
    #[must_use]
    pub fn store(&self) -> &Rc<TodoStore> {
        &self.store
    }
}
