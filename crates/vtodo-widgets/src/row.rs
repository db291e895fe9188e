#![forbid(unsafe_code)]

//! Render descriptors: everything a host needs to draw one row.

use std::sync::Arc;

use vtodo_core::{Callback, Item, ItemId, RowCallbacks};

/// One visible row.
///
/// Descriptors are shared as `Rc<RenderDescriptor>` and never mutated; a
/// changed row gets a new descriptor. Hosts can treat `Rc::ptr_eq` between
/// frames as "nothing to redraw".
#[derive(Debug, Clone)]
pub struct RenderDescriptor {
    /// Stable row key (the item id).
    pub key: ItemId,
    /// Index in the snapshot the descriptor was built from.
    pub index: usize,
    pub item: Arc<Item>,
    /// Leading edge of the row, `index * item_extent`.
    pub position_offset: f64,
    pub on_toggle: Callback<ItemId>,
    pub on_remove: Callback<ItemId>,
}

impl RenderDescriptor {
    /// Build a descriptor for `item` at `index`.
    #[must_use]
    pub fn new(item: Arc<Item>, index: usize, position_offset: f64, callbacks: &RowCallbacks) -> Self {
        Self {
            key: item.id,
            index,
            item,
            position_offset,
            on_toggle: callbacks.on_toggle.clone(),
            on_remove: callbacks.on_remove.clone(),
        }
    }

    /// Invoke the toggle callback for this row.
    pub fn toggle(&self) {
        self.on_toggle.call(self.key);
    }

    /// Invoke the remove callback for this row.
    pub fn remove(&self) {
        self.on_remove.call(self.key);
    }
}
