#![forbid(unsafe_code)]

//! Todo item model.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier of an [`Item`].
///
/// Ids are handed out by [`IdGenerator`](crate::IdGenerator) and are never
/// reused for the lifetime of a store, even after the item is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub u64);

impl ItemId {
    /// Raw numeric value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ItemId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo entry.
///
/// `id` is immutable once assigned. The only state change an item ever sees
/// is a flip of `checked`, which produces a new value via [`Item::toggled`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    pub checked: bool,
}

impl Item {
    /// Create an unchecked item.
    #[must_use]
    pub fn new(id: ItemId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            checked: false,
        }
    }

    /// Builder-style setter for `checked`.
    #[must_use]
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Copy of this item with `checked` flipped.
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            id: self.id,
            text: self.text.clone(),
            checked: !self.checked,
        }
    }
}
