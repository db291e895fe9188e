#![forbid(unsafe_code)]

//! Identity-stamped callbacks.
//!
//! Row descriptors carry callbacks, and row memoization must know whether a
//! callback "changed". Comparing closures is impossible, so every
//! [`Callback`] carries a [`CallbackId`] minted once at construction.
//! Clones share the id; two separately built callbacks never do, even if
//! their bodies are identical.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::item::ItemId;

static NEXT_CALLBACK_ID: AtomicU64 = AtomicU64::new(1);

/// Value identity of a [`Callback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallbackId(u64);

impl CallbackId {
    fn fresh() -> Self {
        Self(NEXT_CALLBACK_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A shared single-threaded callback with a stable, comparable identity.
pub struct Callback<A> {
    id: CallbackId,
    f: Rc<dyn Fn(A)>,
}

// Manual Clone: shares the same Rc and id.
impl<A> Clone for Callback<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            f: Rc::clone(&self.f),
        }
    }
}

impl<A> fmt::Debug for Callback<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").field("id", &self.id).finish()
    }
}

/// Identity equality: equal iff both handles came from the same construction.
impl<A> PartialEq for Callback<A> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<A> Eq for Callback<A> {}

impl<A> Callback<A> {
    /// Wrap a closure, minting a new identity.
    pub fn new(f: impl Fn(A) + 'static) -> Self {
        Self {
            id: CallbackId::fresh(),
            f: Rc::new(f),
        }
    }

    /// Invoke the callback.
    #[inline]
    pub fn call(&self, arg: A) {
        (self.f)(arg);
    }

    /// Identity of this callback.
    #[inline]
    #[must_use]
    pub fn id(&self) -> CallbackId {
        self.id
    }
}

/// The per-row callbacks a render descriptor carries.
///
/// Equality is identity of both callbacks, which is what row memoization
/// compares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowCallbacks {
    pub on_toggle: Callback<ItemId>,
    pub on_remove: Callback<ItemId>,
}

impl RowCallbacks {
    #[must_use]
    pub fn new(on_toggle: Callback<ItemId>, on_remove: Callback<ItemId>) -> Self {
        Self {
            on_toggle,
            on_remove,
        }
    }
}
