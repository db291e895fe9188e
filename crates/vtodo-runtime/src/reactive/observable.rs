#![forbid(unsafe_code)]

//! Version-tracked value cell with change notification.
//!
//! # Design
//!
//! [`Observable<T>`] keeps a value in shared `Rc<RefCell<..>>` storage.
//! When a write changes the value (by `PartialEq`), the version goes up by
//! one and every live subscriber is called in registration order.
//!
//! The borrow is released before subscribers run, so a subscriber may read
//! the cell or write it again (a nested write notifies in turn).
//!
//! # Performance
//!
//! | Operation     | Complexity                         |
//! |---------------|------------------------------------|
//! | `get()`       | O(1) plus `T::clone`               |
//! | `set()`       | O(eq) + O(S), S = subscribers      |
//! | `subscribe()` | O(1) amortized                     |
//!
//! # Failure Modes
//!
//! - **Subscriber leak**: a [`Subscription`] kept forever keeps its callback
//!   alive. Dropped guards are pruned lazily on the next notification.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, info_span};
use web_time::Instant;

type SubscriberRc<T> = Rc<dyn Fn(&T)>;
type SubscriberWeak<T> = Weak<dyn Fn(&T)>;

struct Cell<T> {
    value: T,
    version: u64,
    subscribers: Vec<SubscriberWeak<T>>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `Observable` yields another handle to the same cell.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each value-changing write.
/// 2. Writing a value equal to the current one is a no-op.
/// 3. Subscribers run in registration order.
pub struct Observable<T> {
    cell: Rc<RefCell<Cell<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.cell.borrow();
        f.debug_struct("Observable")
            .field("value", &cell.value)
            .field("version", &cell.version)
            .field("subscriber_count", &cell.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// New cell at version 0 with no subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(RefCell::new(Cell {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.cell.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.borrow().value)
    }

    /// Replace the value. Returns whether it changed.
    pub fn set(&self, value: T) -> bool {
        self.publish(value, 1)
    }

    /// Replace the value, tagging the notification span with how many rows
    /// the write touched.
    pub fn publish(&self, value: T, rows_changed: u64) -> bool {
        if self.cell.borrow().value == value {
            return false;
        }
        self.publish_changed(value, rows_changed);
        true
    }

    /// Replace the value and notify without comparing it to the old one.
    ///
    /// For writers that already know the value changed, where `==` would be
    /// a wasted full comparison.
    pub fn publish_changed(&self, value: T, rows_changed: u64) {
        {
            let mut cell = self.cell.borrow_mut();
            cell.value = value;
            cell.version += 1;
        }
        self.notify(rows_changed);
    }

    /// Register `callback`; it runs after every change until the returned
    /// guard is dropped.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: SubscriberRc<T> = Rc::new(callback);
        self.cell
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of value-changing writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.cell.borrow().version
    }

    /// Registered subscribers, including dropped ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.cell.borrow().subscribers.len()
    }

    fn notify(&self, rows_changed: u64) {
        let (callbacks, value) = {
            let mut cell = self.cell.borrow_mut();
            cell.subscribers.retain(|w| w.strong_count() > 0);
            let callbacks: Vec<SubscriberRc<T>> = cell
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect();
            if callbacks.is_empty() {
                return;
            }
            (callbacks, cell.value.clone())
        };

        let subscribers_notified = callbacks.len() as u64;
        let started = Instant::now();
        let span = info_span!(
            "store.delta",
            rows_changed,
            subscribers_notified,
            duration_us = tracing::field::Empty
        );
        let _entered = span.enter();

        for callback in &callbacks {
            callback(&value);
        }

        let duration_us = started.elapsed().as_micros() as u64;
        span.record("duration_us", duration_us);
        debug!(
            store_propagation_duration_us = duration_us,
            rows_changed, subscribers_notified, "store change propagated"
        );
    }
}

/// RAII guard for a subscriber. Dropping it unsubscribes.
pub struct Subscription {
    _guard: Box<dyn Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
