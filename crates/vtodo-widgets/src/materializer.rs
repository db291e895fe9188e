#![forbid(unsafe_code)]

//! Memoized row materialization.
//!
//! [`RowMaterializer`] maps a visible index range of a [`TodoList`] snapshot
//! to [`RenderDescriptor`]s. Descriptors are cached by item id; a cached
//! descriptor is handed back (the same `Rc`) when nothing it was built from
//! has changed:
//!
//! - the item is the same `Arc` or field-equal,
//! - the index and position offset are unchanged,
//! - both callback identities match.
//!
//! Anything else rebuilds the row and records a [`RowChange::Built`] entry
//! in the returned patch. A key drawn by the previous pass but absent from
//! this one (removed from the list, or scrolled out) records a
//! [`RowChange::Removed`] entry. The patch is the minimal list of rows the
//! host must redraw or drop: `Built`, then `Removed`, then `Evicted`.
//!
//! # Cache bound
//!
//! The cache holds at most `range.len() + cache_slack` entries after a pass.
//! Entries left over from earlier passes stay (cheap scroll-back) until the
//! bound is exceeded, then all of them are evicted at once and reported as
//! [`RowChange::Evicted`].

use std::rc::Rc;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use vtodo_core::{Item, ItemId, RowCallbacks, TodoList, VisibleRange, position_offset};

#[cfg(feature = "tracing")]
use vtodo_core::{debug, trace};

use crate::row::RenderDescriptor;

/// Default cache headroom beyond the rendered window.
pub const DEFAULT_CACHE_SLACK: usize = 4;

/// Why a row had to be rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheMissReason {
    /// No cached descriptor for this id.
    Empty,
    /// The item's fields changed.
    ItemChanged,
    /// The row moved to another index.
    Moved,
    /// A row callback was replaced.
    CallbacksChanged,
}

impl CacheMissReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::ItemChanged => "item_changed",
            Self::Moved => "moved",
            Self::CallbacksChanged => "callbacks_changed",
        }
    }
}

/// One entry of the patch a host applies after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowChange {
    /// A new descriptor was built for `key`, now at `index`.
    Built { key: ItemId, index: usize },
    /// `key` was drawn by the previous pass and is not drawn by this one.
    Removed { key: ItemId },
    /// The cached descriptor for `key` was dropped.
    Evicted { key: ItemId },
}

/// Output of one materialization pass.
#[derive(Debug, Clone, Default)]
pub struct MaterializedRows {
    /// Descriptors for the requested range, in index order.
    pub rows: Vec<Rc<RenderDescriptor>>,
    /// What changed relative to the cache. Reused rows do not appear.
    pub patch: Vec<RowChange>,
}

impl MaterializedRows {
    /// Number of rows built (not reused) this pass.
    #[must_use]
    pub fn built_count(&self) -> usize {
        self.patch
            .iter()
            .filter(|change| matches!(change, RowChange::Built { .. }))
            .count()
    }

    /// Number of rows that left the window this pass.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.patch
            .iter()
            .filter(|change| matches!(change, RowChange::Removed { .. }))
            .count()
    }

    /// Number of cached descriptors dropped this pass.
    #[must_use]
    pub fn evicted_count(&self) -> usize {
        self.patch
            .iter()
            .filter(|change| matches!(change, RowChange::Evicted { .. }))
            .count()
    }

    /// Whether every row was reused and nothing left the window or cache.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.patch.is_empty()
    }
}

/// Running totals across passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializerStats {
    pub passes: u64,
    pub hits: u64,
    pub misses: u64,
    pub removals: u64,
    pub evictions: u64,
    pub item_changed: u64,
    pub moved: u64,
    pub callbacks_changed: u64,
}

impl MaterializerStats {
    fn record_miss(&mut self, reason: CacheMissReason) {
        self.misses += 1;
        match reason {
            CacheMissReason::Empty => {}
            CacheMissReason::ItemChanged => self.item_changed += 1,
            CacheMissReason::Moved => self.moved += 1,
            CacheMissReason::CallbacksChanged => self.callbacks_changed += 1,
        }
    }
}

#[derive(Debug)]
struct CachedRow {
    descriptor: Rc<RenderDescriptor>,
    last_pass: u64,
}

/// Id-keyed descriptor cache.
#[derive(Debug)]
pub struct RowMaterializer {
    cache: AHashMap<ItemId, CachedRow>,
    // Keys drawn by the previous pass, in index order.
    drawn: Vec<ItemId>,
    cache_slack: usize,
    pass: u64,
    stats: MaterializerStats,
}

impl Default for RowMaterializer {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SLACK)
    }
}

impl RowMaterializer {
    #[must_use]
    pub fn new(cache_slack: usize) -> Self {
        Self {
            cache: AHashMap::new(),
            drawn: Vec::new(),
            cache_slack,
            pass: 0,
            stats: MaterializerStats::default(),
        }
    }

    /// Descriptors for `range` of `list`.
    ///
    /// The range is clamped to `list.len()` first, so a stale range after a
    /// shrink yields fewer rows (or none) instead of failing.
    pub fn materialize(
        &mut self,
        list: &TodoList,
        range: VisibleRange,
        item_extent: f64,
        callbacks: &RowCallbacks,
    ) -> MaterializedRows {
        self.pass += 1;
        self.stats.passes += 1;

        let range = range.clamp_to(list.len());
        let mut rows = Vec::with_capacity(range.len());
        let mut patch = Vec::new();

        for index in range {
            let Some(item) = list.get(index) else {
                break;
            };
            let offset = position_offset(index, item_extent);

            let reason = match self.cache.get_mut(&item.id) {
                Some(cached) => {
                    cached.last_pass = self.pass;
                    match miss_reason(&cached.descriptor, item, index, offset, callbacks) {
                        None => {
                            self.stats.hits += 1;
                            rows.push(Rc::clone(&cached.descriptor));
                            continue;
                        }
                        Some(reason) => reason,
                    }
                }
                None => CacheMissReason::Empty,
            };

            #[cfg(feature = "tracing")]
            trace!(key = %item.id, index, reason = reason.as_str(), "row cache miss");
            self.stats.record_miss(reason);

            let descriptor = Rc::new(RenderDescriptor::new(
                Arc::clone(item),
                index,
                offset,
                callbacks,
            ));
            self.cache.insert(
                item.id,
                CachedRow {
                    descriptor: Rc::clone(&descriptor),
                    last_pass: self.pass,
                },
            );
            patch.push(RowChange::Built {
                key: item.id,
                index,
            });
            rows.push(descriptor);
        }

        self.record_departures(&rows, &mut patch);
        self.evict_stale(range.len(), &mut patch);

        MaterializedRows { rows, patch }
    }

    fn record_departures(&mut self, rows: &[Rc<RenderDescriptor>], patch: &mut Vec<RowChange>) {
        let drawn: Vec<ItemId> = rows.iter().map(|row| row.key).collect();
        let still_drawn: AHashSet<ItemId> = drawn.iter().copied().collect();
        let before = patch.len();
        patch.extend(
            self.drawn
                .iter()
                .filter(|key| !still_drawn.contains(*key))
                .map(|key| RowChange::Removed { key: *key }),
        );
        self.stats.removals += (patch.len() - before) as u64;
        self.drawn = drawn;
    }

    fn evict_stale(&mut self, window: usize, patch: &mut Vec<RowChange>) {
        let bound = window.saturating_add(self.cache_slack);
        if self.cache.len() <= bound {
            return;
        }
        let pass = self.pass;
        let mut stale: Vec<ItemId> = self
            .cache
            .iter()
            .filter(|(_, row)| row.last_pass != pass)
            .map(|(key, _)| *key)
            .collect();
        // Hash order is random; keep patches reproducible.
        stale.sort_unstable();
        for key in &stale {
            self.cache.remove(key);
            patch.push(RowChange::Evicted { key: *key });
        }
        self.stats.evictions += stale.len() as u64;

        #[cfg(feature = "tracing")]
        debug!(
            evicted = stale.len(),
            cached = self.cache.len(),
            bound,
            "row cache evicted stale rows"
        );
    }

    /// Drop every cached descriptor. Stats and the record of drawn rows are
    /// kept, so the next pass still reports departures.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Number of cached descriptors.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn cache_slack(&self) -> usize {
        self.cache_slack
    }

    #[must_use]
    pub fn stats(&self) -> MaterializerStats {
        self.stats
    }
}

fn miss_reason(
    cached: &RenderDescriptor,
    item: &Arc<Item>,
    index: usize,
    offset: f64,
    callbacks: &RowCallbacks,
) -> Option<CacheMissReason> {
    if !(Arc::ptr_eq(&cached.item, item) || *cached.item == **item) {
        Some(CacheMissReason::ItemChanged)
    } else if cached.index != index || cached.position_offset != offset {
        Some(CacheMissReason::Moved)
    } else if cached.on_toggle != callbacks.on_toggle || cached.on_remove != callbacks.on_remove {
        Some(CacheMissReason::CallbacksChanged)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtodo_core::Callback;

    fn callbacks() -> RowCallbacks {
        RowCallbacks::new(Callback::new(|_| {}), Callback::new(|_| {}))
    }

    fn list(n: u64) -> TodoList {
        TodoList::from_items((1..=n).map(|i| Item::new(ItemId(i), format!("Task {i}"))))
    }

    fn keys(rows: &MaterializedRows) -> Vec<u64> {
        rows.rows.iter().map(|row| row.key.get()).collect()
    }

    #[test]
    fn first_pass_builds_every_row() {
        let mut mat = RowMaterializer::default();
        let cbs = callbacks();
        let out = mat.materialize(&list(50), VisibleRange::new(0, 10), 57.0, &cbs);
        assert_eq!(keys(&out), (1..=10).collect::<Vec<_>>());
        assert_eq!(out.built_count(), 10);
        assert_eq!(out.rows[3].position_offset, 171.0);
        assert_eq!(mat.stats().misses, 10);
    }

    #[test]
    fn identical_inputs_reuse_descriptors() {
        let mut mat = RowMaterializer::default();
        let cbs = callbacks();
        let snapshot = list(50);
        let first = mat.materialize(&snapshot, VisibleRange::new(0, 10), 57.0, &cbs);
        let second = mat.materialize(&snapshot, VisibleRange::new(0, 10), 57.0, &cbs);
        assert!(second.is_unchanged());
        for (a, b) in first.rows.iter().zip(&second.rows) {
            assert!(Rc::ptr_eq(a, b));
        }
        assert_eq!(mat.stats().hits, 10);
    }

    #[test]
    fn toggle_rebuilds_only_that_row() {
        let mut mat = RowMaterializer::default();
        let cbs = callbacks();
        let before = list(20);
        let first = mat.materialize(&before, VisibleRange::new(0, 10), 57.0, &cbs);
        let after = before.with_replaced(4, before.get(4).unwrap().toggled());
        let second = mat.materialize(&after, VisibleRange::new(0, 10), 57.0, &cbs);

        assert_eq!(
            second.patch,
            vec![RowChange::Built {
                key: ItemId(5),
                index: 4
            }]
        );
        assert!(second.rows[4].item.checked);
        assert!(!Rc::ptr_eq(&first.rows[4], &second.rows[4]));
        assert!(Rc::ptr_eq(&first.rows[3], &second.rows[3]));
        assert_eq!(mat.stats().item_changed, 1);
    }

    #[test]
    fn remove_shifts_following_rows() {
        let mut mat = RowMaterializer::new(100);
        let cbs = callbacks();
        let before = list(20);
        mat.materialize(&before, VisibleRange::new(0, 10), 57.0, &cbs);
        let after = before.without_index(2);
        let out = mat.materialize(&after, VisibleRange::new(0, 10), 57.0, &cbs);
        // rows 0 and 1 keep their place; everything from old index 3 moved up
        assert_eq!(out.built_count(), 8);
        assert_eq!(mat.stats().moved, 7);
        assert_eq!(keys(&out), vec![1, 2, 4, 5, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn removed_visible_row_is_reported() {
        let mut mat = RowMaterializer::default();
        let cbs = callbacks();
        let before = list(20);
        mat.materialize(&before, VisibleRange::new(0, 10), 57.0, &cbs);
        let after = before.without_index(2);
        let out = mat.materialize(&after, VisibleRange::new(0, 10), 57.0, &cbs);

        assert!(out.patch.contains(&RowChange::Removed { key: ItemId(3) }));
        assert_eq!(out.removed_count(), 1);
        assert_eq!(out.evicted_count(), 0);
        assert!(out.rows.iter().all(|row| row.key != ItemId(3)));
        assert_eq!(mat.stats().removals, 1);
    }

    #[test]
    fn scrolled_out_rows_are_reported_once() {
        let mut mat = RowMaterializer::new(100);
        let cbs = callbacks();
        let snapshot = list(50);
        mat.materialize(&snapshot, VisibleRange::new(0, 10), 57.0, &cbs);
        let out = mat.materialize(&snapshot, VisibleRange::new(2, 12), 57.0, &cbs);
        assert_eq!(
            out.patch,
            vec![
                RowChange::Built { key: ItemId(11), index: 10 },
                RowChange::Built { key: ItemId(12), index: 11 },
                RowChange::Removed { key: ItemId(1) },
                RowChange::Removed { key: ItemId(2) },
            ]
        );
        let out = mat.materialize(&snapshot, VisibleRange::new(2, 12), 57.0, &cbs);
        assert!(out.is_unchanged());
    }

    #[test]
    fn field_equal_item_is_a_hit() {
        let mut mat = RowMaterializer::default();
        let cbs = callbacks();
        mat.materialize(&list(5), VisibleRange::new(0, 5), 57.0, &cbs);
        let out = mat.materialize(&list(5), VisibleRange::new(0, 5), 57.0, &cbs);
        assert!(out.is_unchanged());
    }

    #[test]
    fn new_callbacks_rebuild_rows() {
        let mut mat = RowMaterializer::default();
        let snapshot = list(5);
        mat.materialize(&snapshot, VisibleRange::new(0, 5), 57.0, &callbacks());
        let out = mat.materialize(&snapshot, VisibleRange::new(0, 5), 57.0, &callbacks());
        assert_eq!(out.built_count(), 5);
        assert_eq!(mat.stats().callbacks_changed, 5);
    }

    #[test]
    fn scrolling_evicts_beyond_bound() {
        let mut mat = RowMaterializer::new(4);
        let cbs = callbacks();
        let snapshot = list(100);
        mat.materialize(&snapshot, VisibleRange::new(0, 10), 57.0, &cbs);
        assert_eq!(mat.cached_len(), 10);

        // 2 new rows: 12 cached, bound 14, nothing evicted
        let out = mat.materialize(&snapshot, VisibleRange::new(2, 12), 57.0, &cbs);
        assert_eq!(out.built_count(), 2);
        assert_eq!(mat.cached_len(), 12);

        // 8 more new rows: 20 cached > 14, the 10 untouched ones go
        let out = mat.materialize(&snapshot, VisibleRange::new(10, 20), 57.0, &cbs);
        let evicted: Vec<RowChange> = out
            .patch
            .iter()
            .copied()
            .filter(|change| matches!(change, RowChange::Evicted { .. }))
            .collect();
        assert_eq!(evicted.len(), 10);
        assert_eq!(evicted[0], RowChange::Evicted { key: ItemId(1) });
        assert_eq!(mat.cached_len(), 10);
        assert_eq!(mat.stats().evictions, 10);
    }

    #[test]
    fn stale_range_is_clamped() {
        let mut mat = RowMaterializer::default();
        let cbs = callbacks();
        let out = mat.materialize(&list(3), VisibleRange::new(2, 12), 57.0, &cbs);
        assert_eq!(keys(&out), vec![3]);
        let out = mat.materialize(&list(3), VisibleRange::new(8, 12), 57.0, &cbs);
        assert!(out.rows.is_empty());
        let out = mat.materialize(&TodoList::new(), VisibleRange::new(0, 10), 57.0, &cbs);
        assert!(out.rows.is_empty());
    }

    #[test]
    fn clear_forces_rebuild() {
        let mut mat = RowMaterializer::default();
        let cbs = callbacks();
        let snapshot = list(5);
        mat.materialize(&snapshot, VisibleRange::new(0, 5), 57.0, &cbs);
        mat.clear();
        assert_eq!(mat.cached_len(), 0);
        let out = mat.materialize(&snapshot, VisibleRange::new(0, 5), 57.0, &cbs);
        assert_eq!(out.built_count(), 5);
        assert_eq!(mat.stats().passes, 2);
    }
}
