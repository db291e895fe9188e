#![forbid(unsafe_code)]

//! Scroll state for a fixed-extent virtualized list.
//!
//! [`VirtualizedList`] holds the viewport geometry and an overscan amount
//! and answers which rows to draw for a collection of a given length. The
//! length is passed in on every call: the list state never owns items, so a
//! new snapshot needs nothing more than the next call.
//!
//! Scroll offsets are clamped to `[0, max_scroll_offset(len)]` by every
//! scroll helper. Call [`VirtualizedList::clamp_to`] after the collection
//! shrinks to pull a now out-of-range offset back in.

use std::ops::Range;

use vtodo_core::{
    MetricsError, ViewportMetrics, VisibleRange, max_scroll_offset, position_offset,
    visible_range,
};

#[cfg(feature = "tracing")]
use vtodo_core::trace;

/// Scroll state plus overscan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualizedList {
    metrics: ViewportMetrics,
    overscan: usize,
}

impl VirtualizedList {
    /// List state at `metrics` with no overscan.
    #[must_use]
    pub fn new(metrics: ViewportMetrics) -> Self {
        Self {
            metrics,
            overscan: 0,
        }
    }

    /// Set overscan amount.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    #[must_use]
    pub fn metrics(&self) -> ViewportMetrics {
        self.metrics
    }

    #[must_use]
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.metrics.scroll_offset()
    }

    /// Replace the whole geometry (host resize or re-layout).
    pub fn set_metrics(&mut self, metrics: ViewportMetrics) {
        self.metrics = metrics;
    }

    /// Change only the viewport extent.
    pub fn set_viewport(&mut self, viewport_extent: f64) -> Result<(), MetricsError> {
        self.metrics = self.metrics.resized(viewport_extent)?;
        Ok(())
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.overscan = overscan;
    }

    /// Scroll to `offset`, clamped to the scrollable extent of `len` rows.
    pub fn scroll_to_offset(&mut self, offset: f64, len: usize) {
        let max = max_scroll_offset(len, &self.metrics);
        let clamped = if offset.is_finite() {
            offset.clamp(0.0, max)
        } else {
            0.0
        };
        #[cfg(feature = "tracing")]
        trace!(requested = offset, clamped, len, "scroll_to_offset");
        self.metrics = self.metrics.scrolled_to(clamped);
    }

    /// Scroll by `delta` (positive = down).
    pub fn scroll_by(&mut self, delta: f64, len: usize) {
        self.scroll_to_offset(self.scroll_offset() + delta, len);
    }

    /// Put row `index` at the top of the viewport (as far as the content
    /// allows).
    pub fn scroll_to_index(&mut self, index: usize, len: usize) {
        let index = index.min(len.saturating_sub(1));
        self.scroll_to_offset(position_offset(index, self.metrics.item_extent()), len);
    }

    /// Page down (scroll by one viewport).
    pub fn page_down(&mut self, len: usize) {
        self.scroll_by(self.metrics.viewport_extent(), len);
    }

    /// Page up (scroll by one viewport).
    pub fn page_up(&mut self, len: usize) {
        self.scroll_by(-self.metrics.viewport_extent(), len);
    }

    pub fn scroll_to_top(&mut self) {
        self.metrics = self.metrics.scrolled_to(0.0);
    }

    pub fn scroll_to_bottom(&mut self, len: usize) {
        let max = max_scroll_offset(len, &self.metrics);
        self.metrics = self.metrics.scrolled_to(max);
    }

    /// Whether the last row is fully in view.
    #[must_use]
    pub fn is_at_bottom(&self, len: usize) -> bool {
        self.scroll_offset() >= max_scroll_offset(len, &self.metrics)
    }

    /// Pull the offset back into range after the collection shrank to `len`.
    pub fn clamp_to(&mut self, len: usize) {
        let max = max_scroll_offset(len, &self.metrics);
        if self.scroll_offset() > max {
            self.metrics = self.metrics.scrolled_to(max);
        }
    }

    /// Rows intersecting the viewport.
    #[must_use]
    pub fn visible_range(&self, len: usize) -> VisibleRange {
        visible_range(len, &self.metrics)
    }

    /// Visible rows widened by the overscan on each side.
    #[must_use]
    pub fn render_range(&self, len: usize) -> VisibleRange {
        self.visible_range(len).with_overscan(self.overscan, len)
    }

    /// [`render_range`](Self::render_range) as a std range.
    #[must_use]
    pub fn render_indices(&self, len: usize) -> Range<usize> {
        self.render_range(len).as_range()
    }
}
