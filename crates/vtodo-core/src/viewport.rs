#![forbid(unsafe_code)]

//! Fixed-extent viewport windowing.
//!
//! Maps `(collection size, item extent, viewport extent, scroll offset)` to
//! the contiguous index range that must be drawn. Everything here is O(1)
//! and never looks at item contents, which is what keeps per-frame cost
//! independent of collection size.
//!
//! # Formula
//!
//! ```text
//! start = clamp(floor(scroll_offset / item_extent), 0, max(len - 1, 0))
//! count = ceil(viewport_extent / item_extent) + 1
//! end   = clamp(start + count, start, len)
//! ```
//!
//! The `+ 1` covers a partially exposed row at the trailing edge.
//!
//! # Example
//!
//! ```
//! use vtodo_core::viewport::{ViewportMetrics, visible_range};
//!
//! let metrics = ViewportMetrics::new(570.0, 513.0, 57.0).unwrap();
//! let range = visible_range(2500, &metrics);
//! assert_eq!(range.start, 10);
//! assert_eq!(range.len(), 10);
//! ```

use std::fmt;
use std::ops::Range;

/// Host-supplied scroll geometry.
///
/// # Invariants
///
/// - `scroll_offset` is finite and `>= 0`.
/// - `viewport_extent` and `item_extent` are finite and `> 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    scroll_offset: f64,
    viewport_extent: f64,
    item_extent: f64,
}

/// Rejected viewport geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricsError {
    /// Scroll offset was negative or not finite.
    ScrollOffset(f64),
    /// Viewport extent was not a positive finite number.
    ViewportExtent(f64),
    /// Item extent was not a positive finite number.
    ItemExtent(f64),
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScrollOffset(v) => write!(f, "scroll offset must be finite and >= 0, got {v}"),
            Self::ViewportExtent(v) => {
                write!(f, "viewport extent must be finite and > 0, got {v}")
            }
            Self::ItemExtent(v) => write!(f, "item extent must be finite and > 0, got {v}"),
        }
    }
}

impl std::error::Error for MetricsError {}

fn positive_finite(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

impl ViewportMetrics {
    /// Validate and build metrics.
    pub fn new(
        scroll_offset: f64,
        viewport_extent: f64,
        item_extent: f64,
    ) -> Result<Self, MetricsError> {
        if !(scroll_offset.is_finite() && scroll_offset >= 0.0) {
            return Err(MetricsError::ScrollOffset(scroll_offset));
        }
        if !positive_finite(viewport_extent) {
            return Err(MetricsError::ViewportExtent(viewport_extent));
        }
        if !positive_finite(item_extent) {
            return Err(MetricsError::ItemExtent(item_extent));
        }
        Ok(Self {
            scroll_offset,
            viewport_extent,
            item_extent,
        })
    }

    /// Same geometry at a new scroll offset.
    ///
    /// Negative or non-finite offsets (overscroll bounce, bad host math)
    /// clamp to 0 instead of failing.
    #[must_use]
    pub fn scrolled_to(self, scroll_offset: f64) -> Self {
        let scroll_offset = if scroll_offset.is_finite() {
            scroll_offset.max(0.0)
        } else {
            0.0
        };
        Self {
            scroll_offset,
            ..self
        }
    }

    /// Same geometry with a new viewport extent.
    pub fn resized(self, viewport_extent: f64) -> Result<Self, MetricsError> {
        Self::new(self.scroll_offset, viewport_extent, self.item_extent)
    }

    #[inline]
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    #[inline]
    #[must_use]
    pub fn viewport_extent(&self) -> f64 {
        self.viewport_extent
    }

    #[inline]
    #[must_use]
    pub fn item_extent(&self) -> f64 {
        self.item_extent
    }
}

/// Half-open index range `[start, end)` of rows to draw.
///
/// Always satisfies `start <= end`; callers that derive it from
/// [`visible_range`] also get `end <= len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    /// The empty range at 0.
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    /// Build a range; `end` is raised to `start` if lower.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        let end = if end < start { start } else { end };
        Self { start, end }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Clamp both ends to `len` (used after the collection shrinks).
    #[must_use]
    pub fn clamp_to(self, len: usize) -> Self {
        let end = self.end.min(len);
        Self::new(self.start.min(end), end)
    }

    /// Widen by `overscan` rows on each side, clamped to `[0, len)`.
    #[must_use]
    pub fn with_overscan(self, overscan: usize, len: usize) -> Self {
        let start = self.start.saturating_sub(overscan);
        let end = self.end.saturating_add(overscan).min(len);
        Self::new(start.min(end), end)
    }

    /// As a std range for slicing/iteration.
    #[inline]
    #[must_use]
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<VisibleRange> for Range<usize> {
    fn from(range: VisibleRange) -> Self {
        range.as_range()
    }
}

impl IntoIterator for VisibleRange {
    type Item = usize;
    type IntoIter = Range<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_range()
    }
}

/// Rows needed to cover the viewport, including the partial trailing row.
#[inline]
#[must_use]
pub fn visible_count(metrics: &ViewportMetrics) -> usize {
    ((metrics.viewport_extent / metrics.item_extent).ceil() as usize).saturating_add(1)
}

/// Compute the visible index range. O(1).
#[must_use]
pub fn visible_range(len: usize, metrics: &ViewportMetrics) -> VisibleRange {
    if len == 0 {
        return VisibleRange::EMPTY;
    }
    // `as usize` saturates for huge offsets; the clamp below bounds it anyway.
    let first = (metrics.scroll_offset / metrics.item_extent).floor() as usize;
    let start = first.min(len - 1);
    let end = start.saturating_add(visible_count(metrics)).min(len);
    VisibleRange::new(start, end)
}

/// Leading-edge offset of the row at `index`.
#[inline]
#[must_use]
pub fn position_offset(index: usize, item_extent: f64) -> f64 {
    index as f64 * item_extent
}

/// Total scrollable extent of `len` rows.
#[inline]
#[must_use]
pub fn content_extent(len: usize, item_extent: f64) -> f64 {
    len as f64 * item_extent
}

/// Largest scroll offset that still fills the viewport (0 when content fits).
#[must_use]
pub fn max_scroll_offset(len: usize, metrics: &ViewportMetrics) -> f64 {
    (content_extent(len, metrics.item_extent) - metrics.viewport_extent).max(0.0)
}
