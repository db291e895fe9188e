#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vtodo_core::{ViewportMetrics, visible_count, visible_range};

#[derive(Debug, Arbitrary)]
struct Input {
    len: u32,
    scroll_offset: f64,
    viewport_extent: f64,
    item_extent: f64,
    overscan: u8,
}

fuzz_target!(|input: Input| {
    let Ok(metrics) =
        ViewportMetrics::new(input.scroll_offset, input.viewport_extent, input.item_extent)
    else {
        return;
    };
    let len = input.len as usize;
    let range = visible_range(len, &metrics);

    // Post-conditions that must always hold:
    assert!(range.start <= range.end, "inverted range");
    assert!(range.end <= len, "range past the end");
    assert!(range.len() <= visible_count(&metrics), "range wider than viewport");
    if len > 0 {
        assert!(!range.is_empty(), "empty range over non-empty list");
    }

    let widened = range.with_overscan(input.overscan as usize, len);
    assert!(widened.start <= range.start && range.end <= widened.end);
    assert!(widened.end <= len, "overscan past the end");
});
