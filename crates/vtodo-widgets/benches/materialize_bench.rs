//! Benchmark: windowing and row materialization.
//!
//! Run with: `cargo bench -p vtodo-widgets --bench materialize_bench`
//!
//! Per-frame cost should track the window size, not the collection size, so
//! every group runs the same viewport over a 2 500-row and a 100 000-row list.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use vtodo_core::{Callback, Item, ItemId, RowCallbacks, TodoList, ViewportMetrics};
use vtodo_widgets::{RowMaterializer, VirtualizedList};

const ITEM_EXTENT: f64 = 57.0;
const SIZES: [u64; 2] = [2_500, 100_000];

fn bulk(n: u64) -> TodoList {
    TodoList::from_items((1..=n).map(|i| Item::new(ItemId(i), format!("Task {i}"))))
}

fn callbacks() -> RowCallbacks {
    RowCallbacks::new(Callback::new(|_| {}), Callback::new(|_| {}))
}

fn list_state() -> VirtualizedList {
    VirtualizedList::new(ViewportMetrics::new(0.0, 513.0, ITEM_EXTENT).unwrap())
}

// ===========================================================================
// Windowing
// ===========================================================================

fn bench_visible_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("visible_range");
    for size in SIZES {
        let mut state = list_state();
        state.scroll_to_index(size as usize / 2, size as usize);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| black_box(state.visible_range(black_box(size as usize))));
        });
    }
    group.finish();
}

// ===========================================================================
// Materialization
// ===========================================================================

fn bench_materialize_warm(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize/warm");
    for size in SIZES {
        let list = bulk(size);
        let state = list_state();
        let cbs = callbacks();
        let mut mat = RowMaterializer::default();
        let range = state.render_range(list.len());
        mat.materialize(&list, range, ITEM_EXTENT, &cbs);

        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| black_box(mat.materialize(&list, range, ITEM_EXTENT, &cbs)));
        });
    }
    group.finish();
}

fn bench_materialize_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize/scroll");
    for size in SIZES {
        let list = bulk(size);
        let cbs = callbacks();
        let mut state = list_state();
        let mut mat = RowMaterializer::default();

        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| {
                state.scroll_by(ITEM_EXTENT, list.len());
                if state.is_at_bottom(list.len()) {
                    state.scroll_to_top();
                }
                let range = state.render_range(list.len());
                black_box(mat.materialize(&list, range, ITEM_EXTENT, &cbs))
            });
        });
    }
    group.finish();
}

fn bench_materialize_after_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize/after_toggle");
    for size in SIZES {
        let base = bulk(size);
        let cbs = callbacks();
        let state = list_state();
        let range = state.render_range(base.len());
        let mut mat = RowMaterializer::default();
        mat.materialize(&base, range, ITEM_EXTENT, &cbs);
        let mut list = base.clone();

        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| {
                if let Some(item) = list.get(3) {
                    let toggled = item.toggled();
                    list = list.with_replaced(3, toggled);
                }
                black_box(mat.materialize(&list, range, ITEM_EXTENT, &cbs))
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_visible_range,
    bench_materialize_warm,
    bench_materialize_scroll,
    bench_materialize_after_toggle,
);
criterion_main!(benches);
