#![no_main]

use std::collections::HashSet;
use std::rc::Rc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vtodo_core::{Item, ItemId, RowCallbacks, ViewportMetrics, visible_range};
use vtodo_runtime::{Action, TodoActions, TodoStore};
use vtodo_widgets::RowMaterializer;

#[derive(Debug, Arbitrary)]
enum Op {
    Insert,
    HostInsert(u8),
    Toggle(u8),
    Remove(u8),
    Scroll(u16),
    Unknown,
}

fuzz_target!(|ops: Vec<Op>| {
    let store = Rc::new(TodoStore::with_bulk(40));
    let actions = TodoActions::new(Rc::clone(&store));
    let callbacks: RowCallbacks = actions.row_callbacks();
    let mut materializer = RowMaterializer::new(4);
    let mut scroll = 0.0;

    for op in ops {
        let before = store.revision();
        match op {
            Op::Insert => actions.on_insert("fuzz"),
            Op::HostInsert(gap) => {
                let id = ItemId(store.peek_next_id().get() + u64::from(gap));
                store.dispatch(Action::insert(Item::new(id, "host")));
                assert!(store.peek_next_id() > id, "generator behind a host insert");
            }
            Op::Toggle(id) => actions.on_toggle(ItemId(u64::from(id))),
            Op::Remove(id) => actions.on_remove(ItemId(u64::from(id))),
            Op::Scroll(offset) => scroll = f64::from(offset),
            Op::Unknown => {
                store.dispatch(Action::Unknown);
                assert_eq!(store.revision(), before, "unknown action changed state");
            }
        }

        let snapshot = store.snapshot();
        let ids: HashSet<ItemId> = snapshot.iter().map(|item| item.id).collect();
        assert_eq!(ids.len(), snapshot.len(), "duplicate ids");

        let Ok(metrics) = ViewportMetrics::new(scroll, 513.0, 57.0) else {
            return;
        };
        let range = visible_range(snapshot.len(), &metrics);
        let frame = materializer.materialize(&snapshot, range, 57.0, &callbacks);
        assert_eq!(frame.rows.len(), range.len());
        for (row, index) in frame.rows.iter().zip(range) {
            assert_eq!(row.index, index);
            assert_eq!(*row.item, **snapshot.get(index).expect("row in range"));
        }
    }
});
