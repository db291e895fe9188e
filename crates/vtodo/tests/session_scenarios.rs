#![forbid(unsafe_code)]

//! End-to-end session tests: host events in, descriptors and patches out.

use std::rc::Rc;

use proptest::prelude::*;

use vtodo::prelude::*;
use vtodo::visible_range;

fn bulk_app() -> TodoApp {
    TodoApp::new(ListConfig::default()).unwrap()
}

fn metrics(scroll: f64) -> ViewportMetrics {
    ViewportMetrics::new(scroll, 513.0, 57.0).unwrap()
}

// ============================================================================
// Windowing through the session
// ============================================================================

#[test]
fn first_page_of_bulk_list() {
    let mut app = bulk_app();
    let rows = app.visible_descriptors(&metrics(0.0));
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0].key, ItemId(1));
    assert_eq!(rows[0].item.text, "Task 1");
    assert_eq!(rows[9].position_offset, 513.0);
}

#[test]
fn ten_rows_down() {
    let mut app = bulk_app();
    let rows = app.visible_descriptors(&metrics(570.0));
    assert_eq!(rows[0].index, 10);
    assert_eq!(rows[0].key, ItemId(11));
    assert_eq!(rows.len(), 10);
}

#[test]
fn host_offset_past_the_end_is_windowed_as_given() {
    let mut app = bulk_app();
    let metrics = metrics(142_400.0);
    let expected = visible_range(2500, &metrics);
    assert_eq!(expected, VisibleRange::new(2498, 2500));

    let rows = app.visible_descriptors(&metrics);
    let indices: Vec<usize> = rows.iter().map(|row| row.index).collect();
    assert_eq!(indices, vec![2498, 2499]);
    assert_eq!(app.list_state().scroll_offset(), 142_400.0);
}

#[test]
fn overscan_widens_frame() {
    let mut app = TodoApp::new(ListConfig {
        overscan: 2,
        ..ListConfig::default()
    })
    .unwrap();
    let rows = app.visible_descriptors(&metrics(570.0));
    assert_eq!(rows.len(), 14);
    assert_eq!(rows[0].index, 8);
}

// ============================================================================
// Mutations through row callbacks
// ============================================================================

#[test]
fn toggle_from_row_rebuilds_one_descriptor() {
    let mut app = bulk_app();
    let first = app.frame();
    first.rows[4].toggle();
    let second = app.frame();

    assert_eq!(
        second.patch,
        vec![RowChange::Built {
            key: ItemId(5),
            index: 4
        }]
    );
    for (i, (a, b)) in first.rows.iter().zip(&second.rows).enumerate() {
        assert_eq!(Rc::ptr_eq(a, b), i != 4);
    }
}

#[test]
fn mutation_outside_window_keeps_frame() {
    let mut app = bulk_app();
    app.frame();
    app.on_toggle(ItemId(2000));
    app.on_remove(ItemId(2400));
    let frame = app.frame();
    assert!(frame.is_unchanged());
    assert_eq!(app.store().revision(), 2);
}

#[test]
fn insert_lands_at_the_end() {
    let mut app = bulk_app();
    app.on_insert("Buy milk");
    let len = app.snapshot().len();
    assert_eq!(len, 2501);
    app.list_state_mut().scroll_to_bottom(len);
    let frame = app.frame();
    let last = frame.rows.last().unwrap();
    assert_eq!(last.key, ItemId(2501));
    assert_eq!(last.item.text, "Buy milk");
    assert!(!last.item.checked);
}

#[test]
fn callbacks_keep_identity_across_frames() {
    let mut app = bulk_app();
    let first = app.frame();
    let toggle = first.rows[0].on_toggle.clone();
    let remove = first.rows[0].on_remove.clone();
    first.rows[0].remove();
    let second = app.frame();
    for row in &second.rows {
        assert_eq!(row.on_toggle, toggle);
        assert_eq!(row.on_remove, remove);
    }
    assert_eq!(second.rows[0].key, ItemId(2));
}

#[test]
fn three_item_scenarios() {
    let mut app = TodoApp::with_items(
        ListConfig::default(),
        [
            Item::new(ItemId(1), "one").with_checked(true),
            Item::new(ItemId(2), "two").with_checked(true),
            Item::new(ItemId(3), "three"),
        ],
    )
    .unwrap();

    app.on_toggle(ItemId(2));
    let flags: Vec<bool> = app.snapshot().iter().map(|i| i.checked).collect();
    assert_eq!(flags, vec![true, false, false]);

    app.on_remove(ItemId(1));
    app.on_remove(ItemId(99));
    let keys: Vec<ItemId> = app.frame().rows.iter().map(|r| r.key).collect();
    assert_eq!(keys, vec![ItemId(2), ItemId(3)]);
}

// ============================================================================
// Property: frames always mirror the store
// ============================================================================

#[derive(Debug, Clone)]
enum HostEvent {
    Insert,
    Toggle(u64),
    Remove(u64),
    Scroll(f64),
}

fn host_event() -> impl Strategy<Value = HostEvent> {
    prop_oneof![
        Just(HostEvent::Insert),
        (1u64..80).prop_map(HostEvent::Toggle),
        (1u64..80).prop_map(HostEvent::Remove),
        (0.0f64..6_000.0).prop_map(HostEvent::Scroll),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn frames_mirror_the_store(events in prop::collection::vec(host_event(), 1..50)) {
        let mut app = TodoApp::new(ListConfig { bulk_count: 60, ..ListConfig::default() }).unwrap();
        for event in events {
            match event {
                HostEvent::Insert => app.on_insert("x"),
                HostEvent::Toggle(id) => app.on_toggle(ItemId(id)),
                HostEvent::Remove(id) => app.on_remove(ItemId(id)),
                HostEvent::Scroll(offset) => {
                    let len = app.snapshot().len();
                    app.list_state_mut().scroll_to_offset(offset, len);
                }
            }
            let frame = app.frame();
            let snapshot = app.snapshot();
            let range = app.list_state().render_range(snapshot.len());
            prop_assert_eq!(frame.rows.len(), range.len());
            for (row, index) in frame.rows.iter().zip(range) {
                prop_assert_eq!(&*row.item, &**snapshot.get(index).unwrap());
            }
        }
    }
}
