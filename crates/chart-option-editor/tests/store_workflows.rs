use std::cell::RefCell;
use std::rc::Rc;

use chart_option_editor::{DocumentStore, DraftOp, StoreError};
use chart_option_path::{field_path, parse_pointer, MutateError, SubtreeSchema};
use serde_json::json;

fn axis_schema() -> SubtreeSchema {
    SubtreeSchema::new()
        .bool("show", true)
        .text("name", "")
        .enumeration("position", ["left", "right"])
}

#[test]
fn panels_edit_independent_instances() {
    let mut store = DocumentStore::new(json!({"yAxis": {"name": "Revenue"}}));
    assert_eq!(store.repeatable(field_path!["yAxis"]).available_count(), 1);

    let second = store.repeatable(field_path!["yAxis"]).instance_path(1);
    store
        .mutate(|draft| {
            draft
                .set(&second.key("name"), "Margin")
                .set(&second.key("position"), "right");
        })
        .unwrap();

    let axes = store.repeatable(field_path!["yAxis"]);
    assert_eq!(axes.available_count(), 2);
    assert_eq!(axes.view(0, &axis_schema()).str("name"), Some("Revenue"));
    assert_eq!(axes.view(1, &axis_schema()).str("position"), Some("right"));
    assert_eq!(axes.view(5, &axis_schema()), axis_schema().defaults_view());
}

#[test]
fn readers_keep_their_snapshot() {
    let mut store = DocumentStore::new(json!({"legend": {"show": true}}));
    let held = store.snapshot();
    store
        .mutate(|draft| {
            draft.set(&field_path!["legend", "show"], false);
        })
        .unwrap();
    assert_eq!(*held, json!({"legend": {"show": true}}));
    assert_eq!(store.read(&field_path!["legend"], &axis_schema()).bool("show"), Some(false));
}

#[test]
fn aborted_recipe_publishes_nothing() {
    let events = Rc::new(RefCell::new(0));
    let mut store = DocumentStore::new(json!({"series": [{"type": "line"}]}));
    let sink = Rc::clone(&events);
    store.subscribe(move |_| *sink.borrow_mut() += 1);

    let result = store.mutate(|draft| {
        draft.set(&field_path!["grid", "left"], "5%");
        draft.set(&field_path!["series", "type"], "bar");
    });
    assert!(matches!(result, Err(StoreError::Aborted(_))));
    assert_eq!(*events.borrow(), 0);
    assert_eq!(store.get(&field_path!["grid"]), None);
}

#[test]
fn change_events_carry_ops_and_versions() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut store = DocumentStore::default();
    let sink = Rc::clone(&log);
    store.subscribe(move |ev| {
        sink.borrow_mut()
            .push((ev.version, ev.ops.clone(), ev.after.as_ref().clone()));
    });
    store
        .mutate(|draft| {
            draft.set(&field_path!["title", "text"], "Sales");
            draft.remove_instance(&field_path!["grid"], 0);
        })
        .unwrap();

    let log = log.borrow();
    assert_eq!(log.len(), 1);
    let (version, ops, after) = &log[0];
    assert_eq!(*version, 1);
    assert_eq!(ops.len(), 2);
    assert!(matches!(ops[1], DraftOp::RemoveInstance { index: 0, .. }));
    assert_eq!(after, &json!({"title": {"text": "Sales"}}));
}

#[test]
fn subscribers_run_in_subscription_order() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut store = DocumentStore::default();
    for name in ["first", "second", "third"] {
        let sink = Rc::clone(&order);
        store.subscribe(move |_| sink.borrow_mut().push(name));
    }
    store
        .mutate(|draft| {
            draft.set(&field_path!["legend", "show"], true);
        })
        .unwrap();
    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn scoped_listener_sees_nested_writes() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut store = DocumentStore::new(json!({"xAxis": [{"name": "a"}, {"name": "b"}]}));
    let sink = Rc::clone(&seen);
    store.subscribe_at(field_path!["xAxis", 1], move |ev| {
        sink.borrow_mut().push(ev.after.clone());
    });
    store
        .mutate(|draft| {
            draft.set(&field_path!["xAxis", 0, "name"], "A");
        })
        .unwrap();
    store
        .mutate(|draft| {
            draft.set(&field_path!["xAxis", 1, "name"], "B");
        })
        .unwrap();
    assert_eq!(*seen.borrow(), vec![Some(json!({"name": "B"}))]);
}

#[test]
fn far_index_from_user_pointer_aborts_recipe() {
    let mut store = DocumentStore::new(json!({"grid": [{"left": 1}]}));
    let before = store.snapshot();
    for pointer in ["/grid/18446744073709551615/left", "/grid/4000000000/left"] {
        let path = parse_pointer(pointer).unwrap();
        let result = store.mutate(|draft| {
            draft.set(&field_path!["title", "text"], "Sales");
            draft.set(&path, 5);
        });
        assert!(matches!(
            result,
            Err(StoreError::Aborted(MutateError::IndexTooLarge { .. }))
        ));
    }
    assert_eq!(store.version(), 0);
    assert_eq!(store.snapshot(), before);
}

#[test]
fn clearing_an_instance_keeps_other_panels_bound() {
    let mut store = DocumentStore::new(json!({"visualMap": [{"min": 0}, {"min": 5}]}));
    let schema = SubtreeSchema::new().number("min", 0.0).number("max", 100.0);
    store
        .mutate(|draft| {
            draft.remove(&field_path!["visualMap", 0]);
        })
        .unwrap();
    let maps = store.repeatable(field_path!["visualMap"]);
    assert_eq!(maps.view(0, &schema), schema.defaults_view());
    assert_eq!(maps.view(1, &schema).f64("min"), Some(5.0));
}
