#![cfg(feature = "serde")]
//! Serialization of strict lists and evaluation traces.

use lazylist::persistent::{LazyList, PersistentList};
use lazylist::trace::{ForceEvent, Recorder, ThunkRole, observe};
use rstest::rstest;
use serde_json::json;

#[rstest]
fn materialized_list_round_trips_through_json() {
    let list = LazyList::count_from(1_u32).take(3).to_list();
    let encoded = serde_json::to_string(&list).unwrap();
    assert_eq!(encoded, "[1,2,3]");

    let decoded: PersistentList<u32> = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, list);
}

#[rstest]
#[case(ForceEvent::Evaluated { role: ThunkRole::Value }, json!({"event": "evaluated", "role": "Value"}))]
#[case(ForceEvent::FoldStep { depth: 2 }, json!({"event": "fold_step", "depth": 2}))]
#[case(ForceEvent::Resumed { depth: 1 }, json!({"event": "resumed", "depth": 1}))]
fn event_shape(#[case] event: ForceEvent, #[case] expected: serde_json::Value) {
    assert_eq!(serde_json::to_value(event).unwrap(), expected);
}

#[rstest]
fn trace_names_the_forced_cell() {
    let list = LazyList::singleton(5_u8);
    let node = list.node_id().unwrap();
    let recorder = Recorder::new();
    observe(recorder.clone(), || list.tail());

    let events = serde_json::to_value(recorder.events()).unwrap();
    assert_eq!(
        events,
        json!([{"event": "evaluated", "role": {"Tail": node.get()}}])
    );
}
