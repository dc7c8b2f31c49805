#![cfg(feature = "persistent")]
//! Integration tests for the evaluation trace.
//!
//! Tests cover:
//! - Which cells a consumer forces, as seen by an observer
//! - Fold step and resume events
//! - Nested observers
//! - Evaluation is the same with and without observers or log subscribers

use lazylist::persistent::LazyList;
use lazylist::trace::{ForceEvent, Recorder, ThunkRole, is_observed, observe};
use rstest::rstest;
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

fn forced_prefix(list: &LazyList<u32>, limit: u32) -> Vec<ForceEvent> {
    let recorder = Recorder::new();
    observe(recorder.clone(), || list.exists(|n| *n == limit));
    recorder.events()
}

// =============================================================================
// Forced Cells
// =============================================================================

#[rstest]
fn observer_sees_heads_in_evaluation_order() {
    let list = LazyList::count_from(0_u32);
    let first = list.node_id().unwrap();
    let recorder = Recorder::new();

    observe(recorder.clone(), || list.take(3).to_vec());

    let heads = recorder.heads_evaluated();
    assert_eq!(heads.len(), 3);
    assert_eq!(heads[0], first);
    assert!(heads.windows(2).all(|pair| pair[0] < pair[1]));
}

#[rstest]
fn second_traversal_is_answered_from_cache() {
    let list: LazyList<u32> = (0..5).collect();
    let cold = forced_prefix(&list, 2);
    let warm = forced_prefix(&list, 2);

    assert!(cold.iter().any(|event| matches!(event, ForceEvent::Evaluated { .. })));
    assert!(!warm.iter().any(|event| matches!(event, ForceEvent::Evaluated { .. })));
    assert_eq!(
        warm.iter()
            .filter(|event| matches!(event, ForceEvent::Cached { role: ThunkRole::Head(_) }))
            .count(),
        3
    );
}

#[rstest]
fn head_option_resumes_nothing() {
    let list = LazyList::cons(|| 1, || LazyList::singleton(2));
    let recorder = Recorder::new();

    observe(recorder.clone(), || list.head_option());

    assert!(recorder.resumed_depths().is_empty());
    assert!(recorder.tails_evaluated().is_empty());
    assert!(recorder.events().contains(&ForceEvent::FoldStep { depth: 0 }));
}

#[rstest]
fn fold_reports_resume_depths() {
    let list: LazyList<u32> = (1..=4).collect();
    let recorder = Recorder::new();

    let sum = observe(recorder.clone(), || {
        list.fold_right(|| 0, |element, rest| element + rest.force())
    });

    assert_eq!(sum, 10);
    assert_eq!(recorder.resumed_depths(), vec![1, 2, 3, 4]);
    assert_eq!(recorder.events().last(), Some(&ForceEvent::FoldEnd { depth: 4 }));
}

#[rstest]
fn roles_name_the_cell_they_belong_to() {
    let list = LazyList::cons(|| 1, || LazyList::singleton(2));
    let recorder = Recorder::new();

    observe(recorder.clone(), || list.tail());

    let nodes: Vec<_> = recorder
        .events()
        .iter()
        .filter_map(ForceEvent::role)
        .filter_map(ThunkRole::node)
        .collect();
    assert_eq!(nodes, list.node_id().into_iter().collect::<Vec<_>>());
    assert_eq!(ThunkRole::Value.node(), None);
}

#[rstest]
fn failed_tail_is_reported_with_its_cell() {
    let list: LazyList<i32> = LazyList::cons(|| 1, || panic!("unavailable"));
    let node = list.node_id().unwrap();
    let recorder = Recorder::new();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        observe(recorder.clone(), || list.tail())
    }));

    assert!(outcome.is_err());
    assert!(recorder.events().contains(&ForceEvent::Failed {
        role: ThunkRole::Tail(node)
    }));
}

// =============================================================================
// Observers
// =============================================================================

#[rstest]
fn nested_observers_both_receive() {
    let outer = Recorder::new();
    let inner = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&inner);
    let list: LazyList<u32> = vec![7].into();

    observe(outer.clone(), || {
        observe(move |event: &ForceEvent| sink.borrow_mut().push(*event), || list.head())
    });

    assert_eq!(outer.events(), *inner.borrow());
    assert!(!outer.is_empty());
    assert!(!is_observed());
}

#[rstest]
fn observation_does_not_change_evaluation() {
    let plain = LazyList::count_from(1_u32).filter(|n| n % 3 == 0).take(4);
    let watched = LazyList::count_from(1_u32).filter(|n| n % 3 == 0).take(4);

    let expected = plain.to_vec();
    let observed = observe(Recorder::new(), || watched.to_vec());
    assert_eq!(observed, expected);
}

#[rstest]
fn evaluation_with_a_log_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("lazylist=trace"))
        .with_test_writer()
        .finish();

    let total = tracing::subscriber::with_default(subscriber, || {
        LazyList::count_from(1_u32)
            .take(10)
            .fold_right(|| 0, |element, rest| element + rest.force())
    });
    assert_eq!(total, 55);
}
