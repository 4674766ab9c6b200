//! Counter reducer behavior

#![allow(clippy::unwrap_used)] // Tests can unwrap

use compose_reducer_core::{BuildMode, json};
use compose_reducer_testing::assertions::assert_no_unexpected_keys;
use compose_reducer_testing::{ReducerTest, test_composer};
use counter::{action, counter_reducer, counter_types};

#[test]
fn test_counter_types_are_namespaced() {
    let types = counter_types().unwrap();
    assert_eq!(types.get("double_step"), Some("counter/double_step"));
}

#[test]
fn test_counter_sequence() {
    let (composer, diagnostics) = test_composer(BuildMode::Development);
    let reducer = counter_reducer(&composer).unwrap();

    ReducerTest::new(reducer.clone())
        .when_actions([action("increment"), action("double_step"), action("increment")])
        .then_state(|state| assert_eq!(state, &json!({ "count": 3, "step": 2 })))
        .run();

    ReducerTest::new(reducer)
        .given_state(json!({ "count": 7, "step": 1 }))
        .when_actions([action("decrement"), action("reset")])
        .then_state(|state| assert_eq!(state["count"], 0))
        .run();

    assert_no_unexpected_keys(&diagnostics);
}
