//! Backward sync: console jump commands restore recorded store values

use std::sync::Arc;

use inspector::devtools::ConsoleMessage;
use inspector::unit::Store;
use inspector::{InspectError, InspectorMode, ReplayOutcome};
use parking_lot::Mutex;
use serde_json::{json, Value};

use super::common::start_session;

fn record_writes(store: &Store) -> (Arc<Mutex<Vec<Value>>>, inspector::Subscription) {
    let writes = Arc::new(Mutex::new(Vec::new()));
    let log = writes.clone();
    let sub = store.watch(move |v| log.lock().push(v.clone()));
    (writes, sub)
}

#[test]
fn jump_restores_stores_without_echoing_actions() {
    let session = start_session("app");
    session.units.counter.set_state(5);
    session.conn.clear();

    session
        .conn
        .dispatch(&ConsoleMessage::jump_to_state(&json!({ "counter": 1 })));

    assert_eq!(session.units.counter.get_state(), json!(1));
    assert!(session.conn.sends().is_empty());
    assert_eq!(session.inspector.mode(), InspectorMode::Normal);

    session.units.counter.set_state(2);
    assert_eq!(session.conn.sent_types(), vec!["counter"]);
}

#[test]
fn jump_to_action_is_handled_like_jump_to_state() {
    let session = start_session("app");

    session.conn.dispatch(&ConsoleMessage::jump_to_action(
        4,
        &json!({ "auth": { "user": { "name": "ada" } } }),
    ));

    assert_eq!(session.units.user.get_state(), json!({ "name": "ada" }));
    assert!(session.conn.sends().is_empty());
}

#[test]
fn only_store_paths_are_written() {
    let session = start_session("app");
    let (counter_writes, _a) = record_writes(&session.units.counter);
    let (pending_writes, _b) = record_writes(session.units.login.pending());

    let outcome = session
        .inspector
        .apply(&ConsoleMessage::jump_to_state(&json!({
            "counter": 3,
            "auth": {
                "logout": "fired",
                "login": { "pending": true, "inFlight": 2 },
            },
        })))
        .unwrap();

    assert_eq!(outcome, ReplayOutcome::Applied { writes: 1 });
    assert_eq!(*counter_writes.lock(), vec![json!(3)]);
    assert!(pending_writes.lock().is_empty());
    assert_eq!(session.units.login.pending().get_state(), json!(false));
}

#[test]
fn unchanged_values_are_not_rewritten() {
    let session = start_session("app");
    let (writes, _sub) = record_writes(&session.units.counter);

    let outcome = session
        .inspector
        .apply(&ConsoleMessage::jump_to_state(&json!({ "counter": 0, "lists": [["milk"]] })))
        .unwrap();

    assert_eq!(outcome, ReplayOutcome::Applied { writes: 0 });
    assert!(writes.lock().is_empty());
}

#[test]
fn list_mounted_stores_are_restored() {
    let session = start_session("app");

    session
        .conn
        .dispatch(&ConsoleMessage::jump_to_state(&json!({ "lists": [["bread"]] })));

    assert_eq!(session.units.todos.get_state(), json!(["bread"]));
}

#[test]
fn paths_without_a_live_unit_are_skipped() {
    let session = start_session("app");

    let outcome = session
        .inspector
        .apply(&ConsoleMessage::jump_to_state(&json!({
            "removed": { "deep": { "store": 1 } },
            "lists": [["milk"], ["ghost"]],
            "counter": 4,
        })))
        .unwrap();

    assert_eq!(outcome, ReplayOutcome::Applied { writes: 1 });
    assert_eq!(session.units.counter.get_state(), json!(4));
}

#[test]
fn malformed_state_leaves_session_usable() {
    let session = start_session("app");
    let mut message = ConsoleMessage::jump_to_state(&json!({}));
    message.state = Some("{not json".to_string());

    let err = session.inspector.apply(&message).unwrap_err();
    assert!(matches!(err, InspectError::MalformedSnapshot(_)));
    assert_eq!(session.inspector.mode(), InspectorMode::Normal);

    // Through the console channel the error is logged, not raised.
    session.conn.dispatch(&message);
    assert_eq!(session.inspector.mode(), InspectorMode::Normal);

    session.units.counter.set_state(1);
    assert_eq!(session.conn.sent_types(), vec!["counter"]);
}

#[test]
fn jump_without_state_is_rejected() {
    let session = start_session("app");
    let mut message = ConsoleMessage::jump_to_state(&json!({}));
    message.state = None;

    let err = session.inspector.apply(&message).unwrap_err();
    assert!(matches!(err, InspectError::MissingState));
    assert_eq!(session.inspector.mode(), InspectorMode::Normal);
}

#[test]
fn other_console_messages_are_ignored() {
    let session = start_session("app");
    let message = ConsoleMessage::dispatch("COMMIT", None, Some(r#"{"counter":9}"#.to_string()));

    assert_eq!(session.inspector.apply(&message).unwrap(), ReplayOutcome::Ignored);
    assert_eq!(session.units.counter.get_state(), json!(0));
}

#[test]
fn rewriting_a_replayed_value_is_deduplicated() {
    let session = start_session("app");

    session
        .conn
        .dispatch(&ConsoleMessage::jump_to_state(&json!({ "counter": 7 })));
    session.units.counter.set_state(7);
    assert!(session.conn.sends().is_empty());

    session.units.counter.set_state(8);
    assert_eq!(session.conn.sends()[0].state["counter"], json!(8));
}
