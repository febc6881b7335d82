//! Forward sync: unit firings become labeled console actions

use std::sync::Arc;

use std::time::Duration;

use inspector::devtools::{MemoryConsole, SessionRegistry};
use inspector::tree::Node;
use inspector::unit::Effect;
use inspector::Inspector;
use parking_lot::Mutex;
use serde_json::{json, Value};

use super::common::{app_tree, start_session};

#[test]
fn init_seeds_console_with_baseline() {
    let session = start_session("app");

    assert_eq!(
        session.conn.inits(),
        vec![json!({
            "counter": 0,
            "auth": { "user": null, "login": { "pending": false, "inFlight": 0 } },
            "lists": [["milk"]],
        })]
    );
    assert_eq!(session.inspector.snapshot(), session.conn.inits()[0]);
}

#[test]
fn registers_one_watcher_per_unit_and_eight_per_effect() {
    let session = start_session("app");

    assert_eq!(
        session.inspector.watcher_labels(),
        vec![
            "counter",
            "auth.user",
            "auth.login",
            "auth.login.done",
            "auth.login.doneData",
            "auth.login.fail",
            "auth.login.failData",
            "auth.login.finally",
            "auth.login.pending",
            "auth.login.inFlight",
            "auth.logout",
            "lists.0",
        ]
    );
}

#[test]
fn store_write_sends_action_with_full_snapshot() {
    let session = start_session("app");

    session.units.counter.set_state(0);
    assert!(session.conn.sends().is_empty());

    session.units.todos.set_state(json!(["milk", "eggs"]));

    let sends = session.conn.sends();
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0].action.kind, "lists.0");
    assert_eq!(sends[0].action.payload, json!(["milk", "eggs"]));
    assert_eq!(sends[0].state["lists"], json!([["milk", "eggs"]]));
    assert_eq!(sends[0].state["counter"], json!(0));
}

#[tokio::test]
async fn successful_effect_call_is_traced_step_by_step() {
    let session = start_session("app");

    let user = session.units.login.call(json!({ "login": "ada" })).await;
    assert_eq!(user, Ok(json!({ "name": "ada" })));

    assert_eq!(
        session.conn.sent_types(),
        vec![
            "auth.login",
            "auth.login.inFlight",
            "auth.login.pending",
            "auth.login.inFlight",
            "auth.login.pending",
            "auth.login.finally",
            "auth.login.done",
            "auth.login.doneData",
        ]
    );

    let sends = session.conn.sends();
    assert_eq!(sends[0].action.payload, json!({ "login": "ada" }));
    assert_eq!(sends[2].state["auth"]["login"], json!({ "pending": true, "inFlight": 1 }));
    assert_eq!(sends[7].action.payload, json!({ "name": "ada" }));
    assert_eq!(sends[7].state["auth"]["login"], json!({ "pending": false, "inFlight": 0 }));
}

#[tokio::test]
async fn failed_effect_call_reports_failure() {
    let session = start_session("app");

    let outcome = session.units.login.call(json!({ "login": "mallory" })).await;
    assert_eq!(outcome, Err(json!("denied")));

    let types = session.conn.sent_types();
    assert_eq!(
        &types[types.len() - 3..],
        &["auth.login.finally", "auth.login.fail", "auth.login.failData"]
    );
    assert!(!types.iter().any(|t| t == "auth.login.done"));
}

#[test]
fn event_payloads_are_forwarded() {
    let session = start_session("app");

    session.units.logout.emit(json!({ "reason": "idle" }));

    let sends = session.conn.sends();
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0].action.kind, "auth.logout");
    assert_eq!(sends[0].action.payload, json!({ "reason": "idle" }));
}

#[test]
fn same_name_reuses_one_connection() {
    let console = MemoryConsole::new();
    let registry = SessionRegistry::new();

    let (first_root, first_units) = app_tree();
    let (second_root, second_units) = app_tree();
    let first = inspector::inspect(first_root, "shared", Some(&console), &registry).unwrap();
    let second = inspector::inspect(second_root, "shared", Some(&console), &registry).unwrap();

    assert_eq!(console.connect_count(), 1);

    first_units.counter.set_state(1);
    second_units.counter.set_state(2);

    let conn = console.connection("shared").unwrap();
    assert_eq!(conn.inits().len(), 2);
    assert_eq!(conn.sent_types(), vec!["counter", "counter"]);

    first.teardown();
    second.teardown();
}

#[test]
fn distinct_names_open_distinct_connections() {
    let console = MemoryConsole::new();
    let registry = SessionRegistry::new();

    let (root_a, _) = app_tree();
    let (root_b, _) = app_tree();
    let a = inspector::inspect(root_a, "a", Some(&console), &registry).unwrap();
    let b = inspector::inspect(root_b, "b", Some(&console), &registry).unwrap();

    assert_eq!(console.connect_count(), 2);
    assert_eq!(registry.len(), 2);
    assert_eq!(a.name(), "a");
    assert_eq!(b.config().name, "b");
}

#[test]
fn teardown_from_inside_a_watcher_stops_forwarding() {
    let console = MemoryConsole::new();
    let registry = SessionRegistry::new();
    let (root, units) = app_tree();

    // Registered before the session so it fires first.
    let handle: Arc<Mutex<Option<Inspector>>> = Arc::new(Mutex::new(None));
    let slot = handle.clone();
    let _stopper = units.counter.watch(move |value| {
        if value == &json!(99) {
            if let Some(inspector) = slot.lock().as_ref() {
                inspector.teardown();
            }
        }
    });

    let inspector = inspector::inspect(root, "app", Some(&console), &registry).unwrap();
    *handle.lock() = Some(inspector.clone());
    let conn = console.connection("app").unwrap();

    units.counter.set_state(1);
    units.counter.set_state(99);
    units.counter.set_state(100);

    assert_eq!(conn.sent_types(), vec!["counter"]);
    assert_eq!(conn.subscriber_count(), 0);
    assert_eq!(units.counter.watcher_count(), 1);
}

#[tokio::test]
async fn cancelled_effect_reports_idle_snapshot() {
    let console = MemoryConsole::new();
    let registry = SessionRegistry::new();
    let save = Effect::new(|_params: Value| async move {
        futures::future::pending::<()>().await;
        Ok(Value::Null)
    });
    let root = Node::record([("save", Node::from(save.clone()))]);
    let session = inspector::inspect(root, "app", Some(&console), &registry).unwrap();
    let conn = console.connection("app").unwrap();

    let timed_out = tokio::time::timeout(Duration::from_millis(20), save.call(json!(1))).await;

    assert!(timed_out.is_err());
    assert_eq!(
        session.snapshot(),
        json!({ "save": { "pending": false, "inFlight": 0 } })
    );
    assert_eq!(
        conn.sent_types(),
        vec!["save", "save.inFlight", "save.pending", "save.inFlight", "save.pending"]
    );
    session.teardown();
}
