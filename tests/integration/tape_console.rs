//! Recording a session to a JSONL tape and jumping back through it

use inspector::devtools::{SessionRegistry, TapeConsole, TapeEntry};
use serde_json::json;
use tempfile::tempdir;

use super::common::app_tree;

#[test]
fn recorded_tape_replays_into_live_stores() {
    let dir = tempdir().unwrap();
    let console = TapeConsole::create(dir.path().join("app.jsonl")).unwrap();
    let registry = SessionRegistry::new();
    let (root, units) = app_tree();
    let inspector = inspector::inspect(root, "app", Some(&console), &registry).unwrap();

    units.counter.set_state(1);
    units.counter.set_state(2);
    units.user.set_state(json!({ "name": "ada" }));

    let tape = console.read().unwrap();
    assert_eq!(tape.session_entries("app").count(), 4);
    assert!(matches!(tape.entries[0], TapeEntry::Init { .. }));

    console.jump_to("app", 1).unwrap();

    assert_eq!(units.counter.get_state(), json!(1));
    assert_eq!(units.user.get_state(), json!(null));
    assert_eq!(console.read().unwrap().entries.len(), 4);

    console.jump_to("app", 0).unwrap();
    assert_eq!(units.counter.get_state(), json!(0));

    inspector.teardown();
}
