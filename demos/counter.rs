//! Records a small session to a tape, then jumps back to an earlier state.
//!
//! Run with: `RUST_LOG=inspector=debug cargo run --example counter`

use anyhow::Result;
use inspector::devtools::{SessionRegistry, TapeConsole};
use inspector::tree::Node;
use inspector::unit::{Effect, Event, Store};
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let dir = tempfile::tempdir()?;
    let console = TapeConsole::create(dir.path().join("counter.jsonl"))?;
    let registry = SessionRegistry::new();

    let count = Store::new(0);
    let reset = Event::new();
    let save = Effect::new(|params: Value| async move { Ok(json!({ "saved": params })) });
    let root = Node::record([
        ("count", Node::from(count.clone())),
        ("reset", Node::from(reset.clone())),
        ("save", Node::from(save.clone())),
    ]);

    let Some(session) = inspector::inspect(root, "counter", Some(&console), &registry) else {
        return Ok(());
    };

    for n in 1..=3 {
        count.set_state(n);
    }
    reset.emit(Value::Null);
    save.call(count.get_state()).await.map_err(|e| anyhow::anyhow!("save failed: {e}"))?;

    let tape = console.read()?;
    for (idx, entry) in tape.session_entries("counter").enumerate() {
        println!("{idx:>2}  {}", serde_json::to_string(entry)?);
    }

    console.jump_to("counter", 2)?;
    println!("after jump: count = {}", count.get_state());

    session.teardown();
    Ok(())
}
