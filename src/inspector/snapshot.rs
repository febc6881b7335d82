use serde_json::{Map, Value};

use crate::tree::{path, traverse, Flow, Node, Path};
use crate::unit::{EffectSubKey, Unit};

/// Walks `root` once and mirrors every unit value into a nested structure
/// keyed by the unit's path.
///
/// Stores contribute their current value; effects contribute `pending` and
/// `inFlight`; events contribute nothing. Descent stops at every unit.
pub fn build_snapshot(root: &Node) -> Value {
    let mut snapshot = Value::Object(Map::new());
    traverse(root, |node, _, at: &Path| match node {
        Node::Unit(Unit::Store(store)) => {
            path::set(&mut snapshot, at, store.get_state());
            Flow::Stop
        }
        Node::Unit(Unit::Effect(effect)) => {
            path::set(
                &mut snapshot,
                &at.child(EffectSubKey::Pending.as_str()),
                effect.pending().get_state(),
            );
            path::set(
                &mut snapshot,
                &at.child(EffectSubKey::InFlight.as_str()),
                effect.in_flight().get_state(),
            );
            Flow::Stop
        }
        Node::Unit(Unit::Event(_)) => Flow::Stop,
        _ => Flow::Descend,
    });
    snapshot
}
