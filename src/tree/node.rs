use indexmap::IndexMap;
use serde_json::Value;

use super::path::PathKey;
use super::traverse::Traversable;
use crate::unit::{Effect, Event, Store, Unit};

/// A state tree: plain records and lists whose leaves are values or units.
///
/// The shape is fixed once built; only the values inside units change.
#[derive(Debug, Clone)]
pub enum Node {
    Record(IndexMap<String, Node>),
    List(Vec<Node>),
    Value(Value),
    Unit(Unit),
}

impl Node {
    pub fn record<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Record(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn list(items: impl IntoIterator<Item = Node>) -> Self {
        Node::List(items.into_iter().collect())
    }

    pub fn as_unit(&self) -> Option<&Unit> {
        match self {
            Node::Unit(unit) => Some(unit),
            _ => None,
        }
    }

    /// Resolves the node at `path`. Units and plain values are leaves, so a
    /// path reaching past one resolves to `None`.
    pub fn get_path(&self, path: &[PathKey]) -> Option<&Node> {
        path.iter().try_fold(self, |node, key| match (node, key) {
            (Node::Record(map), key) => map.get(&key.to_string()),
            (Node::List(items), PathKey::Index(idx)) => items.get(*idx),
            (Node::List(items), PathKey::Key(key)) => {
                key.parse::<usize>().ok().and_then(|idx| items.get(idx))
            }
            _ => None,
        })
    }
}

impl Traversable for Node {
    fn children(&self) -> Vec<(PathKey, &Self)> {
        match self {
            Node::Record(map) => map
                .iter()
                .map(|(key, child)| (PathKey::Key(key.clone()), child))
                .collect(),
            Node::List(items) => items
                .iter()
                .enumerate()
                .map(|(idx, child)| (PathKey::Index(idx), child))
                .collect(),
            Node::Value(_) | Node::Unit(_) => Vec::new(),
        }
    }
}

impl From<Unit> for Node {
    fn from(unit: Unit) -> Self {
        Node::Unit(unit)
    }
}

impl From<Store> for Node {
    fn from(store: Store) -> Self {
        Node::Unit(Unit::Store(store))
    }
}

impl From<Event> for Node {
    fn from(event: Event) -> Self {
        Node::Unit(Unit::Event(event))
    }
}

impl From<Effect> for Node {
    fn from(effect: Effect) -> Self {
        Node::Unit(Unit::Effect(effect))
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::Value(value)
    }
}
