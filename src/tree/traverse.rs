use serde_json::Value;

use super::path::{Path, PathKey};

/// Visitor verdict for the node just visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Descend,
    /// Treat the node as a leaf; its children are not visited.
    Stop,
}

/// A nested structure whose children can be enumerated with their keys.
pub trait Traversable {
    /// Own children in order. Leaves return an empty list.
    fn children(&self) -> Vec<(PathKey, &Self)>;
}

impl Traversable for Value {
    fn children(&self) -> Vec<(PathKey, &Self)> {
        match self {
            Value::Object(map) => map
                .iter()
                .map(|(key, child)| (PathKey::Key(key.clone()), child))
                .collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(idx, child)| (PathKey::Index(idx), child))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Depth-first, pre-order walk over `root`.
///
/// `visitor` receives each node, the last path segment (`None` at the root)
/// and the full path. The tree must be acyclic.
pub fn traverse<T, F>(root: &T, mut visitor: F)
where
    T: Traversable + ?Sized,
    F: FnMut(&T, Option<&PathKey>, &Path) -> Flow,
{
    let mut path = Path::new();
    walk(root, &mut path, &mut visitor);
}

fn walk<T, F>(node: &T, path: &mut Path, visitor: &mut F)
where
    T: Traversable + ?Sized,
    F: FnMut(&T, Option<&PathKey>, &Path) -> Flow,
{
    if visitor(node, path.last(), path) == Flow::Stop {
        return;
    }
    for (key, child) in node.children() {
        path.push(key);
        walk(child, path, visitor);
        path.pop();
    }
}
