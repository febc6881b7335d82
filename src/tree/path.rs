use std::fmt;
use std::ops::Deref;

use serde_json::{Map, Value};

/// One step into a record (by key) or a list (by index).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathKey {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Key(key) => f.write_str(key),
            PathKey::Index(idx) => write!(f, "{idx}"),
        }
    }
}

impl From<&str> for PathKey {
    fn from(key: &str) -> Self {
        PathKey::Key(key.to_string())
    }
}

impl From<String> for PathKey {
    fn from(key: String) -> Self {
        PathKey::Key(key)
    }
}

impl From<usize> for PathKey {
    fn from(idx: usize) -> Self {
        PathKey::Index(idx)
    }
}

impl PathKey {
    fn as_index(&self) -> Option<usize> {
        match self {
            PathKey::Index(idx) => Some(*idx),
            PathKey::Key(key) => key.parse().ok(),
        }
    }
}

/// Location of a node inside a tree, rendered dotted (`auth.login`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathKey>);

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a dotted path. All-digit segments become list indices.
    pub fn parse(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(|segment| match segment.parse::<usize>() {
                    Ok(idx) => PathKey::Index(idx),
                    Err(_) => PathKey::Key(segment.to_string()),
                })
                .collect(),
        )
    }

    pub fn push(&mut self, key: PathKey) {
        self.0.push(key);
    }

    pub fn pop(&mut self) -> Option<PathKey> {
        self.0.pop()
    }

    pub fn child(&self, key: impl Into<PathKey>) -> Path {
        let mut path = self.clone();
        path.push(key.into());
        path
    }

    /// Dotted label with an optional sub-key suffix, e.g. `auth.login.done`.
    pub fn label(&self, sub_key: Option<&str>) -> String {
        let mut label = self.to_string();
        if let Some(sub_key) = sub_key {
            if !label.is_empty() {
                label.push('.');
            }
            label.push_str(sub_key);
        }
        label
    }
}

impl Deref for Path {
    type Target = [PathKey];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl<K: Into<PathKey>> FromIterator<K> for Path {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Reads the value at `path`, or `None` when any step is missing.
pub fn get<'a>(root: &'a Value, path: &[PathKey]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| match node {
        Value::Object(map) => map.get(&key.to_string()),
        Value::Array(items) => key.as_index().and_then(|idx| items.get(idx)),
        _ => None,
    })
}

/// Writes `value` at `path`, creating objects (or arrays, for index steps)
/// along the way and replacing scalars that sit in the way.
pub fn set(root: &mut Value, path: &[PathKey], value: Value) {
    let Some((head, rest)) = path.split_first() else {
        *root = value;
        return;
    };

    let slot = match head {
        PathKey::Index(idx) => {
            if !root.is_array() {
                *root = Value::Array(Vec::new());
            }
            let Value::Array(items) = root else {
                return;
            };
            if items.len() <= *idx {
                items.resize(*idx + 1, Value::Null);
            }
            &mut items[*idx]
        }
        PathKey::Key(key) => {
            if !root.is_object() {
                *root = Value::Object(Map::new());
            }
            let Value::Object(map) = root else {
                return;
            };
            map.entry(key.clone()).or_insert(Value::Null)
        }
    };
    set(slot, rest, value);
}
