use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use super::subscription::{Listeners, Subscription};

/// A unit holding a current value.
///
/// Every `set_state` notifies watchers, including writes of an equal value.
/// Deduplication is left to observers.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: RwLock<Value>,
    listeners: Arc<Listeners<Value>>,
}

impl Store {
    pub fn new(initial: impl Into<Value>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(initial.into()),
                listeners: Listeners::new(),
            }),
        }
    }

    pub fn get_state(&self) -> Value {
        self.inner.state.read().clone()
    }

    pub fn set_state(&self, value: impl Into<Value>) {
        let value = value.into();
        *self.inner.state.write() = value.clone();
        self.inner.listeners.notify(&value);
    }

    /// Applies `f` to the current value under the write lock, then notifies.
    ///
    /// Concurrent updates never lose a write. `f` must not touch this store:
    /// calling `get_state`, `set_state` or `update` on it from inside `f`
    /// deadlocks. Watchers run after the lock is released and may read it.
    pub fn update(&self, f: impl FnOnce(&Value) -> Value) {
        let next = {
            let mut state = self.inner.state.write();
            let next = f(&state);
            *state = next.clone();
            next
        };
        self.inner.listeners.notify(&next);
    }

    /// Registers `f` for every subsequent write. The current value is not
    /// replayed to the new watcher.
    pub fn watch(&self, f: impl Fn(&Value) + Send + Sync + 'static) -> Subscription {
        self.inner.listeners.add(Arc::new(f))
    }

    pub fn watcher_count(&self) -> usize {
        self.inner.listeners.len()
    }

    pub fn ptr_eq(&self, other: &Store) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Store").field(&*self.inner.state.read()).finish()
    }
}
