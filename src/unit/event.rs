use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::subscription::{Listeners, Subscription};

/// A notification stream. Payloads are delivered to watchers and not kept.
#[derive(Clone)]
pub struct Event {
    listeners: Arc<Listeners<Value>>,
}

impl Event {
    pub fn new() -> Self {
        Self {
            listeners: Listeners::new(),
        }
    }

    pub fn emit(&self, payload: impl Into<Value>) {
        self.listeners.notify(&payload.into());
    }

    pub fn watch(&self, f: impl Fn(&Value) + Send + Sync + 'static) -> Subscription {
        self.listeners.add(Arc::new(f))
    }

    pub fn watcher_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("watchers", &self.watcher_count())
            .finish()
    }
}
