//! In-memory console for headless hosts and tests
//!
//! Records every `init` and `send` and lets the caller push console messages
//! (jump commands) to subscribers, without any real devtools attached.
//!
//! # Example
//! ```
//! use inspector::devtools::{MemoryConsole, SessionRegistry};
//! use inspector::tree::Node;
//! use inspector::unit::Store;
//!
//! let console = MemoryConsole::new();
//! let registry = SessionRegistry::new();
//! let counter = Store::new(0);
//! let root = Node::record([("counter", Node::from(counter.clone()))]);
//!
//! let inspector = inspector::inspect(root, "app", Some(&console), &registry).unwrap();
//! counter.set_state(1);
//!
//! let conn = console.connection("app").unwrap();
//! assert_eq!(conn.sends().len(), 1);
//! inspector.teardown();
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use super::message::{Action, ConsoleMessage};
use super::{Connection, DevtoolsExtension, MessageHandler};
use crate::config::ConnectConfig;
use crate::unit::subscription::{Listeners, Subscription};

/// One recorded `send` call
#[derive(Debug, Clone, PartialEq)]
pub struct SentAction {
    pub action: Action,
    pub state: Value,
}

#[derive(Clone, Default)]
pub struct MemoryConsole {
    inner: Arc<MemoryConsoleInner>,
}

#[derive(Default)]
struct MemoryConsoleInner {
    connects: AtomicUsize,
    connections: Mutex<Vec<Arc<MemoryConnection>>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `connect` calls received so far
    pub fn connect_count(&self) -> usize {
        self.inner.connects.load(Ordering::SeqCst)
    }

    /// Most recent connection opened under `name`
    pub fn connection(&self, name: &str) -> Option<Arc<MemoryConnection>> {
        self.inner
            .connections
            .lock()
            .iter()
            .rev()
            .find(|c| c.config.name == name)
            .cloned()
    }
}

impl DevtoolsExtension for MemoryConsole {
    fn connect(&self, config: &ConnectConfig) -> Arc<dyn Connection> {
        self.inner.connects.fetch_add(1, Ordering::SeqCst);
        let connection = Arc::new(MemoryConnection {
            config: config.clone(),
            inits: Mutex::new(Vec::new()),
            sends: Mutex::new(Vec::new()),
            handlers: Listeners::new(),
        });
        self.inner.connections.lock().push(connection.clone());
        connection
    }
}

pub struct MemoryConnection {
    config: ConnectConfig,
    inits: Mutex<Vec<Value>>,
    sends: Mutex<Vec<SentAction>>,
    handlers: Arc<Listeners<ConsoleMessage>>,
}

impl MemoryConnection {
    pub fn config(&self) -> &ConnectConfig {
        &self.config
    }

    pub fn inits(&self) -> Vec<Value> {
        self.inits.lock().clone()
    }

    pub fn sends(&self) -> Vec<SentAction> {
        self.sends.lock().clone()
    }

    /// Type labels of every recorded send, in order
    pub fn sent_types(&self) -> Vec<String> {
        self.sends
            .lock()
            .iter()
            .map(|s| s.action.kind.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.inits.lock().clear();
        self.sends.lock().clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    /// Delivers `message` to every subscriber, as the console would.
    pub fn dispatch(&self, message: &ConsoleMessage) {
        self.handlers.notify(message);
    }
}

impl Connection for MemoryConnection {
    fn init(&self, state: &Value) {
        self.inits.lock().push(state.clone());
    }

    fn send(&self, action: &Action, state: &Value, _config: &ConnectConfig) {
        self.sends.lock().push(SentAction {
            action: action.clone(),
            state: state.clone(),
        });
    }

    fn subscribe(&self, handler: MessageHandler) -> Subscription {
        self.handlers.add(handler)
    }
}
