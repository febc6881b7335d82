//! Contract with the external time-travel console.
//!
//! The console itself is opaque: it accepts a baseline snapshot, a stream of
//! labeled actions with full snapshots, and pushes commands back through
//! subscribed handlers.

pub mod memory;
pub mod message;
pub mod registry;
pub mod tape;

pub use memory::{MemoryConnection, MemoryConsole, SentAction};
pub use message::{Action, ConsoleMessage, MessagePayload, JUMP_TO_ACTION, JUMP_TO_STATE};
pub use registry::SessionRegistry;
pub use tape::{Tape, TapeConsole, TapeEntry};

use std::sync::Arc;

use serde_json::Value;

use crate::config::ConnectConfig;
use crate::unit::Subscription;

pub type MessageHandler = Arc<dyn Fn(&ConsoleMessage) + Send + Sync>;

/// Host-provided console capability. Its absence disables inspection.
pub trait DevtoolsExtension: Send + Sync {
    fn connect(&self, config: &ConnectConfig) -> Arc<dyn Connection>;
}

/// A live channel to the console for one named session.
pub trait Connection: Send + Sync {
    /// Seeds the console with the baseline snapshot.
    fn init(&self, state: &Value);

    /// Records one action together with the snapshot after it.
    fn send(&self, action: &Action, state: &Value, config: &ConnectConfig);

    /// Registers a handler for console-originated messages.
    fn subscribe(&self, handler: MessageHandler) -> Subscription;
}
