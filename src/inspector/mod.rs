//! Bidirectional sync between a state tree and a time-travel console.
//!
//! Forward: every unit firing rebuilds the snapshot and sends one labeled
//! action. Backward: console jump commands are written into the matching
//! stores while the session is in travel mode, so the writes are not echoed
//! back as new actions.

mod mode;
mod replay;
pub mod snapshot;
mod watch;

pub use mode::InspectorMode;
pub use replay::ReplayOutcome;
pub use snapshot::build_snapshot;

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::Value;

use crate::config::ConnectConfig;
use crate::devtools::{Connection, ConsoleMessage, DevtoolsExtension, SessionRegistry};
use crate::error::InspectError;
use crate::tree::Node;
use crate::unit::Subscription;

use mode::ModeFlag;
use watch::WatchManager;

pub(crate) struct Shared {
    root: Node,
    config: ConnectConfig,
    connection: Arc<dyn Connection>,
    mode: ModeFlag,
    snapshot: Mutex<Value>,
    watchers: WatchManager,
    console_subscription: Mutex<Option<Subscription>>,
}

impl Shared {
    /// Unsubscribes from the console and every unit. Idempotent.
    fn detach(&self) {
        let subscription = self.console_subscription.lock().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        self.watchers.unwatch_all();
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Handle to a running inspection session.
///
/// Listeners only hold the session weakly: it stops when `teardown` is
/// called or when the last clone of the handle is dropped.
#[derive(Clone)]
#[must_use = "dropping the handle stops the session"]
pub struct Inspector {
    shared: Arc<Shared>,
}

/// Starts inspecting `root` under the session `name`.
///
/// Returns `None` and wires nothing when no console `extension` is present.
pub fn inspect(
    root: Node,
    name: &str,
    extension: Option<&dyn DevtoolsExtension>,
    registry: &SessionRegistry,
) -> Option<Inspector> {
    inspect_with_config(root, ConnectConfig::named(name), extension, registry)
}

pub fn inspect_with_config(
    root: Node,
    config: ConnectConfig,
    extension: Option<&dyn DevtoolsExtension>,
    registry: &SessionRegistry,
) -> Option<Inspector> {
    let Some(extension) = extension else {
        tracing::debug!(name = %config.name, "No console present; inspection disabled");
        return None;
    };

    let baseline = build_snapshot(&root);
    let connection = registry.get_or_connect(extension, &config);
    let shared = Arc::new(Shared {
        root,
        config,
        connection,
        mode: ModeFlag::default(),
        snapshot: Mutex::new(baseline.clone()),
        watchers: WatchManager::default(),
        console_subscription: Mutex::new(None),
    });

    let session: Weak<Shared> = Arc::downgrade(&shared);
    let subscription = shared
        .connection
        .subscribe(Arc::new(move |message: &ConsoleMessage| {
            let Some(session) = session.upgrade() else {
                return;
            };
            if let Err(e) = replay::sync(&session, message) {
                tracing::warn!(name = %session.config.name, error = %e, "Dropped console replay");
            }
        }));
    *shared.console_subscription.lock() = Some(subscription);

    shared.connection.init(&baseline);
    shared.watchers.start(&shared);

    tracing::debug!(name = %shared.config.name, "Inspection started");
    Some(Inspector { shared })
}

impl Inspector {
    pub fn name(&self) -> &str {
        &self.shared.config.name
    }

    pub fn config(&self) -> &ConnectConfig {
        &self.shared.config
    }

    /// Snapshot as of the last forwarded action (or the baseline).
    pub fn snapshot(&self) -> Value {
        self.shared.snapshot.lock().clone()
    }

    pub fn mode(&self) -> InspectorMode {
        self.shared.mode.get()
    }

    /// Type labels of every attached watcher, in discovery order.
    pub fn watcher_labels(&self) -> Vec<String> {
        self.shared.watchers.labels()
    }

    /// Handles one console message directly, as if the console had pushed it.
    pub fn apply(&self, message: &ConsoleMessage) -> Result<ReplayOutcome, InspectError> {
        replay::sync(&self.shared, message)
    }

    /// Detaches from the console and every unit. Idempotent.
    pub fn teardown(&self) {
        self.shared.detach();
        tracing::debug!(name = %self.shared.config.name, "Inspection stopped");
    }
}
