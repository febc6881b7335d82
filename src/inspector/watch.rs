use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::Value;

use super::snapshot::build_snapshot;
use super::Shared;
use crate::devtools::Action;
use crate::tree::{traverse, Flow, Node, Path};
use crate::unit::{EffectSubKey, Subscription, Unit};

/// An active listener on one unit, labeled by its dotted path.
#[derive(Debug, Clone)]
struct Registration {
    label: String,
    subscription: Subscription,
}

/// Owns every listener attached for a session.
#[derive(Default)]
pub(crate) struct WatchManager {
    registrations: Mutex<Vec<Registration>>,
}

impl WatchManager {
    /// Discovers every unit in the tree and attaches one listener per unit,
    /// eight for an effect (its invocations plus each derived unit).
    pub(crate) fn start(&self, shared: &Arc<Shared>) {
        let mut registrations = Vec::new();
        traverse(&shared.root, |node, _, path: &Path| {
            let Node::Unit(unit) = node else {
                return Flow::Descend;
            };
            registrations.push(attach(shared, unit, path.label(None)));
            if let Unit::Effect(effect) = unit {
                for key in EffectSubKey::ALL {
                    let derived = effect.derived(key);
                    registrations.push(attach(shared, &derived, path.label(Some(key.as_str()))));
                }
            }
            Flow::Stop
        });

        tracing::debug!(
            name = %shared.config.name,
            watchers = registrations.len(),
            "Attached unit watchers"
        );
        self.registrations.lock().extend(registrations);
    }

    /// Unsubscribes every listener. Safe to call repeatedly and from inside a
    /// listener callback.
    pub(crate) fn unwatch_all(&self) {
        let registrations = std::mem::take(&mut *self.registrations.lock());
        for registration in registrations {
            registration.subscription.unsubscribe();
        }
    }

    pub(crate) fn labels(&self) -> Vec<String> {
        self.registrations
            .lock()
            .iter()
            .map(|r| r.label.clone())
            .collect()
    }
}

fn attach(shared: &Arc<Shared>, unit: &Unit, label: String) -> Registration {
    // Stores remember the last value they reported so repeated writes of an
    // equal value are not forwarded.
    let last_seen = unit.as_store().map(|store| Mutex::new(store.get_state()));

    let session: Weak<Shared> = Arc::downgrade(shared);
    let callback_label = label.clone();
    let subscription = unit.watch(move |payload| {
        if let Some(shared) = session.upgrade() {
            on_fire(&shared, &callback_label, last_seen.as_ref(), payload);
        }
    });

    Registration {
        label,
        subscription,
    }
}

fn on_fire(shared: &Shared, label: &str, last_seen: Option<&Mutex<Value>>, payload: &Value) {
    let traveling = shared.mode.is_travel();

    if let Some(last_seen) = last_seen {
        let unchanged = {
            let mut last = last_seen.lock();
            let unchanged = *last == *payload;
            *last = payload.clone();
            unchanged
        };
        if unchanged {
            return;
        }
    }
    if traveling {
        return;
    }

    let snapshot = build_snapshot(&shared.root);
    *shared.snapshot.lock() = snapshot.clone();

    tracing::debug!(name = %shared.config.name, action = label, "Forwarding action");
    shared
        .connection
        .send(&Action::new(label, payload.clone()), &snapshot, &shared.config);
}
