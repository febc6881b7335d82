//! Reactive units: the observable, mutable leaves of a state tree.
//!
//! A unit is one of three closed variants. Classification happens once, when
//! the unit is placed into the tree, instead of probing values at runtime.

pub mod effect;
pub mod event;
pub mod store;
pub mod subscription;

pub use effect::{Effect, EffectSubKey};
pub use event::Event;
pub use store::Store;
pub use subscription::Subscription;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Store,
    Event,
    Effect,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Store => "store",
            UnitKind::Event => "event",
            UnitKind::Effect => "effect",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Unit {
    Store(Store),
    Event(Event),
    Effect(Effect),
}

impl Unit {
    pub fn kind(&self) -> UnitKind {
        match self {
            Unit::Store(_) => UnitKind::Store,
            Unit::Event(_) => UnitKind::Event,
            Unit::Effect(_) => UnitKind::Effect,
        }
    }

    pub fn as_store(&self) -> Option<&Store> {
        match self {
            Unit::Store(store) => Some(store),
            _ => None,
        }
    }

    /// Subscribes to the unit's change stream. For an effect this is the
    /// invocation stream.
    pub fn watch(&self, f: impl Fn(&Value) + Send + Sync + 'static) -> Subscription {
        match self {
            Unit::Store(store) => store.watch(f),
            Unit::Event(event) => event.watch(f),
            Unit::Effect(effect) => effect.watch(f),
        }
    }
}

impl From<Store> for Unit {
    fn from(store: Store) -> Self {
        Unit::Store(store)
    }
}

impl From<Event> for Unit {
    fn from(event: Event) -> Self {
        Unit::Event(event)
    }
}

impl From<Effect> for Unit {
    fn from(effect: Effect) -> Self {
        Unit::Effect(effect)
    }
}
