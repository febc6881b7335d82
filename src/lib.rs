pub mod config;
pub mod devtools;
pub mod error;
pub mod inspector;
pub mod tree;
pub mod unit;

pub use config::{ConnectConfig, Features, ImportFeature};
pub use devtools::{
    Action, Connection, ConsoleMessage, DevtoolsExtension, MemoryConsole, SessionRegistry,
    TapeConsole,
};
pub use error::InspectError;
pub use inspector::{
    build_snapshot, inspect, inspect_with_config, Inspector, InspectorMode, ReplayOutcome,
};
pub use tree::{traverse, Flow, Node, Path, PathKey};
pub use unit::{Effect, Event, Store, Subscription, Unit, UnitKind};
