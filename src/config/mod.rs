mod connect;

pub use connect::{ConnectConfig, Features, ImportFeature, DEFAULT_SESSION_NAME};
