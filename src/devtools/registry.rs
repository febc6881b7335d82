use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{Connection, DevtoolsExtension};
use crate::config::ConnectConfig;

/// Named console connections, created on first use and reused afterwards.
///
/// Entries live as long as the registry; there is no eviction.
#[derive(Default)]
pub struct SessionRegistry {
    connections: Mutex<HashMap<String, Arc<dyn Connection>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the connection stored under `config.name`, opening one through
    /// `extension` if none exists yet.
    pub fn get_or_connect(
        &self,
        extension: &dyn DevtoolsExtension,
        config: &ConnectConfig,
    ) -> Arc<dyn Connection> {
        let mut connections = self.connections.lock();
        if let Some(existing) = connections.get(&config.name) {
            tracing::debug!(name = %config.name, "Reusing console connection");
            return existing.clone();
        }

        tracing::debug!(name = %config.name, "Opening console connection");
        let connection = extension.connect(config);
        connections.insert(config.name.clone(), connection.clone());
        connection
    }

    pub fn contains(&self, name: &str) -> bool {
        self.connections.lock().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.lock().is_empty()
    }
}
