use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::InspectError;

pub const DEFAULT_SESSION_NAME: &str = "default";

/// Configuration handed to the console when a connection is opened, and
/// echoed back with every `send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectConfig {
    /// Session name; connections are reused per name
    pub name: String,
    /// Protocol tag understood by the console
    #[serde(rename = "type")]
    pub protocol: String,
    pub features: Features,
    /// Capture call-site traces for each action
    pub trace: bool,
    #[serde(rename = "traceLimit", alias = "trace_limit")]
    pub trace_limit: u32,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SESSION_NAME.to_string(),
            protocol: "redux".to_string(),
            features: Features::default(),
            trace: true,
            trace_limit: 100,
        }
    }
}

impl ConnectConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parses a TOML override. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, InspectError> {
        toml::from_str(contents).map_err(|e| InspectError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, InspectError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

/// Console capabilities advertised for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    /// Start/pause recording of dispatched actions
    pub pause: bool,
    /// Lock/unlock dispatching actions and side effects
    pub lock: bool,
    /// Persist states on page reloading
    pub persist: bool,
    /// Export history of actions in a file
    pub export: bool,
    /// Import history of actions from a file
    pub import: ImportFeature,
    /// Jump back and forth (time travelling)
    pub jump: bool,
    /// Skip (cancel) actions
    pub skip: bool,
    /// Drag and drop actions in the history list
    pub reorder: bool,
    /// Dispatch custom actions or action creators
    pub dispatch: bool,
    /// Generate tests for the selected actions
    pub test: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            pause: true,
            lock: true,
            persist: true,
            export: true,
            import: ImportFeature::Custom,
            jump: true,
            skip: true,
            reorder: true,
            dispatch: true,
            test: true,
        }
    }
}

/// Import support: a plain switch or the console's `"custom"` importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ImportRepr", into = "ImportRepr")]
pub enum ImportFeature {
    Enabled(bool),
    Custom,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ImportRepr {
    Flag(bool),
    Mode(ImportMode),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ImportMode {
    Custom,
}

impl From<ImportRepr> for ImportFeature {
    fn from(repr: ImportRepr) -> Self {
        match repr {
            ImportRepr::Flag(enabled) => ImportFeature::Enabled(enabled),
            ImportRepr::Mode(ImportMode::Custom) => ImportFeature::Custom,
        }
    }
}

impl From<ImportFeature> for ImportRepr {
    fn from(feature: ImportFeature) -> Self {
        match feature {
            ImportFeature::Enabled(enabled) => ImportRepr::Flag(enabled),
            ImportFeature::Custom => ImportRepr::Mode(ImportMode::Custom),
        }
    }
}
