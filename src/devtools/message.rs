use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DISPATCH: &str = "DISPATCH";
pub const JUMP_TO_STATE: &str = "JUMP_TO_STATE";
pub const JUMP_TO_ACTION: &str = "JUMP_TO_ACTION";

/// One recorded mutation, labeled by the dotted path of the unit that fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl Action {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

/// Message pushed from the console to the connection's subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<MessagePayload>,
    /// Serialized snapshot the console wants restored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePayload {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "actionId", default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<u64>,
}

impl ConsoleMessage {
    pub fn jump_to_state(state: &Value) -> Self {
        Self::dispatch(JUMP_TO_STATE, None, Some(state.to_string()))
    }

    pub fn jump_to_action(action_id: u64, state: &Value) -> Self {
        Self::dispatch(JUMP_TO_ACTION, Some(action_id), Some(state.to_string()))
    }

    pub fn dispatch(kind: &str, action_id: Option<u64>, state: Option<String>) -> Self {
        Self {
            kind: DISPATCH.to_string(),
            payload: Some(MessagePayload {
                kind: kind.to_string(),
                action_id,
            }),
            state,
        }
    }

    /// True for the two commands that ask for a snapshot to be restored.
    pub fn is_jump(&self) -> bool {
        self.payload
            .as_ref()
            .is_some_and(|p| p.kind == JUMP_TO_STATE || p.kind == JUMP_TO_ACTION)
    }
}
