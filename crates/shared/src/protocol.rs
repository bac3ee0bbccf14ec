use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// Path of the interrogation endpoint on the game server.
pub const GAME_WS_PATH: &str = "/ws/game";

/// Command word the server expects before a suspect name in a routing frame.
pub const ROUTE_COMMAND: &str = "interrogar";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Intro {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default)]
        characters: Value,
        #[serde(default)]
        killer: Option<String>,
    },
    Answer {
        message: String,
    },
    /// Any `type` this client does not know about.
    #[serde(other)]
    Other,
}

impl ServerEvent {
    pub fn parse(frame: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(frame).map_err(|source| ProtocolError::Malformed { source })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServerEvent::Intro { .. } => "intro",
            ServerEvent::Answer { .. } => "answer",
            ServerEvent::Other => "other",
        }
    }
}

/// Extracts character names from the roster metadata carried by `intro`.
///
/// Accepts `{"characters": {...}}`, a plain object keyed by name, or an array
/// of names / `{"name": ..}` objects. Anything else yields no names.
pub fn character_names(characters: &Value) -> Vec<String> {
    match characters {
        Value::Object(map) => match map.get("characters") {
            Some(nested @ (Value::Object(_) | Value::Array(_))) => character_names(nested),
            _ => map.keys().cloned().collect(),
        },
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(name.clone()),
                Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_owned),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Plain-text frames sent to the server. A question is always a `Route`
/// followed by a `Question`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFrame {
    Route { suspect: String },
    Question { text: String },
}

impl ClientFrame {
    pub fn into_text(self) -> String {
        match self {
            ClientFrame::Route { suspect } => format!("{ROUTE_COMMAND} {suspect}"),
            ClientFrame::Question { text } => text,
        }
    }
}
