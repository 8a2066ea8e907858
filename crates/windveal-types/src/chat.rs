//! Conversation types exchanged with the browser client.
//!
//! A conversation is replayed to the provider on every request, so the order
//! of turns is significant and turns are never reordered.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Who authored a turn.
///
/// On the wire the assistant side is called `"bot"`. `"assistant"` and
/// `"model"` are accepted as aliases; anything else (including a missing
/// role, `null`, numbers and objects) is read as `User`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum TurnRole {
    #[default]
    User,
    Bot,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Bot => "bot",
        }
    }
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TurnRole {
    fn from(s: String) -> Self {
        TurnRole::from(s.as_str())
    }
}

impl From<&str> for TurnRole {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "bot" | "assistant" | "model" => TurnRole::Bot,
            _ => TurnRole::User,
        }
    }
}

impl<'de> Deserialize<'de> for TurnRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => TurnRole::from(s.as_str()),
            _ => TurnRole::User,
        })
    }
}

/// Turn text; `null` reads as empty and scalars keep their JSON text.
fn lenient_content<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

impl From<TurnRole> for String {
    fn from(role: TurnRole) -> Self {
        role.as_str().to_string()
    }
}

/// A single turn of a conversation.
///
/// Fields the client attaches to a turn (e.g. `feedback`) are kept in
/// `extra` and written back unchanged; providers only see role and content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(default)]
    pub role: TurnRole,
    #[serde(default, deserialize_with = "lenient_content")]
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            extra: Map::new(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Bot,
            content: content.into(),
            extra: Map::new(),
        }
    }
}

/// Ordered sequence of turns exchanged so far.
pub type Conversation = Vec<ChatTurn>;
