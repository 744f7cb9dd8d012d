use serde::{ Deserialize, Serialize };
use std::fmt;

/// Who authored a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "assistant")]
    Model,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single text part as it travels over the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

/// One message of a conversation.
///
/// Serialized as `{"role": "...", "parts": [{"text": "..."}]}`. On input the
/// legacy `content` field is accepted in place of `parts`, and several parts
/// are joined into one text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireTurn", into = "WireTurn")]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self { role, text: text.into() }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }
}

#[derive(Serialize, Deserialize)]
struct WireTurn {
    role: Role,
    #[serde(default, alias = "content")]
    parts: Vec<Part>,
}

impl From<WireTurn> for Turn {
    fn from(wire: WireTurn) -> Self {
        let text = wire.parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .concat();
        Turn { role: wire.role, text }
    }
}

impl From<Turn> for WireTurn {
    fn from(turn: Turn) -> Self {
        WireTurn {
            role: turn.role,
            parts: vec![Part { text: turn.text }],
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelayRequest {
    pub messages: Vec<Turn>,
}

/// Reply of `POST /api/chat`; `reply` is always present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub reply: String,
}
