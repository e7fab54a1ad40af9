//! Request definitions
//!
//! Represents commands sent to the agent.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AgentError, Result};

const ID_FIELD: &str = "id";
const TYPE_FIELD: &str = "type";

/// A request to the agent
///
/// Always holds an `id` and a `type`. Field order is preserved on the wire,
/// so `id` and `type` lead every frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Request {
    fields: Map<String, Value>,
}

impl Request {
    /// Create a request with the given id and command type
    pub fn new(id: u64, kind: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(ID_FIELD.to_string(), Value::from(id));
        fields.insert(TYPE_FIELD.to_string(), Value::String(kind.into()));
        Self { fields }
    }

    /// Add a payload field
    ///
    /// `id` and `type` are fixed at construction and are left untouched.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != ID_FIELD && key != TYPE_FIELD {
            self.fields.insert(key, value.into());
        }
        self
    }

    /// Build a request from an arbitrary JSON object
    ///
    /// The object must carry a string `type`. When it has no `id`,
    /// `fallback_id` is used.
    pub fn from_value(value: Value, fallback_id: u64) -> Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(AgentError::InvalidStep(
                "request must be a JSON object".to_string(),
            ));
        };

        match fields.get(TYPE_FIELD) {
            Some(Value::String(kind)) if !kind.trim().is_empty() => {}
            _ => {
                return Err(AgentError::InvalidStep(
                    "request requires a non-empty string \"type\"".to_string(),
                ))
            }
        }

        if !fields.contains_key(ID_FIELD) {
            // Keep id first in the encoded object
            let mut ordered = Map::with_capacity(fields.len() + 1);
            ordered.insert(ID_FIELD.to_string(), Value::from(fallback_id));
            ordered.append(&mut fields);
            fields = ordered;
        }

        Ok(Self { fields })
    }

    // =========================================================================
    // Agent command set
    // =========================================================================

    /// Session handshake, optionally authenticating with a token
    pub fn hello(id: u64, token: Option<&str>) -> Self {
        let request = Self::new(id, "hello");
        match token {
            Some(token) if !token.is_empty() => request.with("token", token),
            _ => request,
        }
    }

    pub fn ping(id: u64) -> Self {
        Self::new(id, "ping")
    }

    /// Capture the widget tree, with rendered text when `include_text` is set
    pub fn snapshot(id: u64, include_text: bool) -> Self {
        Self::new(id, "snapshot").with("include_text", include_text)
    }

    /// Type a string as key presses
    pub fn text(id: u64, text: impl Into<String>) -> Self {
        Self::new(id, "text").with("text", text.into())
    }

    /// Press a single key (e.g. `enter`, `ctrl+c`)
    pub fn key(id: u64, key: impl Into<String>) -> Self {
        Self::new(id, "key").with("key", key.into())
    }

    /// Deliver a bracketed paste
    pub fn paste(id: u64, text: impl Into<String>) -> Self {
        Self::new(id, "paste").with("text", text.into())
    }

    pub fn resize(id: u64, width: u32, height: u32) -> Self {
        Self::new(id, "resize")
            .with("width", width)
            .with("height", height)
    }

    /// Mouse event at a cell position; `button` e.g. `left`, `action` e.g. `press`
    pub fn mouse(
        id: u64,
        x: i32,
        y: i32,
        button: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::new(id, "mouse")
            .with("x", x)
            .with("y", y)
            .with("button", button.into())
            .with("action", action.into())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> Option<&Value> {
        self.fields.get(ID_FIELD)
    }

    /// Command type
    pub fn kind(&self) -> &str {
        self.fields
            .get(TYPE_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Look up a payload field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
