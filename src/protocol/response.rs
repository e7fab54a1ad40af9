//! Response definitions
//!
//! Represents one decoded line from the agent. The structure is opaque to
//! the client; the accessors below just read well-known fields when present.

use std::fmt;

use serde_json::Value;

/// A response from the agent
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    value: Value,
}

impl Response {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Correlation id echoed by the agent, if any
    pub fn id(&self) -> Option<&Value> {
        self.value.get("id")
    }

    /// `true` only when the agent set `"ok": true`
    pub fn is_ok(&self) -> bool {
        self.value.get("ok").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Error code (e.g. `unauthorized`, `bad_json`)
    pub fn error(&self) -> Option<&str> {
        self.value
            .get("error")
            .and_then(Value::as_str)
            .filter(|e| !e.is_empty())
    }

    pub fn message(&self) -> Option<&str> {
        self.value.get("message").and_then(Value::as_str)
    }

    /// Whether the snapshot in this response shows a widget matching `label`
    ///
    /// Case-insensitive substring match against each widget's label,
    /// description and value, descending into children.
    pub fn snapshot_has_label(&self, label: &str) -> bool {
        let needle = label.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.value
            .pointer("/snapshot/widgets")
            .and_then(Value::as_array)
            .map(|widgets| widgets.iter().any(|w| widget_has_label(w, &needle)))
            .unwrap_or(false)
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

fn widget_has_label(widget: &Value, needle: &str) -> bool {
    let matches = ["label", "description", "value"].iter().any(|field| {
        widget
            .get(*field)
            .and_then(Value::as_str)
            .map(|text| !text.trim().is_empty() && text.to_lowercase().contains(needle))
            .unwrap_or(false)
    });

    matches
        || widget
            .get("children")
            .and_then(Value::as_array)
            .map(|children| children.iter().any(|c| widget_has_label(c, needle)))
            .unwrap_or(false)
}

impl From<Value> for Response {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// Compact single-line JSON
impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
