use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body in the shape the relay (and FastAPI) emits: `{ "detail": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: Value,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Value::String(detail.into()),
        }
    }

    /// Human-readable detail. Handles the plain string form and the validation list form
    /// (`[{ "msg": "..." }]`).
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            Value::String(detail) if !detail.trim().is_empty() => Some(detail.trim().to_string()),
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::trim)
                .find(|msg| !msg.is_empty())
                .map(String::from),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
