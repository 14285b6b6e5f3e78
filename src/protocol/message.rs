//! Application messages: `["Command", {args}]` JSON arrays.

use std::collections::BTreeMap;
use std::fmt;

use super::value::Value;
use crate::error::ClientError;

/// A decoded command or event. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Command name, e.g. `Execute` or `OpenWindow`.
    pub command: String,
    /// Named arguments.
    pub args: BTreeMap<String, Value>,
}

impl Message {
    /// Message with no arguments.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: BTreeMap::new(),
        }
    }

    /// Builder: add one argument.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.args.insert(key.to_string(), value.into());
        self
    }

    /// Argument by name, `Value::Null` when absent.
    pub fn arg(&self, key: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.args.get(key).unwrap_or(&NULL)
    }

    /// JSON text of the argument object, as written to the protocol log.
    pub fn args_json(&self) -> String {
        self.args_value().to_string()
    }

    fn args_value(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.args
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Encode to the frame payload.
    pub fn to_payload(&self) -> Vec<u8> {
        serde_json::Value::Array(vec![
            serde_json::Value::String(self.command.clone()),
            self.args_value(),
        ])
        .to_string()
        .into_bytes()
    }

    /// Decode a frame payload.
    ///
    /// A missing argument object is treated as empty; anything that is not a
    /// `[string, object]` array is a decode error.
    pub fn from_payload(payload: &[u8]) -> Result<Self, ClientError> {
        let json: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|e| ClientError::Decode(format!("invalid JSON: {e}")))?;

        let serde_json::Value::Array(mut items) = json else {
            return Err(ClientError::Decode("payload is not an array".into()));
        };
        if items.is_empty() || items.len() > 2 {
            return Err(ClientError::Decode(format!(
                "expected [command, args], got {} elements",
                items.len()
            )));
        }

        let args = if items.len() == 2 {
            match items.pop() {
                Some(serde_json::Value::Object(map)) => map
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
                Some(serde_json::Value::Null) | None => BTreeMap::new(),
                Some(other) => {
                    return Err(ClientError::Decode(format!(
                        "arguments must be an object, got {other}"
                    )))
                }
            }
        } else {
            BTreeMap::new()
        };

        let command = match items.pop() {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s,
            _ => return Err(ClientError::Decode("command name missing".into())),
        };

        Ok(Self { command, args })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.command, self.args_json())
    }
}
