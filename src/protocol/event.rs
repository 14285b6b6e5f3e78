//! Typed inbound events.
//!
//! One decoder per known command name turns a generic [`Message`] into an
//! [`Event`]. Unknown commands become [`Event::Unrecognized`], which callers
//! log and ignore.
//!
//! ```text
//! Message { command, args }
//!        │
//!        ▼
//! Event::decode ──► SessionOutput / PromptType / OpenWindow / ...
//!        │
//!        └────────► Unrecognized { command }
//! ```

// Rust guideline compliant 2026-01

use super::message::Message;
use super::value::Value;
use crate::error::ClientError;

/// `AppendSessionOutput` type code for the interpreter echoing our input.
pub const OUTPUT_TYPE_INPUT_ECHO: i64 = 14;

/// Contents of an `OpenWindow` / `UpdateWindow` event.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    /// Interpreter-assigned window token.
    pub token: i64,
    /// Function or variable name.
    pub name: String,
    /// Source lines.
    pub text: Vec<String>,
    /// True when this window is a tracer frame.
    pub debugger: bool,
    /// Breakpoint line indices reported by the interpreter.
    pub stop: Vec<usize>,
    /// Currently executing line, if any.
    pub current_row: Option<usize>,
    /// Interpreter says the window cannot be edited.
    pub read_only: bool,
}

/// A decoded interpreter event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Output lines for the session transcript.
    SessionOutput {
        /// Text with one trailing newline removed.
        text: String,
        /// Interpreter output type code.
        kind: i64,
    },
    /// Prompt state change; positive means ready for input.
    PromptType(i64),
    /// A new editor or tracer window.
    OpenWindow(WindowSpec),
    /// Replacement contents for an existing window.
    UpdateWindow(WindowSpec),
    /// The interpreter closed a window (frame completed or editor closed).
    CloseWindow {
        /// Window token.
        token: i64,
    },
    /// Execution moved to another line of a tracer window.
    HighlightLine {
        /// Window token.
        token: i64,
        /// 0-based line.
        line: usize,
    },
    /// A window switched between editor and tracer.
    WindowTypeChanged {
        /// Window token.
        token: i64,
        /// True when it is now a tracer.
        tracer: bool,
    },
    /// Result of a `SaveChanges` request.
    SaveReply {
        /// Window token.
        token: i64,
        /// Non-zero on failure.
        err: i64,
    },
    /// Completion candidates for the request identified by `token`.
    Autocomplete {
        /// Candidate names.
        options: Vec<String>,
        /// Characters before the cursor the candidates replace.
        skip: usize,
        /// Request token echoed back.
        token: i64,
    },
    /// Children of a workspace tree node.
    TreeList {
        /// Node that was listed.
        node_id: i64,
        /// Child names.
        names: Vec<String>,
        /// Child name classes.
        classes: Vec<i64>,
    },
    /// A short rendering of a value.
    ValueTip {
        /// Request token echoed back.
        token: i64,
        /// Rendered lines.
        tip: Vec<String>,
    },
    /// Anything else.
    Unrecognized {
        /// Command name.
        command: String,
    },
}

impl Event {
    /// Decode a message into a typed event.
    ///
    /// Known commands with missing required fields are decode errors.
    pub fn decode(msg: &Message) -> Result<Self, ClientError> {
        let event = match msg.command.as_str() {
            "AppendSessionOutput" => {
                let result = required_str(msg, "result")?;
                Self::SessionOutput {
                    text: result.strip_suffix('\n').unwrap_or(result).to_string(),
                    kind: msg.arg("type").as_i64().unwrap_or(0),
                }
            }
            "SetPromptType" => Self::PromptType(required_int(msg, "type")?),
            "OpenWindow" => Self::OpenWindow(WindowSpec::decode(msg)?),
            "UpdateWindow" => Self::UpdateWindow(WindowSpec::decode(msg)?),
            "CloseWindow" => Self::CloseWindow {
                token: required_int(msg, "win")?,
            },
            "SetHighlightLine" => Self::HighlightLine {
                token: required_int(msg, "win")?,
                line: index(required_int(msg, "line")?),
            },
            "WindowTypeChanged" => Self::WindowTypeChanged {
                token: required_int(msg, "win")?,
                tracer: msg.arg("tracer").as_bool().unwrap_or(false),
            },
            "ReplySaveChanges" => Self::SaveReply {
                token: required_int(msg, "win")?,
                err: msg.arg("err").as_i64().unwrap_or(0),
            },
            "ReplyGetAutocomplete" => Self::Autocomplete {
                options: string_list(msg.arg("options")),
                skip: index(msg.arg("skip").as_i64().unwrap_or(0)),
                token: msg.arg("token").as_i64().unwrap_or(0),
            },
            "ReplyTreeList" => Self::TreeList {
                node_id: msg.arg("nodeId").as_i64().unwrap_or(0),
                names: string_list(msg.arg("names")),
                classes: msg
                    .arg("classes")
                    .as_list()
                    .unwrap_or_default()
                    .iter()
                    .filter_map(Value::as_i64)
                    .collect(),
            },
            "ValueTip" => Self::ValueTip {
                token: required_int(msg, "token")?,
                tip: string_list(msg.arg("tip")),
            },
            other => Self::Unrecognized {
                command: other.to_string(),
            },
        };
        Ok(event)
    }
}

impl WindowSpec {
    fn decode(msg: &Message) -> Result<Self, ClientError> {
        let text = match msg.arg("text") {
            Value::String(s) => s.split('\n').map(str::to_string).collect(),
            other => string_list(other),
        };
        Ok(Self {
            token: required_int(msg, "token")?,
            name: msg.arg("name").as_str().unwrap_or_default().to_string(),
            text,
            debugger: msg.arg("debugger").as_bool().unwrap_or(false),
            stop: msg
                .arg("stop")
                .as_list()
                .unwrap_or_default()
                .iter()
                .filter_map(Value::as_i64)
                .filter(|n| *n >= 0)
                .map(index)
                .collect(),
            current_row: msg
                .arg("currentRow")
                .as_i64()
                .filter(|n| *n >= 0)
                .map(index),
            read_only: msg.arg("readOnly").as_bool().unwrap_or(false),
        })
    }
}

fn required_str<'a>(msg: &'a Message, key: &str) -> Result<&'a str, ClientError> {
    msg.arg(key).as_str().ok_or_else(|| missing(msg, key))
}

fn required_int(msg: &Message, key: &str) -> Result<i64, ClientError> {
    msg.arg(key).as_i64().ok_or_else(|| missing(msg, key))
}

fn missing(msg: &Message, key: &str) -> ClientError {
    ClientError::Decode(format!("{}: missing or mistyped field `{key}`", msg.command))
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_list()
        .unwrap_or_default()
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

fn index(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}
