//! Builders for outbound commands.
//!
//! Each function returns a ready-to-send [`Message`]; nothing here touches
//! the socket.

use std::collections::BTreeSet;

use super::message::Message;
use super::value::Value;

/// Protocol version offered and used during the handshake.
pub const PROTOCOL_VERSION: u32 = 2;

/// Handshake line announcing supported protocols.
pub fn supported_protocols() -> String {
    format!("SupportedProtocols={PROTOCOL_VERSION}")
}

/// Handshake line selecting the protocol.
pub fn using_protocol() -> String {
    format!("UsingProtocol={PROTOCOL_VERSION}")
}

/// Identify ourselves as a RIDE-style client.
pub fn identify() -> Message {
    Message::new("Identify").with("identity", 1_i64)
}

/// Attach to the interpreter session.
pub fn connect() -> Message {
    Message::new("Connect").with("remoteId", 2_i64)
}

/// Ask the interpreter to replay its open windows.
pub fn get_window_layout() -> Message {
    Message::new("GetWindowLayout")
}

/// Run one line of code. A trailing newline is added when missing.
pub fn execute(code: &str) -> Message {
    let text = if code.ends_with('\n') {
        code.to_string()
    } else {
        format!("{code}\n")
    };
    Message::new("Execute").with("text", text).with("trace", 0_i64)
}

/// Submit edited source for a window.
pub fn save_changes(token: i64, text: &[String], stop: &BTreeSet<usize>) -> Message {
    Message::new("SaveChanges")
        .with("win", token)
        .with("text", text.to_vec())
        .with("stop", stop_list(stop))
}

/// Close an editor, or cut back a tracer frame.
pub fn close_window(token: i64) -> Message {
    Message::new("CloseWindow").with("win", token)
}

/// Replace the breakpoint list of a window.
pub fn set_line_attributes(token: i64, stop: &BTreeSet<usize>) -> Message {
    Message::new("SetLineAttributes")
        .with("win", token)
        .with("stop", stop_list(stop))
}

/// Request completions for `line` with the cursor at `pos`.
pub fn get_autocomplete(line: &str, pos: usize, token: i64) -> Message {
    Message::new("GetAutocomplete")
        .with("line", line)
        .with("pos", pos)
        .with("token", token)
}

/// List the children of a workspace tree node (`0` is the root).
pub fn tree_list(node_id: i64) -> Message {
    Message::new("TreeList").with("nodeId", node_id)
}

/// Request a short rendering of the name under `pos` in `line`.
pub fn get_value_tip(line: &str, pos: usize, token: i64) -> Message {
    Message::new("GetValueTip")
        .with("win", 0_i64)
        .with("line", line)
        .with("pos", pos)
        .with("token", token)
        .with("maxWidth", 60_i64)
        .with("maxHeight", 1_i64)
}

/// Ask the interpreter to open an editor on `name`.
pub fn edit(name: &str) -> Message {
    Message::new("Edit")
        .with("win", 0_i64)
        .with("text", name)
        .with("pos", 0_i64)
        .with("unsaved", Value::Map(Default::default()))
}

/// Stepping requests available from a tracer window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Execute the current line.
    Over,
    /// Step into a call on the current line.
    Into,
    /// Resume until the next breakpoint or completion.
    Continue,
    /// Move the execution point back one line.
    Backward,
    /// Move the execution point forward one line without running it.
    Forward,
}

impl StepKind {
    /// Wire command name.
    pub fn command(self) -> &'static str {
        match self {
            Self::Over => "RunCurrentLine",
            Self::Into => "StepInto",
            Self::Continue => "Continue",
            Self::Backward => "TraceBackward",
            Self::Forward => "TraceForward",
        }
    }
}

/// Stepping request for a tracer window.
pub fn step(kind: StepKind, token: i64) -> Message {
    Message::new(kind.command()).with("win", token)
}

fn stop_list(stop: &BTreeSet<usize>) -> Vec<Value> {
    stop.iter().map(|&line| Value::from(line)).collect()
}
