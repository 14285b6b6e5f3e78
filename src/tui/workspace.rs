//! State shared by every pane.
//!
//! # Ownership
//!
//! ```text
//! App
//! ├── Workspace            (this module; lent to panes by reference)
//! │   ├── Transcript       session output, append-only
//! │   ├── DebugLog         protocol mirror + notices, capped
//! │   ├── TracerController readiness, frames, breakpoints
//! │   ├── VariableTable    variables pane data
//! │   ├── KeyMap           resolved bindings
//! │   └── outbox           messages waiting for the runner to send
//! └── PaneManager          panes, focus, modes, overlay
//! ```
//!
//! Panes never hold copies of logs or frames; they read them from here on
//! every render. Sending is deferred: panes push to the outbox and the
//! runner flushes it through the transport after each event.

// Rust guideline compliant 2026-01

use std::fs;
use std::path::Path;

use crossterm::event::KeyEvent;

use super::input::key_spec;
use crate::config::{Action, KeyMap};
use crate::constants::MAX_DEBUG_LOG_LINES;
use crate::docs::DocIndex;
use crate::error::ClientError;
use crate::protocol::{command, Message};
use crate::tracer::{Effect, TracerController, TracerInput, VariableTable};

/// Session output, one entry per line.
///
/// Clearing the screen only hides earlier lines; saving writes everything.
#[derive(Debug, Default)]
pub struct Transcript {
    lines: Vec<String>,
    cleared_at: usize,
}

impl Transcript {
    /// Append one line.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append text, one entry per `\n`-separated line.
    pub fn push_text(&mut self, text: &str) {
        for line in text.split('\n') {
            self.lines.push(line.trim_end_matches('\r').to_string());
        }
    }

    /// Every line ever written.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines written since the last clear.
    pub fn visible(&self) -> &[String] {
        &self.lines[self.cleared_at..]
    }

    /// Hide everything written so far.
    pub fn clear_screen(&mut self) {
        self.cleared_at = self.lines.len();
    }

    /// Write all lines to `path`.
    pub fn save(&self, path: &Path) -> Result<(), ClientError> {
        let mut text = self.lines.join("\n");
        text.push('\n');
        fs::write(path, text)?;
        Ok(())
    }
}

/// Bounded in-app log.
#[derive(Debug, Default)]
pub struct DebugLog {
    lines: Vec<String>,
}

impl DebugLog {
    /// Append a line, dropping the oldest past the cap.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
        if self.lines.len() > MAX_DEBUG_LOG_LINES {
            let excess = self.lines.len() - MAX_DEBUG_LOG_LINES;
            self.lines.drain(..excess);
        }
    }

    /// Lines, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Where a completion reply should be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionTarget {
    /// The session input line.
    Session,
    /// The editor showing this window.
    Window(i64),
}

/// An outstanding `GetAutocomplete` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCompletion {
    /// Request token.
    pub token: i64,
    /// Pane to apply the result to.
    pub target: CompletionTarget,
    /// Line text when the request was sent.
    pub line: String,
    /// Cursor column (chars) when the request was sent.
    pub col: usize,
}

/// Shared state lent to panes.
pub struct Workspace {
    /// Session output.
    pub transcript: Transcript,
    /// In-app log.
    pub debug_log: DebugLog,
    /// Debugger mirror.
    pub tracer: TracerController,
    /// Variables pane data.
    pub variables: VariableTable,
    /// Key bindings.
    pub keymap: KeyMap,
    /// Documentation index, if one was found.
    pub docs: Option<Box<dyn DocIndex>>,
    outbox: Vec<Message>,
    next_token: i64,
    completion: Option<PendingCompletion>,
    effects: Vec<Effect>,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("transcript_lines", &self.transcript.lines().len())
            .field("frames", &self.tracer.frames().len())
            .field("outbox", &self.outbox.len())
            .field("docs", &self.docs.is_some())
            .finish_non_exhaustive()
    }
}

impl Workspace {
    /// Fresh workspace.
    pub fn new(keymap: KeyMap, docs: Option<Box<dyn DocIndex>>) -> Self {
        Self {
            transcript: Transcript::default(),
            debug_log: DebugLog::default(),
            tracer: TracerController::new(),
            variables: VariableTable::new(),
            keymap,
            docs,
            outbox: Vec::new(),
            next_token: 0,
            completion: None,
            effects: Vec::new(),
        }
    }

    /// True if `key` is bound to `action`.
    pub fn is(&self, action: Action, key: &KeyEvent) -> bool {
        key_spec(key).is_some_and(|spec| self.keymap.matches(action, &spec))
    }

    /// Queue a message and mirror it into the debug log.
    pub fn send(&mut self, msg: Message) {
        self.debug_log.push(format!("→ {msg}"));
        self.outbox.push(msg);
    }

    /// Messages queued since the last call.
    pub fn take_outbox(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outbox)
    }

    /// Queued messages, oldest first.
    pub fn outbox(&self) -> &[Message] {
        &self.outbox
    }

    /// Fresh request token.
    pub fn next_token(&mut self) -> i64 {
        self.next_token += 1;
        self.next_token
    }

    /// Echo and send `code` if the interpreter is ready.
    pub fn execute(&mut self, code: &str) -> bool {
        if !self.tracer.is_ready() {
            return false;
        }
        self.transcript.push_line(format!("{}{code}", crate::constants::PROMPT_READY));
        self.send(command::execute(code));
        self.tracer_input(TracerInput::ExecuteSent);
        true
    }

    /// Feed the tracer and route its effects.
    ///
    /// Messages go to the outbox, session lines to the transcript; pane
    /// effects wait for [`Workspace::take_effects`].
    pub fn tracer_input(&mut self, input: TracerInput) {
        let effects = self.tracer.handle(input);
        self.route_effects(effects);
    }

    /// Route effects produced outside [`Workspace::tracer_input`].
    pub fn route_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Send(msg) => self.send(msg),
                Effect::SessionLine(line) => self.transcript.push_line(line),
                other => self.effects.push(other),
            }
        }
    }

    /// Pane effects queued since the last call.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Ask the interpreter for completions of the name before `col`.
    pub fn request_completion(&mut self, target: CompletionTarget, line: &str, col: usize) {
        let token = self.next_token();
        self.send(command::get_autocomplete(line, col, token));
        self.completion = Some(PendingCompletion {
            token,
            target,
            line: line.to_string(),
            col,
        });
    }

    /// Claim the pending completion if `token` matches it.
    pub fn take_completion(&mut self, token: i64) -> Option<PendingCompletion> {
        if self.completion.as_ref().is_some_and(|p| p.token == token) {
            self.completion.take()
        } else {
            None
        }
    }

    /// Re-request the variables pane contents.
    pub fn refresh_variables(&mut self) {
        let locals = self.tracer.top().map(|f| f.local_names.clone()).unwrap_or_default();
        let has_frames = !self.tracer.frames().is_empty();
        let mut token = self.next_token;
        let msgs = self.variables.refresh(&locals, has_frames, &mut token);
        self.next_token = token;
        for msg in msgs {
            self.send(msg);
        }
    }

    /// Switch the variables pane between local and all scope.
    pub fn toggle_variable_scope(&mut self) {
        let locals = self.tracer.top().map(|f| f.local_names.clone()).unwrap_or_default();
        let has_frames = !self.tracer.frames().is_empty();
        let mut token = self.next_token;
        let msgs = self.variables.toggle_scope(&locals, has_frames, &mut token);
        self.next_token = token;
        for msg in msgs {
            self.send(msg);
        }
    }

    /// Apply a root `ReplyTreeList`.
    pub fn apply_tree_list(&mut self, names: Vec<String>) {
        let mut token = self.next_token;
        let msgs = self.variables.apply_tree_list(names, &mut token);
        self.next_token = token;
        for msg in msgs {
            self.send(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracer::SessionState;

    fn workspace() -> Workspace {
        Workspace::new(KeyMap::defaults(), None)
    }

    #[test]
    fn test_execute_only_when_ready() {
        let mut ws = workspace();
        assert!(ws.execute("1+1"));
        assert_eq!(ws.tracer.state(), SessionState::Busy);
        assert!(!ws.execute("2+2"));

        let sent = ws.take_outbox();
        assert_eq!(sent, vec![command::execute("1+1")]);
        assert_eq!(ws.transcript.lines(), ["      1+1"]);
        assert!(ws.debug_log.lines()[0].starts_with("→ Execute"));
    }

    #[test]
    fn test_clear_screen_keeps_lines_for_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.txt");

        let mut ws = workspace();
        ws.transcript.push_text("a\nb");
        ws.transcript.clear_screen();
        ws.transcript.push_line("c");
        assert_eq!(ws.transcript.visible(), ["c"]);

        ws.transcript.save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn test_debug_log_is_capped() {
        let mut log = DebugLog::default();
        for i in 0..MAX_DEBUG_LOG_LINES + 5 {
            log.push(i.to_string());
        }
        assert_eq!(log.lines().len(), MAX_DEBUG_LOG_LINES);
        assert_eq!(log.lines()[0], "5");
    }

    #[test]
    fn test_completion_token_matching() {
        let mut ws = workspace();
        ws.request_completion(CompletionTarget::Session, "x←alp", 5);
        let sent = ws.take_outbox();
        assert_eq!(sent[0].command, "GetAutocomplete");

        assert!(ws.take_completion(99).is_none());
        let pending = ws.take_completion(1).unwrap();
        assert_eq!(pending.col, 5);
        assert_eq!(pending.target, CompletionTarget::Session);
        assert!(ws.take_completion(1).is_none());
    }

    #[test]
    fn test_refresh_variables_without_frames_lists_tree() {
        let mut ws = workspace();
        ws.refresh_variables();
        assert_eq!(ws.take_outbox(), vec![command::tree_list(0)]);

        ws.apply_tree_list(vec!["b".into(), "a".into()]);
        let sent = ws.take_outbox();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|m| m.command == "GetValueTip"));
    }
}
