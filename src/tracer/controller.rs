//! Session readiness and the remote call-frame stack.
//!
//! # State
//!
//! ```text
//! session:   Ready ──Execute sent──► Busy ──SetPromptType(>0)──► Ready
//! debugger:  NoFrames ◄──────────────► Frames(stack)
//!                     push (suspend)     pop (close / Esc)
//! ```
//!
//! Every input is looked up in [`plan`], a pure `(phase, input, on_stack)`
//! table, before anything is mutated. Applying the plan mutates the mirror
//! and returns [`Effect`]s for the pane layer: which pane to focus or close
//! and which messages to send. Stepping never mutates frames; the stack only
//! moves when the interpreter reports it.

// Rust guideline compliant 2026-01

use std::collections::BTreeSet;

use super::breakpoints::BreakpointRegistry;
use super::frame::Frame;
use crate::editor::EditorWindow;
use crate::error::ClientError;
use crate::protocol::command::{self, StepKind};
use crate::protocol::{Message, WindowSpec};

/// Top-level session readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The interpreter accepts input.
    Ready,
    /// Code is running.
    Busy,
}

/// Debugger phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No suspended frames.
    NoFrames,
    /// At least one suspended frame.
    Frames,
}

/// Inputs the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum TracerInput {
    /// An `Execute` was sent.
    ExecuteSent,
    /// `SetPromptType` arrived.
    PromptType(i64),
    /// A tracer window opened or was refreshed.
    Suspend(WindowSpec),
    /// Execution moved within a frame.
    Highlight {
        /// Window token.
        token: i64,
        /// New executing line.
        line: usize,
    },
    /// The interpreter closed a window.
    Closed {
        /// Window token.
        token: i64,
    },
    /// The user asked to pop a frame (Escape in a read-only tracer).
    PopRequested {
        /// Window token.
        token: i64,
    },
    /// The user asked to step.
    Step {
        /// Window token.
        token: i64,
        /// Which step.
        kind: StepKind,
    },
    /// The user toggled a breakpoint in a frame.
    ToggleBreakpoint {
        /// Window token.
        token: i64,
        /// Line to toggle.
        line: usize,
    },
}

impl TracerInput {
    fn kind(&self) -> InputKind {
        match self {
            Self::ExecuteSent => InputKind::ExecuteSent,
            Self::PromptType(n) if *n > 0 => InputKind::PromptReady,
            Self::PromptType(_) => InputKind::PromptNone,
            Self::Suspend(spec) if spec.text.iter().all(String::is_empty) => InputKind::SuspendWithoutSource,
            Self::Suspend(_) => InputKind::Suspend,
            Self::Highlight { .. } => InputKind::Highlight,
            Self::Closed { .. } => InputKind::Closed,
            Self::PopRequested { .. } => InputKind::PopRequested,
            Self::Step { .. } => InputKind::Step,
            Self::ToggleBreakpoint { .. } => InputKind::ToggleBreakpoint,
        }
    }

    fn token(&self) -> Option<i64> {
        match self {
            Self::ExecuteSent | Self::PromptType(_) => None,
            Self::Suspend(spec) => Some(spec.token),
            Self::Highlight { token, .. }
            | Self::Closed { token }
            | Self::PopRequested { token }
            | Self::Step { token, .. }
            | Self::ToggleBreakpoint { token, .. } => Some(*token),
        }
    }
}

/// Input classification used by the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// See [`TracerInput::ExecuteSent`].
    ExecuteSent,
    /// Prompt type above zero.
    PromptReady,
    /// Prompt type zero or below.
    PromptNone,
    /// Suspend with usable source.
    Suspend,
    /// Suspend whose source is empty.
    SuspendWithoutSource,
    /// See [`TracerInput::Highlight`].
    Highlight,
    /// See [`TracerInput::Closed`].
    Closed,
    /// See [`TracerInput::PopRequested`].
    PopRequested,
    /// See [`TracerInput::Step`].
    Step,
    /// See [`TracerInput::ToggleBreakpoint`].
    ToggleBreakpoint,
}

/// What the table decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Session becomes busy.
    SetBusy,
    /// Session becomes ready.
    SetReady,
    /// Push a new frame and focus it.
    Push,
    /// Replace an existing frame's contents.
    Refresh,
    /// Move a frame's executing line.
    MoveHighlight,
    /// Remove a frame.
    Pop,
    /// Send a cut-back and remove the frame.
    RequestPop,
    /// Send a step request, change nothing.
    SendStep,
    /// Flip a breakpoint and tell the interpreter.
    Toggle,
    /// Surface as a protocol event error.
    Reject(&'static str),
    /// Nothing to do.
    Ignore,
}

/// The transition table.
pub fn plan(phase: Phase, kind: InputKind, on_stack: bool) -> Plan {
    use InputKind as K;
    use Phase as P;

    match (phase, kind, on_stack) {
        (_, K::ExecuteSent, _) => Plan::SetBusy,
        (_, K::PromptReady, _) => Plan::SetReady,
        (_, K::PromptNone, _) => Plan::Ignore,

        (_, K::SuspendWithoutSource, _) => Plan::Reject("suspended without function source"),
        (_, K::Suspend, false) => Plan::Push,
        (P::Frames, K::Suspend, true) => Plan::Refresh,

        (P::Frames, K::Highlight, true) => Plan::MoveHighlight,
        (_, K::Highlight, _) => Plan::Reject("highlight for a window that is not a frame"),

        (P::Frames, K::Closed, true) => Plan::Pop,
        (P::Frames, K::PopRequested, true) => Plan::RequestPop,
        (P::Frames, K::Step, true) => Plan::SendStep,
        (P::Frames, K::ToggleBreakpoint, true) => Plan::Toggle,

        (_, K::Closed | K::PopRequested | K::Step | K::ToggleBreakpoint, _) => Plan::Ignore,
        (P::NoFrames, K::Suspend, true) => Plan::Ignore,
    }
}

/// Side effects for the pane layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Open (if needed) and focus the pane for this frame.
    FocusFrame(i64),
    /// The frame's contents changed; scroll its pane to the cursor.
    RefreshFrame(i64),
    /// Close the pane showing this frame.
    CloseFramePane(i64),
    /// The stack emptied; focus returns to the session.
    ReturnFocusToSession,
    /// Send a message.
    Send(Message),
    /// Show a line in the session transcript.
    SessionLine(String),
}

/// Mirror of the interpreter's execution state.
#[derive(Debug)]
pub struct TracerController {
    state: SessionState,
    frames: Vec<Frame>,
    breakpoints: BreakpointRegistry,
}

impl Default for TracerController {
    fn default() -> Self {
        Self::new()
    }
}

impl TracerController {
    /// Ready session, no frames.
    pub fn new() -> Self {
        Self {
            state: SessionState::Ready,
            frames: Vec::new(),
            breakpoints: BreakpointRegistry::new(),
        }
    }

    /// Current readiness.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True when `Execute` may be sent.
    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// Debugger phase.
    pub fn phase(&self) -> Phase {
        if self.frames.is_empty() {
            Phase::NoFrames
        } else {
            Phase::Frames
        }
    }

    /// Frames in call order; the last is executing.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Currently executing frame.
    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Frame by window token.
    pub fn frame(&self, token: i64) -> Option<&Frame> {
        self.frames.iter().find(|f| f.token() == token)
    }

    /// Mutable window of a frame, for the pane that displays it.
    pub fn frame_window_mut(&mut self, token: i64) -> Option<&mut EditorWindow> {
        self.frames
            .iter_mut()
            .find(|f| f.token() == token)
            .map(|f| &mut f.window)
    }

    /// Breakpoint memory.
    pub fn breakpoints(&self) -> &BreakpointRegistry {
        &self.breakpoints
    }

    fn on_stack(&self, token: Option<i64>) -> bool {
        token.is_some_and(|t| self.frame(t).is_some())
    }

    /// Feed one input through the table.
    pub fn handle(&mut self, input: TracerInput) -> Vec<Effect> {
        let token = input.token();
        let decided = plan(self.phase(), input.kind(), self.on_stack(token));
        log::debug!("[Tracer] {:?} -> {:?}", input.kind(), decided);

        match (decided, input) {
            (Plan::SetBusy, _) => {
                self.state = SessionState::Busy;
                Vec::new()
            }
            (Plan::SetReady, _) => {
                self.state = SessionState::Ready;
                Vec::new()
            }
            (Plan::Push, TracerInput::Suspend(spec)) => self.push(&spec),
            (Plan::Refresh, TracerInput::Suspend(spec)) => self.refresh(&spec),
            (Plan::MoveHighlight, TracerInput::Highlight { token, line }) => {
                if let Some(window) = self.frame_window_mut(token) {
                    window.set_current_line(Some(line));
                    window.set_cursor(line, 0);
                }
                vec![Effect::RefreshFrame(token)]
            }
            (Plan::Pop, TracerInput::Closed { token }) => self.pop(token),
            (Plan::RequestPop, TracerInput::PopRequested { token }) => {
                let mut effects = vec![Effect::Send(command::close_window(token))];
                effects.extend(self.pop(token));
                effects
            }
            (Plan::SendStep, TracerInput::Step { token, kind }) => {
                vec![Effect::Send(command::step(kind, token))]
            }
            (Plan::Toggle, TracerInput::ToggleBreakpoint { token, line }) => {
                self.toggle_frame_breakpoint(token, line)
            }
            (Plan::Reject(reason), input) => {
                let err = ClientError::ProtocolEvent {
                    command: format!("{:?}", input.kind()),
                    detail: token.map_or_else(|| reason.to_string(), |t| format!("{reason} (window {t})")),
                };
                log::warn!("[Tracer] {err}");
                vec![Effect::SessionLine(err.to_string())]
            }
            _ => Vec::new(),
        }
    }

    fn push(&mut self, spec: &WindowSpec) -> Vec<Effect> {
        let mut window = EditorWindow::from_spec(spec);
        let lines = self
            .breakpoints
            .resolve(&spec.name, &spec.stop, window.line_count());
        window.set_breakpoints(lines);

        log::info!(
            "[Tracer] Push {} (window {}) at line {:?}, depth {}",
            spec.name,
            spec.token,
            spec.current_row,
            self.frames.len() + 1
        );
        self.frames.push(Frame::new(window));
        vec![Effect::FocusFrame(spec.token)]
    }

    fn refresh(&mut self, spec: &WindowSpec) -> Vec<Effect> {
        let Some(frame) = self.frames.iter_mut().find(|f| f.token() == spec.token) else {
            return Vec::new();
        };
        frame.window.name.clone_from(&spec.name);
        frame.function_name.clone_from(&spec.name);
        frame.window.set_text(spec.text.clone());
        frame.window.set_current_line(spec.current_row);
        if let Some(row) = spec.current_row {
            frame.window.set_cursor(row, 0);
        }
        let lines = self
            .breakpoints
            .resolve(&spec.name, &spec.stop, frame.window.line_count());
        frame.window.set_breakpoints(lines);
        frame.refresh_locals();
        vec![Effect::RefreshFrame(spec.token)]
    }

    fn pop(&mut self, token: i64) -> Vec<Effect> {
        let Some(index) = self.frames.iter().position(|f| f.token() == token) else {
            return Vec::new();
        };
        let frame = self.frames.remove(index);
        self.breakpoints
            .record(&frame.function_name, frame.window.breakpoints());
        log::info!(
            "[Tracer] Pop {} (window {}), depth {}",
            frame.function_name,
            token,
            self.frames.len()
        );

        let mut effects = vec![Effect::CloseFramePane(token)];
        match self.frames.last() {
            Some(top) => effects.push(Effect::FocusFrame(top.token())),
            None => effects.push(Effect::ReturnFocusToSession),
        }
        effects
    }

    fn toggle_frame_breakpoint(&mut self, token: i64, line: usize) -> Vec<Effect> {
        let Some(frame) = self.frames.iter_mut().find(|f| f.token() == token) else {
            return Vec::new();
        };
        frame.window.toggle_breakpoint(line);
        let lines = frame.window.breakpoints().clone();
        self.breakpoints.record(&frame.function_name, &lines);
        vec![
            Effect::Send(command::set_line_attributes(token, &lines)),
            Effect::RefreshFrame(token),
        ]
    }

    /// Toggle a breakpoint in an editor window that is not a frame.
    ///
    /// Local state changes immediately; the returned message informs the
    /// interpreter.
    pub fn toggle_editor_breakpoint(&mut self, window: &mut EditorWindow, line: usize) -> Message {
        window.toggle_breakpoint(line);
        self.remember(window)
    }

    /// Record an editor window's breakpoints and build the update message.
    pub fn remember(&mut self, window: &EditorWindow) -> Message {
        self.record_breakpoints(window);
        command::set_line_attributes(window.token, window.breakpoints())
    }

    /// Record an editor window's breakpoints without telling the interpreter.
    pub fn record_breakpoints(&mut self, window: &EditorWindow) {
        self.breakpoints.record(&window.name, window.breakpoints());
    }

    /// Breakpoints a newly opened editor for `name` should show.
    pub fn resolve_breakpoints(&mut self, name: &str, reported: &[usize], line_count: usize) -> BTreeSet<usize> {
        self.breakpoints.resolve(name, reported, line_count)
    }

    /// Make a frame's window writable for the edit sub-mode.
    pub fn begin_edit(&mut self, token: i64) -> bool {
        match self.frame_window_mut(token) {
            Some(window) => {
                window.set_read_only(false);
                true
            }
            None => false,
        }
    }

    /// Leave the edit sub-mode. Modified source is sent back for saving.
    pub fn end_edit(&mut self, token: i64) -> Vec<Effect> {
        let Some(frame) = self.frames.iter_mut().find(|f| f.token() == token) else {
            return Vec::new();
        };
        frame.window.set_read_only(true);
        if !frame.window.is_modified() {
            return Vec::new();
        }
        frame.window.mark_saved();
        frame.refresh_locals();
        self.breakpoints
            .record(&frame.function_name, frame.window.breakpoints());
        vec![Effect::Send(command::save_changes(
            token,
            frame.window.lines(),
            frame.window.breakpoints(),
        ))]
    }
}
