//! Application state and dispatch.
//!
//! [`App`] is what the runner drives: one inbound item or one terminal
//! event at a time, then a render. It owns the [`Workspace`] and the
//! [`PaneManager`] and is the only place that connects interpreter events
//! to panes.
//!
//! # Key routing
//!
//! ```text
//! key ─► overlay open? ──────────► Overlay::handle_key
//!    ─► leader pending? ─────────► leader action (d q ? : m f b s l n)
//!    ─► leader key? ─────────────► arm leader
//!    ─► move mode? ──────────────► PaneManager::handle_move_key
//!    ─► Ctrl+C ──────────────────► quit hint
//!    ─► focused pane ─► Ignored ─► global keys (cycle, close)
//! ```

// Rust guideline compliant 2026-01

use std::path::Path;

use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, MouseEvent};
use ratatui::layout::Rect;
use ratatui::Frame;

use super::input::{is_ctrl, is_press};
use super::overlay::{Overlay, OverlayResult, Prompt, PromptKind};
use super::pane::{AppCommand, Pane, PaneKind, PaneResponse};
use super::pane_manager::{Mode, PaneManager};
use super::panes::{
    DebugLogPane, DocSearchPane, EditorPane, KeysHelpPane, PalettePane, StackPane, SymbolSearchPane,
    VariablesPane,
};
use super::workspace::{CompletionTarget, Workspace};
use crate::complete::{complete, name_start, AutocompleteState, Completion};
use crate::config::Action;
use crate::editor::EditorWindow;
use crate::error::ClientError;
use crate::protocol::event::OUTPUT_TYPE_INPUT_ECHO;
use crate::protocol::{Event, Inbound, WindowSpec};
use crate::tracer::{Effect, TracerInput};

/// Shown after Ctrl+C.
pub const QUIT_HINT: &str = "C-] q to quit";

/// Top-level UI state.
#[derive(Debug)]
pub struct App {
    ws: Workspace,
    panes: PaneManager,
    leader_pending: bool,
    quit: bool,
    hint: Option<&'static str>,
}

impl App {
    /// Fresh application over `ws` for a `screen`-sized terminal.
    pub fn new(ws: Workspace, screen: Rect) -> Self {
        Self {
            ws,
            panes: PaneManager::new(screen),
            leader_pending: false,
            quit: false,
            hint: None,
        }
    }

    /// Shared state.
    pub fn ws(&self) -> &Workspace {
        &self.ws
    }

    /// Shared state, mutably.
    pub fn ws_mut(&mut self) -> &mut Workspace {
        &mut self.ws
    }

    /// Pane stack.
    pub fn panes(&self) -> &PaneManager {
        &self.panes
    }

    /// Pane stack, mutably.
    pub fn panes_mut(&mut self) -> &mut PaneManager {
        &mut self.panes
    }

    /// True once the user confirmed quitting.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// True between the leader key and its action key.
    pub fn leader_pending(&self) -> bool {
        self.leader_pending
    }

    /// Transient hint text, if any.
    pub fn hint(&self) -> Option<&str> {
        self.hint
    }

    // === Inbound ===

    /// Apply one item from the reader thread.
    ///
    /// Only [`Inbound::Disconnected`] is an error; it ends the session.
    pub fn handle_inbound(&mut self, inbound: Inbound) -> Result<(), ClientError> {
        match inbound {
            Inbound::Message(msg) => {
                self.ws.debug_log.push(format!("← {msg}"));
                match Event::decode(&msg) {
                    Ok(event) => self.handle_event(event),
                    Err(err) => {
                        log::warn!("[App] {err}");
                        self.ws.debug_log.push(err.to_string());
                    }
                }
            }
            Inbound::DecodeFailed(err) => self.ws.debug_log.push(err.to_string()),
            Inbound::Disconnected(err) => {
                log::error!("[App] Connection lost: {err}");
                return Err(err);
            }
        }
        self.drain_effects();
        Ok(())
    }

    /// Apply one decoded interpreter event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::SessionOutput { text, kind } => {
                if kind != OUTPUT_TYPE_INPUT_ECHO {
                    self.ws.transcript.push_text(&text);
                }
            }
            Event::PromptType(kind) => {
                self.ws.tracer_input(TracerInput::PromptType(kind));
                if kind > 0 {
                    self.refresh_variables_if_open();
                }
            }
            Event::OpenWindow(spec) => self.open_window(spec),
            Event::UpdateWindow(spec) => self.update_window(spec),
            Event::CloseWindow { token } => self.close_window(token),
            Event::HighlightLine { token, line } => {
                self.ws.tracer_input(TracerInput::Highlight { token, line });
            }
            Event::WindowTypeChanged { token, tracer } => self.retype_window(token, tracer),
            Event::SaveReply { token, err } => {
                if err == 0 {
                    self.ws.debug_log.push(format!("saved window {token}"));
                } else {
                    self.ws
                        .transcript
                        .push_line(format!("Save failed for window {token} (error {err})"));
                }
            }
            Event::Autocomplete { options, skip, token } => self.apply_autocomplete(&options, skip, token),
            Event::TreeList { node_id, names, .. } => {
                if node_id == 0 {
                    self.ws.apply_tree_list(names);
                }
            }
            Event::ValueTip { token, tip } => {
                self.ws.variables.apply_value_tip(token, &tip);
            }
            Event::Unrecognized { command } => log::debug!("[App] Ignoring {command}"),
        }
    }

    fn open_window(&mut self, spec: WindowSpec) {
        if spec.debugger {
            self.ws.tracer_input(TracerInput::Suspend(spec));
            self.refresh_variables_if_open();
            return;
        }
        if let Some(id) = self.panes.find_window(spec.token) {
            if let Some(pane) = self.panes.pane_mut(id) {
                pane.update_window(&spec);
            }
            self.panes.focus(id);
            return;
        }
        let mut window = EditorWindow::from_spec(&spec);
        let lines = self
            .ws
            .tracer
            .resolve_breakpoints(&spec.name, &spec.stop, window.line_count());
        window.set_breakpoints(lines);
        log::info!("[App] Editor for {} (window {})", spec.name, spec.token);
        self.panes.push(Box::new(EditorPane::owned(window)));
    }

    fn update_window(&mut self, spec: WindowSpec) {
        if self.ws.tracer.frame(spec.token).is_some() {
            self.ws.tracer_input(TracerInput::Suspend(spec));
            return;
        }
        match self.panes.find_window(spec.token) {
            Some(id) => {
                if let Some(pane) = self.panes.pane_mut(id) {
                    pane.update_window(&spec);
                }
            }
            None if spec.debugger => self.ws.tracer_input(TracerInput::Suspend(spec)),
            None => log::debug!("[App] Update for unknown window {}", spec.token),
        }
    }

    fn close_window(&mut self, token: i64) {
        if self.ws.tracer.frame(token).is_some() {
            self.ws.tracer_input(TracerInput::Closed { token });
            self.refresh_variables_if_open();
        } else if let Some(id) = self.panes.find_window(token) {
            self.panes.close(id, &mut self.ws);
        }
    }

    /// Convert between a plain editor and a tracer frame in place.
    fn retype_window(&mut self, token: i64, tracer: bool) {
        if tracer {
            let Some(id) = self.panes.find_window(token) else {
                return;
            };
            let Some(window) = self.panes.pane_mut(id).and_then(|p| p.owned_window()) else {
                return;
            };
            self.panes.close(id, &mut self.ws);
            let spec = WindowSpec {
                token,
                name: window.name.clone(),
                text: window.lines().to_vec(),
                debugger: true,
                stop: window.breakpoints().iter().copied().collect(),
                current_row: window.current_line(),
                read_only: true,
            };
            self.ws.tracer_input(TracerInput::Suspend(spec));
        } else {
            let Some(mut window) = self.ws.tracer.frame(token).map(|f| f.window.clone()) else {
                return;
            };
            self.ws.tracer_input(TracerInput::Closed { token });
            self.drain_effects();
            window.set_tracer(false);
            window.set_read_only(false);
            window.set_current_line(None);
            self.panes.push(Box::new(EditorPane::owned(window)));
        }
    }

    fn apply_autocomplete(&mut self, options: &[String], skip: usize, token: i64) {
        let Some(pending) = self.ws.take_completion(token) else {
            log::debug!("[App] Stale completion reply {token}");
            return;
        };
        let anchor = if skip > 0 {
            pending.col.saturating_sub(skip)
        } else {
            name_start(&pending.line, pending.col)
        };
        let prefix: String = pending
            .line
            .chars()
            .skip(anchor)
            .take(pending.col - anchor)
            .collect();
        let prefix_len = prefix.chars().count();

        match complete(&prefix, options) {
            Completion::None => {}
            Completion::Single(name) => self.apply_completion(pending.target, anchor, prefix_len, &name),
            Completion::Many(candidates) => self.panes.open_overlay(Overlay::Autocomplete {
                state: AutocompleteState::new(anchor, prefix_len, candidates),
                target: pending.target,
            }),
        }
    }

    fn apply_completion(&mut self, target: CompletionTarget, anchor: usize, prefix_len: usize, text: &str) {
        match target {
            CompletionTarget::Session => {
                self.panes
                    .session_mut()
                    .apply_completion(&mut self.ws, anchor, prefix_len, text);
            }
            CompletionTarget::Window(token) => {
                let Some(id) = self.panes.find_window(token) else {
                    return;
                };
                if let Some(pane) = self.panes.pane_mut(id) {
                    pane.apply_completion(&mut self.ws, anchor, prefix_len, text);
                }
            }
        }
    }

    fn refresh_variables_if_open(&mut self) {
        if self.panes.find_kind(PaneKind::Variables).is_some() {
            self.ws.refresh_variables();
        }
    }

    /// Apply pane effects queued by the tracer.
    fn drain_effects(&mut self) {
        loop {
            let effects = self.ws.take_effects();
            if effects.is_empty() {
                return;
            }
            for effect in effects {
                match effect {
                    Effect::FocusFrame(token) => self.focus_frame(token),
                    Effect::CloseFramePane(token) => {
                        if let Some(id) = self.panes.find_window(token) {
                            self.panes.close(id, &mut self.ws);
                        }
                    }
                    Effect::ReturnFocusToSession => self.panes.focus_session(),
                    Effect::RefreshFrame(_) | Effect::Send(_) | Effect::SessionLine(_) => {}
                }
            }
        }
    }

    fn focus_frame(&mut self, token: i64) {
        if let Some(id) = self.panes.find_window(token) {
            self.panes.focus(id);
        } else if self.ws.tracer.frame(token).is_some() {
            self.panes.push(Box::new(EditorPane::frame(token)));
        }
    }

    // === Terminal input ===

    /// Apply one terminal event.
    pub fn handle_terminal_event(&mut self, event: &TermEvent) {
        match event {
            TermEvent::Key(key) => self.handle_key(key),
            TermEvent::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    /// Route one key press.
    pub fn handle_key(&mut self, key: &KeyEvent) {
        if !is_press(key) {
            return;
        }
        self.hint = None;

        if let Some(overlay) = self.panes.overlay_mut() {
            match overlay.handle_key(key) {
                OverlayResult::Keep => return,
                OverlayResult::Close => {
                    self.panes.close_overlay();
                    return;
                }
                OverlayResult::CloseAndForward => {
                    self.panes.close_overlay();
                    self.deliver_to_pane(key);
                    return;
                }
                OverlayResult::Complete { target, anchor, prefix_len, text } => {
                    self.panes.close_overlay();
                    self.apply_completion(target, anchor, prefix_len, &text);
                    return;
                }
                OverlayResult::Submit { kind, value } => {
                    self.panes.close_overlay();
                    self.submit_prompt(kind, &value);
                    return;
                }
            }
        }

        if self.leader_pending {
            self.leader_pending = false;
            self.leader_action(key);
            return;
        }
        if self.ws.is(Action::Leader, key) {
            self.leader_pending = true;
            return;
        }
        if self.panes.mode() == Mode::Moving {
            self.panes.handle_move_key(key);
            return;
        }
        if key.code == KeyCode::Esc && self.panes.exit_focus_mode() {
            return;
        }
        if is_ctrl(key, 'c') {
            self.hint = Some(QUIT_HINT);
            return;
        }
        self.deliver_to_pane(key);
    }

    fn deliver_to_pane(&mut self, key: &KeyEvent) {
        let response = self.panes.focused_mut().handle_key(key, &mut self.ws);
        if response == PaneResponse::Ignored {
            self.global_key(key);
        } else {
            self.apply_response(response);
        }
        self.drain_effects();
    }

    fn apply_response(&mut self, response: PaneResponse) {
        match response {
            PaneResponse::Ignored | PaneResponse::Handled => {}
            PaneResponse::Close => {
                self.panes.pop(&mut self.ws);
            }
            PaneResponse::Command(command) => self.run_command(command),
            PaneResponse::CloseWith(command) => {
                self.panes.pop(&mut self.ws);
                self.run_command(command);
            }
        }
    }

    fn global_key(&mut self, key: &KeyEvent) {
        if self.ws.is(Action::CyclePane, key) {
            self.panes.cycle();
        } else if self.ws.is(Action::ClosePane, key) {
            self.panes.pop(&mut self.ws);
        }
    }

    fn leader_action(&mut self, key: &KeyEvent) {
        let command = if self.ws.is(Action::ToggleDebug, key) {
            AppCommand::ToggleDebug
        } else if self.ws.is(Action::Quit, key) {
            AppCommand::Quit
        } else if self.ws.is(Action::ShowKeys, key) {
            AppCommand::ShowKeys
        } else {
            match key.code {
                KeyCode::Char(':') => AppCommand::OpenPalette,
                KeyCode::Char('m') => AppCommand::EnterMoveMode,
                KeyCode::Char('f') => AppCommand::ToggleFocusMode,
                KeyCode::Char('b') => AppCommand::ToggleBreakpoint,
                KeyCode::Char('s') => AppCommand::ShowStack,
                KeyCode::Char('l') => AppCommand::ShowVariables,
                KeyCode::Char('n') => AppCommand::CycleFocus,
                _ => return,
            }
        };
        self.run_command(command);
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        if self.panes.overlay().is_some() {
            return;
        }
        let response = self.panes.handle_mouse(mouse, &mut self.ws);
        self.apply_response(response);
        self.drain_effects();
    }

    // === Commands ===

    /// Run an application command.
    pub fn run_command(&mut self, command: AppCommand) {
        log::debug!("[App] {command:?}");
        match command {
            AppCommand::ToggleDebug => self.toggle_pane(PaneKind::DebugLog, || Box::new(DebugLogPane::new())),
            AppCommand::ShowKeys => self.toggle_pane(PaneKind::KeysHelp, || Box::new(KeysHelpPane::new())),
            AppCommand::ShowStack => self.show_pane(PaneKind::Stack, || Box::new(StackPane::new())),
            AppCommand::ShowVariables => {
                self.show_pane(PaneKind::Variables, || Box::new(VariablesPane::new()));
                self.ws.refresh_variables();
            }
            AppCommand::ToggleBreakpoint => {
                if !self.panes.focused_mut().toggle_breakpoint(&mut self.ws) {
                    self.ws.debug_log.push("No editor focused for breakpoint");
                }
            }
            AppCommand::SaveSession => {
                let name = chrono::Local::now().format("session-%Y%m%d-%H%M%S.txt").to_string();
                self.panes.open_overlay(Overlay::Prompt(Prompt::save_as(name)));
            }
            AppCommand::SearchDocs => {
                if self.ws.docs.is_none() {
                    self.ws.debug_log.push("No docs database");
                } else {
                    self.show_pane(PaneKind::DocSearch, || Box::new(DocSearchPane::new()));
                }
            }
            AppCommand::ContextHelp(token) => self.context_help(&token),
            AppCommand::SearchSymbols => {
                self.show_pane(PaneKind::SymbolSearch, || Box::new(SymbolSearchPane::new()));
            }
            AppCommand::OpenPalette => self.show_pane(PaneKind::Palette, || Box::new(PalettePane::new())),
            AppCommand::ToggleFocusMode => self.panes.toggle_focus_mode(),
            AppCommand::EnterMoveMode => {
                if !self.panes.enter_move_mode() {
                    self.ws.debug_log.push("The session pane cannot be moved");
                }
            }
            AppCommand::ClearScreen => self.ws.transcript.clear_screen(),
            AppCommand::Quit => self.panes.open_overlay(Overlay::Prompt(Prompt::confirm_quit())),
            AppCommand::FocusFrame(token) => self.focus_frame(token),
            AppCommand::InsertText(text) => {
                self.panes.focus_session();
                self.panes.session_mut().insert(&text);
            }
            AppCommand::CycleFocus => self.panes.cycle(),
        }
    }

    fn context_help(&mut self, token: &str) {
        if self.ws.docs.is_none() {
            self.ws.debug_log.push("No docs database");
            return;
        }
        if let Some(id) = self.panes.find_kind(PaneKind::DocSearch) {
            self.panes.close(id, &mut self.ws);
        }
        let pane = DocSearchPane::lookup(token, &self.ws);
        if !pane.is_showing_entry() {
            self.ws.debug_log.push(format!("No docs for {token}"));
        }
        self.panes.push(Box::new(pane));
    }

    fn toggle_pane(&mut self, kind: PaneKind, make: impl FnOnce() -> Box<dyn Pane>) {
        match self.panes.find_kind(kind) {
            Some(id) => {
                self.panes.close(id, &mut self.ws);
            }
            None => {
                self.panes.push(make());
            }
        }
    }

    fn show_pane(&mut self, kind: PaneKind, make: impl FnOnce() -> Box<dyn Pane>) {
        match self.panes.find_kind(kind) {
            Some(id) => {
                self.panes.focus(id);
            }
            None => {
                self.panes.push(make());
            }
        }
    }

    fn submit_prompt(&mut self, kind: PromptKind, value: &str) {
        match kind {
            PromptKind::ConfirmQuit => {
                log::info!("[App] Quit confirmed");
                self.quit = true;
            }
            PromptKind::SaveAs => match self.ws.transcript.save(Path::new(value)) {
                Ok(()) => {
                    log::info!("[App] Saved session to {value}");
                    self.ws.transcript.push_line(format!("Saved session to {value}"));
                }
                Err(err) => {
                    log::warn!("[App] Save to {value} failed: {err}");
                    self.ws.transcript.push_line(format!("Save failed: {err}"));
                }
            },
        }
    }

    // === Rendering ===

    /// Draw the whole UI.
    pub fn render(&mut self, f: &mut Frame) {
        let status = if self.leader_pending { Some("LEADER") } else { self.hint };
        self.panes.render(f, &self.ws, status);
    }
}
