//! Editor pane: one function body, editable or traced.
//!
//! The pane either owns its [`EditorWindow`] (a plain editor) or borrows a
//! frame's window from the tracer by token on every access, so a frame
//! refreshed by the interpreter is always drawn from the tracer's copy.
//!
//! # Keys
//!
//! ```text
//! tracer (read-only)   n step  i into  c continue  < back  > forward
//!                      b breakpoint  e edit  Esc pop frame
//! tracer (editing)     text keys, Esc returns to tracing (saves if changed)
//! editor               text keys, Tab complete, Ctrl+S save, Esc save + close
//! read-only editor     b breakpoint, Esc close
//! any                  F1 docs for the token under the cursor
//! ```

// Rust guideline compliant 2026-01

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::super::input::{is_ctrl, printable};
use super::super::pane::{AppCommand, Pane, PaneKind, PaneResponse, PaneView};
use super::super::scroll::ScrollView;
use super::super::workspace::{CompletionTarget, Workspace};
use crate::complete::token_at;
use crate::config::Action;
use crate::editor::EditorWindow;
use crate::protocol::command::{self, StepKind};
use crate::protocol::WindowSpec;
use crate::tracer::TracerInput;

const WHEEL_LINES: usize = 3;

#[derive(Debug)]
enum WindowSource {
    Owned(EditorWindow),
    Frame(i64),
}

/// Function editor or tracer frame view.
#[derive(Debug)]
pub struct EditorPane {
    source: WindowSource,
    scroll: ScrollView,
    follow_cursor: bool,
    editing: bool,
}

impl EditorPane {
    /// Pane owning a plain editor window.
    pub fn owned(window: EditorWindow) -> Self {
        Self::with_source(WindowSource::Owned(window))
    }

    /// Pane showing the tracer frame with window `token`.
    pub fn frame(token: i64) -> Self {
        Self::with_source(WindowSource::Frame(token))
    }

    fn with_source(source: WindowSource) -> Self {
        Self {
            source,
            scroll: ScrollView::top(),
            follow_cursor: true,
            editing: false,
        }
    }

    /// True when this pane shows a tracer frame.
    pub fn is_frame(&self) -> bool {
        matches!(self.source, WindowSource::Frame(_))
    }

    /// True while a frame is in its edit sub-mode.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    fn token(&self) -> i64 {
        match &self.source {
            WindowSource::Owned(w) => w.token,
            WindowSource::Frame(token) => *token,
        }
    }

    /// The displayed window, if it still exists.
    pub fn window<'a>(&'a self, ws: &'a Workspace) -> Option<&'a EditorWindow> {
        match &self.source {
            WindowSource::Owned(w) => Some(w),
            WindowSource::Frame(token) => ws.tracer.frame(*token).map(|f| &f.window),
        }
    }

    fn with_window<R>(&mut self, ws: &mut Workspace, f: impl FnOnce(&mut EditorWindow) -> R) -> Option<R> {
        match &mut self.source {
            WindowSource::Owned(w) => Some(f(w)),
            WindowSource::Frame(token) => ws.tracer.frame_window_mut(*token).map(f),
        }
    }

    /// Navigation shared by every mode. Returns true if `key` moved the cursor.
    fn navigate(&mut self, key: &KeyEvent, ws: &mut Workspace) -> bool {
        let page = self.scroll.page();
        let step: Option<fn(&mut EditorWindow, usize)> = if ws.is(Action::Up, key) {
            Some(|w, _| w.move_up())
        } else if ws.is(Action::Down, key) {
            Some(|w, _| w.move_down())
        } else if ws.is(Action::Left, key) {
            Some(|w, _| w.move_left())
        } else if ws.is(Action::Right, key) {
            Some(|w, _| w.move_right())
        } else if ws.is(Action::Home, key) {
            Some(|w, _| w.move_home())
        } else if ws.is(Action::End, key) {
            Some(|w, _| w.move_end())
        } else if ws.is(Action::PageUp, key) {
            Some(EditorWindow::page_up)
        } else if ws.is(Action::PageDown, key) {
            Some(EditorWindow::page_down)
        } else {
            None
        };
        match step {
            Some(step) => {
                self.with_window(ws, |w| step(w, page));
                self.follow_cursor = true;
                true
            }
            None => false,
        }
    }

    /// Text entry. Returns true if `key` was an editing key.
    fn edit(&mut self, key: &KeyEvent, ws: &mut Workspace) -> bool {
        if key.code == KeyCode::Tab {
            let token = self.token();
            if let Some((line, col)) = self.window(ws).map(|w| (w.current_text().to_string(), w.cursor().1)) {
                ws.request_completion(CompletionTarget::Window(token), &line, col);
            }
            return true;
        }
        let handled = if ws.is(Action::Backspace, key) {
            self.with_window(ws, EditorWindow::delete_back);
            true
        } else if ws.is(Action::Delete, key) {
            self.with_window(ws, EditorWindow::delete_forward);
            true
        } else if key.code == KeyCode::Enter {
            self.with_window(ws, EditorWindow::split_line);
            true
        } else if let Some(ch) = printable(key) {
            self.with_window(ws, |w| w.insert_char(ch));
            true
        } else {
            false
        };
        if handled {
            self.follow_cursor = true;
        }
        handled
    }

    fn save(&mut self, ws: &mut Workspace) {
        if let WindowSource::Owned(w) = &mut self.source {
            ws.send(command::save_changes(w.token, w.lines(), w.breakpoints()));
            w.mark_saved();
            ws.tracer.record_breakpoints(w);
        }
    }

    fn tracer_key(&mut self, key: &KeyEvent, ws: &mut Workspace, token: i64) -> PaneResponse {
        let step = match key.code {
            KeyCode::Char('n') => Some(StepKind::Over),
            KeyCode::Char('i') => Some(StepKind::Into),
            KeyCode::Char('c') => Some(StepKind::Continue),
            KeyCode::Char('<') => Some(StepKind::Backward),
            KeyCode::Char('>') => Some(StepKind::Forward),
            _ => None,
        };
        if let Some(kind) = step {
            ws.tracer_input(TracerInput::Step { token, kind });
            return PaneResponse::Handled;
        }
        match key.code {
            KeyCode::Char('b') => {
                self.toggle_breakpoint(ws);
                PaneResponse::Handled
            }
            KeyCode::Char('e') => {
                self.editing = ws.tracer.begin_edit(token);
                PaneResponse::Handled
            }
            KeyCode::Esc => {
                ws.tracer_input(TracerInput::PopRequested { token });
                PaneResponse::Handled
            }
            _ if self.navigate(key, ws) => PaneResponse::Handled,
            _ => PaneResponse::Ignored,
        }
    }

    fn context_help(&self, ws: &Workspace) -> PaneResponse {
        let token = self.window(ws).and_then(|w| {
            let (row, col) = w.cursor();
            w.lines().get(row).and_then(|line| token_at(line, col))
        });
        match token {
            Some(token) => PaneResponse::Command(AppCommand::ContextHelp(token)),
            None => PaneResponse::Handled,
        }
    }

    fn gutter_width(line_count: usize) -> usize {
        // marker + "[" + digits + "]" + space
        line_count.saturating_sub(1).to_string().len() + 4
    }
}

impl Pane for EditorPane {
    fn kind(&self) -> PaneKind {
        PaneKind::Editor
    }

    fn title(&self, ws: &Workspace) -> String {
        let Some(window) = self.window(ws) else {
            return "(closed)".to_string();
        };
        let mut title = String::new();
        if window.is_modified() {
            title.push_str("* ");
        }
        title.push_str(&window.name);
        if self.is_frame() && !self.editing {
            title.push_str(" [tracer]");
        } else if !window.is_read_only() {
            title.push_str(" [edit]");
        }
        title
    }

    fn render(&mut self, ws: &Workspace, width: u16, height: u16, focused: bool) -> PaneView {
        let window = match &self.source {
            WindowSource::Owned(w) => w,
            WindowSource::Frame(token) => match ws.tracer.frame(*token) {
                Some(frame) => &frame.window,
                None => return PaneView::default(),
            },
        };
        let total = window.line_count();
        let (row, col) = window.cursor();
        self.scroll.window(total, usize::from(height));
        if self.follow_cursor {
            self.scroll.ensure_visible(row);
        }
        let range = self.scroll.window(total, usize::from(height));
        let gutter = Self::gutter_width(total);
        let digits = gutter - 4;

        let mut lines = Vec::with_capacity(range.len());
        for index in range.clone() {
            let marker = if window.has_breakpoint(index) {
                Span::styled("●", Style::default().fg(Color::Red))
            } else {
                Span::raw(" ")
            };
            let number = Span::styled(
                format!("[{index:>digits$}] "),
                Style::default().add_modifier(Modifier::DIM),
            );
            let text_style = if window.current_line() == Some(index) {
                Style::default().bg(Color::Yellow).fg(Color::Black)
            } else {
                Style::default()
            };
            let text = Span::styled(window.lines()[index].clone(), text_style);
            lines.push(Line::from(vec![marker, number, text]));
        }

        let cursor = (focused && range.contains(&row)).then(|| {
            let x = u16::try_from(gutter + col).unwrap_or(u16::MAX).min(width.saturating_sub(1));
            let y = u16::try_from(row - range.start).unwrap_or(0);
            (x, y)
        });
        PaneView { lines, cursor }
    }

    fn handle_key(&mut self, key: &KeyEvent, ws: &mut Workspace) -> PaneResponse {
        let token = self.token();
        let Some(read_only) = self.window(ws).map(EditorWindow::is_read_only) else {
            return PaneResponse::Close;
        };
        if key.code == KeyCode::F(1) {
            return self.context_help(ws);
        }

        if self.is_frame() {
            if !self.editing {
                return self.tracer_key(key, ws, token);
            }
            if key.code == KeyCode::Esc {
                let effects = ws.tracer.end_edit(token);
                ws.route_effects(effects);
                self.editing = false;
                return PaneResponse::Handled;
            }
        } else if key.code == KeyCode::Esc {
            if let WindowSource::Owned(w) = &self.source {
                if w.is_modified() && !read_only {
                    ws.send(command::save_changes(w.token, w.lines(), w.breakpoints()));
                }
            }
            ws.send(command::close_window(token));
            return PaneResponse::Close;
        } else if read_only {
            if key.code == KeyCode::Char('b') {
                self.toggle_breakpoint(ws);
                return PaneResponse::Handled;
            }
            return if self.navigate(key, ws) {
                PaneResponse::Handled
            } else {
                PaneResponse::Ignored
            };
        }

        if is_ctrl(key, 's') {
            self.save(ws);
            return PaneResponse::Handled;
        }
        if self.navigate(key, ws) || self.edit(key, ws) {
            PaneResponse::Handled
        } else {
            PaneResponse::Ignored
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, col: u16, row: u16, ws: &mut Workspace) -> PaneResponse {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.follow_cursor = false;
                self.scroll.up(WHEEL_LINES);
            }
            MouseEventKind::ScrollDown => {
                self.follow_cursor = false;
                let total = self.window(ws).map_or(0, EditorWindow::line_count);
                self.scroll.down(WHEEL_LINES, total);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let line = self.scroll.offset() + usize::from(row);
                let gutter = Self::gutter_width(self.window(ws).map_or(1, EditorWindow::line_count));
                let text_col = usize::from(col).saturating_sub(gutter);
                self.with_window(ws, |w| w.set_cursor(line, text_col));
                self.follow_cursor = true;
            }
            _ => return PaneResponse::Ignored,
        }
        PaneResponse::Handled
    }

    fn window_token(&self) -> Option<i64> {
        Some(self.token())
    }

    fn update_window(&mut self, spec: &WindowSpec) -> bool {
        match &mut self.source {
            WindowSource::Owned(w) if w.token == spec.token => {
                w.name.clone_from(&spec.name);
                w.set_text(spec.text.clone());
                w.set_read_only(spec.read_only);
                true
            }
            _ => false,
        }
    }

    fn owned_window(&self) -> Option<EditorWindow> {
        match &self.source {
            WindowSource::Owned(w) => Some(w.clone()),
            WindowSource::Frame(_) => None,
        }
    }

    fn apply_completion(&mut self, ws: &mut Workspace, anchor: usize, prefix_len: usize, text: &str) {
        self.with_window(ws, |w| {
            let row = w.cursor().0;
            w.set_cursor(row, anchor);
            for _ in 0..prefix_len {
                if w.cursor().1 >= w.current_text().chars().count() {
                    break;
                }
                w.delete_forward();
            }
            w.insert_str(text);
        });
        self.follow_cursor = true;
    }

    fn toggle_breakpoint(&mut self, ws: &mut Workspace) -> bool {
        match &mut self.source {
            WindowSource::Owned(w) => {
                let row = w.cursor().0;
                let msg = ws.tracer.toggle_editor_breakpoint(w, row);
                ws.send(msg);
                true
            }
            WindowSource::Frame(token) => {
                let token = *token;
                let Some(line) = ws.tracer.frame(token).map(|f| f.window.cursor().0) else {
                    return false;
                };
                ws.tracer_input(TracerInput::ToggleBreakpoint { token, line });
                true
            }
        }
    }

    fn status(&self, _ws: &Workspace) -> Option<String> {
        match (self.is_frame(), self.editing) {
            (true, false) => Some("n step  i into  c cont  < > trace  b break  e edit".to_string()),
            (true, true) => Some("editing, Esc to return".to_string()),
            _ => None,
        }
    }

    fn on_close(&mut self, ws: &mut Workspace) {
        if let WindowSource::Owned(w) = &self.source {
            ws.tracer.record_breakpoints(w);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyMap;
    use crossterm::event::KeyModifiers;

    fn ws() -> Workspace {
        Workspace::new(KeyMap::defaults(), None)
    }

    fn press(pane: &mut EditorPane, ws: &mut Workspace, code: KeyCode) -> PaneResponse {
        pane.handle_key(&KeyEvent::new(code, KeyModifiers::NONE), ws)
    }

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| (*s).to_string()).collect()
    }

    fn frame_spec(token: i64) -> WindowSpec {
        WindowSpec {
            token,
            name: "Z".into(),
            text: lines(&["Z;a", "a←1", "a+1"]),
            debugger: true,
            stop: Vec::new(),
            current_row: Some(1),
            read_only: false,
        }
    }

    #[test]
    fn test_title_variants() {
        let ws = ws();
        let pane = EditorPane::owned(EditorWindow::new(3, "b", lines(&["1 2 3"])));
        assert_eq!(pane.title(&ws), "b [edit]");

        let mut ws = ws;
        ws.tracer_input(TracerInput::Suspend(frame_spec(4)));
        let frame = EditorPane::frame(4);
        assert_eq!(frame.title(&ws), "Z [tracer]");
    }

    #[test]
    fn test_typing_marks_modified_and_escape_saves() {
        let mut ws = ws();
        let mut pane = EditorPane::owned(EditorWindow::new(3, "F", lines(&["F", ""])));
        press(&mut pane, &mut ws, KeyCode::Down);
        press(&mut pane, &mut ws, KeyCode::Char('x'));
        assert_eq!(pane.title(&ws), "* F [edit]");

        assert_eq!(press(&mut pane, &mut ws, KeyCode::Esc), PaneResponse::Close);
        let sent: Vec<_> = ws.take_outbox().into_iter().map(|m| m.command).collect();
        assert_eq!(sent, vec!["SaveChanges", "CloseWindow"]);
    }

    #[test]
    fn test_f1_asks_for_help_on_token_under_cursor() {
        let mut ws = ws();
        let mut pane = EditorPane::owned(EditorWindow::new(3, "F", lines(&["r←⍴x"])));
        assert_eq!(
            press(&mut pane, &mut ws, KeyCode::F(1)),
            PaneResponse::Command(AppCommand::ContextHelp("r".into()))
        );
        press(&mut pane, &mut ws, KeyCode::Right);
        press(&mut pane, &mut ws, KeyCode::Right);
        assert_eq!(
            press(&mut pane, &mut ws, KeyCode::F(1)),
            PaneResponse::Command(AppCommand::ContextHelp("⍴".into()))
        );

        ws.tracer_input(TracerInput::Suspend(frame_spec(4)));
        ws.take_outbox();
        let mut frame = EditorPane::frame(4);
        assert!(matches!(
            press(&mut frame, &mut ws, KeyCode::F(1)),
            PaneResponse::Command(AppCommand::ContextHelp(_))
        ));
        assert!(ws.take_outbox().is_empty());
    }

    #[test]
    fn test_unmodified_escape_only_closes() {
        let mut ws = ws();
        let mut pane = EditorPane::owned(EditorWindow::new(3, "F", lines(&["F"])));
        assert_eq!(press(&mut pane, &mut ws, KeyCode::Esc), PaneResponse::Close);
        assert_eq!(ws.take_outbox(), vec![command::close_window(3)]);
    }

    #[test]
    fn test_tracer_blocks_text_and_steps() {
        let mut ws = ws();
        ws.tracer_input(TracerInput::Suspend(frame_spec(4)));
        ws.take_outbox();
        let mut pane = EditorPane::frame(4);

        press(&mut pane, &mut ws, KeyCode::Char('x'));
        assert_eq!(ws.tracer.frame(4).unwrap().window.lines()[1], "a←1");

        press(&mut pane, &mut ws, KeyCode::Char('n'));
        assert_eq!(ws.take_outbox(), vec![command::step(StepKind::Over, 4)]);
        press(&mut pane, &mut ws, KeyCode::Char('<'));
        assert_eq!(ws.take_outbox(), vec![command::step(StepKind::Backward, 4)]);
    }

    #[test]
    fn test_tracer_edit_sub_mode() {
        let mut ws = ws();
        ws.tracer_input(TracerInput::Suspend(frame_spec(4)));
        ws.take_outbox();
        let mut pane = EditorPane::frame(4);

        press(&mut pane, &mut ws, KeyCode::Char('e'));
        assert!(pane.is_editing());
        assert_eq!(pane.title(&ws), "Z [edit]");
        press(&mut pane, &mut ws, KeyCode::Char('x'));
        assert_eq!(ws.tracer.frame(4).unwrap().window.lines()[1], "xa←1");

        press(&mut pane, &mut ws, KeyCode::Esc);
        assert!(!pane.is_editing());
        assert_eq!(ws.take_outbox()[0].command, "SaveChanges");
        assert_eq!(ws.tracer.frames().len(), 1);

        // Second Escape pops the frame.
        press(&mut pane, &mut ws, KeyCode::Esc);
        assert!(ws.tracer.frames().is_empty());
        assert_eq!(ws.take_outbox(), vec![command::close_window(4)]);
    }

    #[test]
    fn test_breakpoint_toggle_in_frame() {
        let mut ws = ws();
        ws.tracer_input(TracerInput::Suspend(frame_spec(4)));
        ws.take_outbox();
        let mut pane = EditorPane::frame(4);

        press(&mut pane, &mut ws, KeyCode::Char('b'));
        assert!(ws.tracer.frame(4).unwrap().window.has_breakpoint(1));
        assert_eq!(ws.take_outbox()[0].command, "SetLineAttributes");
        press(&mut pane, &mut ws, KeyCode::Char('b'));
        assert!(!ws.tracer.frame(4).unwrap().window.has_breakpoint(1));
    }

    #[test]
    fn test_render_gutter_and_cursor() {
        let ws = ws();
        let mut window = EditorWindow::new(3, "F", lines(&["F", "x←1", "x"]));
        window.toggle_breakpoint(1);
        window.set_cursor(1, 2);
        let mut pane = EditorPane::owned(window);
        let view = pane.render(&ws, 30, 10, true);
        assert_eq!(view.lines[1].to_string(), "●[1] x←1");
        assert_eq!(view.lines[0].to_string(), " [0] F");
        assert_eq!(view.cursor, Some((7, 1)));
    }

    #[test]
    fn test_apply_completion_replaces_prefix() {
        let mut ws = ws();
        let mut window = EditorWindow::new(3, "F", lines(&["r←alp+1"]));
        window.set_cursor(0, 5);
        let mut pane = EditorPane::owned(window);
        pane.apply_completion(&mut ws, 2, 3, "alpha");
        let w = pane.window(&ws).unwrap();
        assert_eq!(w.lines()[0], "r←alpha+1");
        assert_eq!(w.cursor(), (0, 7));
    }
}
