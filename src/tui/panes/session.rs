//! The REPL pane: transcript above, input line at the bottom.
//!
//! The transcript is read from the workspace on every render. The input
//! line is a [`tui_input::Input`] with its own history. A backtick arms
//! glyph entry: the next key is looked up in the symbol table and the glyph
//! inserted. F1 asks for documentation on the token under the cursor.

// Rust guideline compliant 2026-01

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use tui_input::{Input, InputRequest};

use super::super::input::{is_ctrl, printable};
use super::super::pane::{AppCommand, Pane, PaneKind, PaneResponse, PaneView};
use super::super::scroll::ScrollView;
use super::super::workspace::{CompletionTarget, Workspace};
use crate::complete::token_at;
use crate::config::Action;
use crate::constants::{PROMPT_BUSY, PROMPT_READY};
use crate::symbols;

/// Lines scrolled per mouse wheel notch.
const WHEEL_LINES: usize = 3;

/// Session transcript and input line.
#[derive(Debug)]
pub struct SessionPane {
    input: Input,
    history: Vec<String>,
    history_pos: Option<usize>,
    draft: String,
    scroll: ScrollView,
    glyph_armed: bool,
}

impl Default for SessionPane {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionPane {
    /// Empty input, following the transcript tail.
    pub fn new() -> Self {
        Self {
            input: Input::default(),
            history: Vec::new(),
            history_pos: None,
            draft: String::new(),
            scroll: ScrollView::following(),
            glyph_armed: false,
        }
    }

    /// Current input text.
    pub fn input(&self) -> &str {
        self.input.value()
    }

    /// Cursor column in chars.
    pub fn cursor(&self) -> usize {
        self.input.cursor()
    }

    /// True while a backtick is waiting for its glyph key.
    pub fn glyph_armed(&self) -> bool {
        self.glyph_armed
    }

    /// Insert text at the cursor.
    pub fn insert(&mut self, text: &str) {
        for ch in text.chars() {
            self.input.handle(InputRequest::InsertChar(ch));
        }
    }

    fn set_input(&mut self, text: String) {
        self.input = Input::new(text);
    }

    fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let pos = match self.history_pos {
            None => {
                self.draft = self.input.value().to_string();
                self.history.len() - 1
            }
            Some(0) => 0,
            Some(p) => p - 1,
        };
        self.history_pos = Some(pos);
        self.set_input(self.history[pos].clone());
    }

    fn history_down(&mut self) {
        let Some(pos) = self.history_pos else {
            return;
        };
        if pos + 1 < self.history.len() {
            self.history_pos = Some(pos + 1);
            self.set_input(self.history[pos + 1].clone());
        } else {
            self.history_pos = None;
            let draft = std::mem::take(&mut self.draft);
            self.set_input(draft);
        }
    }

    fn submit(&mut self, ws: &mut Workspace) {
        let code = self.input.value().to_string();
        if code.trim().is_empty() || !ws.execute(&code) {
            return;
        }
        if self.history.last() != Some(&code) {
            self.history.push(code);
        }
        self.history_pos = None;
        self.input.reset();
        self.scroll.to_bottom();
    }

    fn edit_request(key: &KeyEvent, ws: &Workspace) -> Option<InputRequest> {
        let request = if ws.is(Action::Left, key) {
            InputRequest::GoToPrevChar
        } else if ws.is(Action::Right, key) {
            InputRequest::GoToNextChar
        } else if ws.is(Action::Home, key) {
            InputRequest::GoToStart
        } else if ws.is(Action::End, key) {
            InputRequest::GoToEnd
        } else if ws.is(Action::Backspace, key) {
            InputRequest::DeletePrevChar
        } else if ws.is(Action::Delete, key) {
            InputRequest::DeleteNextChar
        } else {
            InputRequest::InsertChar(printable(key)?)
        };
        Some(request)
    }

    fn total_lines(ws: &Workspace) -> usize {
        ws.transcript.visible().len() + 1
    }
}

impl Pane for SessionPane {
    fn kind(&self) -> PaneKind {
        PaneKind::Session
    }

    fn title(&self, ws: &Workspace) -> String {
        if ws.tracer.is_ready() {
            "session".to_string()
        } else {
            "session (busy)".to_string()
        }
    }

    fn render(&mut self, ws: &Workspace, width: u16, height: u16, focused: bool) -> PaneView {
        let visible = ws.transcript.visible();
        let total = visible.len() + 1;
        let range = self.scroll.window(total, usize::from(height));
        let prompt = if ws.tracer.is_ready() { PROMPT_READY } else { PROMPT_BUSY };

        let mut lines = Vec::with_capacity(range.len());
        let mut cursor = None;
        for (row, index) in range.enumerate() {
            if index < visible.len() {
                lines.push(Line::from(visible[index].clone()));
            } else {
                lines.push(Line::from(vec![
                    Span::styled(prompt.to_string(), Style::default().add_modifier(Modifier::DIM)),
                    Span::raw(self.input.value().to_string()),
                ]));
                if focused {
                    let col = prompt.chars().count() + self.input.visual_cursor();
                    let col = u16::try_from(col).unwrap_or(u16::MAX).min(width.saturating_sub(1));
                    cursor = Some((col, u16::try_from(row).unwrap_or(0)));
                }
            }
        }
        PaneView { lines, cursor }
    }

    fn handle_key(&mut self, key: &KeyEvent, ws: &mut Workspace) -> PaneResponse {
        if self.glyph_armed {
            self.glyph_armed = false;
            if let Some(glyph) = printable(key).and_then(symbols::lookup) {
                self.insert(&glyph.to_string());
            }
            return PaneResponse::Handled;
        }

        if is_ctrl(key, 'l') {
            ws.transcript.clear_screen();
            self.scroll.to_bottom();
            return PaneResponse::Handled;
        }
        if ws.is(Action::Execute, key) {
            self.submit(ws);
            return PaneResponse::Handled;
        }
        if key.code == KeyCode::Tab {
            ws.request_completion(CompletionTarget::Session, self.input.value(), self.input.cursor());
            return PaneResponse::Handled;
        }
        if key.code == KeyCode::F(1) {
            return match token_at(self.input.value(), self.input.cursor()) {
                Some(token) => PaneResponse::Command(AppCommand::ContextHelp(token)),
                None => PaneResponse::Handled,
            };
        }
        if printable(key) == Some('`') {
            self.glyph_armed = true;
            return PaneResponse::Handled;
        }

        let total = Self::total_lines(ws);
        if ws.is(Action::Up, key) {
            self.history_up();
        } else if ws.is(Action::Down, key) {
            self.history_down();
        } else if ws.is(Action::PageUp, key) {
            self.scroll.up(self.scroll.page());
        } else if ws.is(Action::PageDown, key) {
            self.scroll.down(self.scroll.page(), total);
        } else if let Some(request) = Self::edit_request(key, ws) {
            self.input.handle(request);
        } else {
            return PaneResponse::Ignored;
        }
        PaneResponse::Handled
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, _col: u16, _row: u16, ws: &mut Workspace) -> PaneResponse {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll.up(WHEEL_LINES),
            MouseEventKind::ScrollDown => self.scroll.down(WHEEL_LINES, Self::total_lines(ws)),
            _ => return PaneResponse::Ignored,
        }
        PaneResponse::Handled
    }

    fn apply_completion(&mut self, _ws: &mut Workspace, anchor: usize, prefix_len: usize, text: &str) {
        let mut chars: Vec<char> = self.input.value().chars().collect();
        let start = anchor.min(chars.len());
        let end = (anchor + prefix_len).min(chars.len());
        chars.splice(start..end, text.chars());
        let cursor = start + text.chars().count();
        self.input = Input::new(chars.into_iter().collect()).with_cursor(cursor);
    }

    fn status(&self, _ws: &Workspace) -> Option<String> {
        self.glyph_armed.then(|| "APL symbol".to_string())
    }
}
