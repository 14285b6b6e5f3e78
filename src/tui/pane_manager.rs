//! Pane stack, focus, transient modes and overlay.
//!
//! # Architecture
//!
//! ```text
//! PaneManager
//! ├── session: SessionPane       always present, drawn full screen underneath
//! ├── slots: Vec<PaneSlot>       floating panes, bottom to top
//! ├── focus: Option<PaneId>      None = session focused
//! ├── history: Vec<PaneId>       previous focus, restored on close
//! ├── mode: Mode                 Normal | Moving | Focus
//! └── overlay: Option<Overlay>   at most one, drawn last
//! ```
//!
//! # Modes
//!
//! | from    | input        | to      |
//! |---------|--------------|---------|
//! | Normal  | EnterMove    | Moving  |
//! | Moving  | ExitMove     | Normal  |
//! | Normal  | ToggleFocus  | Focus   |
//! | Focus   | ToggleFocus  | Normal  |
//! | Focus   | ExitFocus    | Normal  |
//! | Moving  | PaneClosed   | Normal  |
//! | Focus   | PaneClosed   | Normal  |
//!
//! Everything else leaves the mode unchanged. Move mode only applies to
//! floating panes; the session cannot be moved. Esc leaves focus mode.

// Rust guideline compliant 2026-01

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use super::layout::{clamp_to, default_rect, resize, shift};
use super::overlay::Overlay;
use super::pane::{Pane, PaneId, PaneKind, PaneResponse};
use super::panes::SessionPane;
use super::workspace::Workspace;
use crate::constants::MOVE_STEP;

/// Status text while focus mode is active.
const FOCUS_HINT: &str = "focus mode (esc exits)";

/// Transient manager mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Keys go to the focused pane.
    #[default]
    Normal,
    /// Arrow keys move or resize the focused pane.
    Moving,
    /// Only the focused pane is drawn, full screen and borderless.
    Focus,
}

/// Inputs to [`next_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeInput {
    /// Start moving the focused pane.
    EnterMove,
    /// Finish moving.
    ExitMove,
    /// Toggle focus mode.
    ToggleFocus,
    /// Leave focus mode.
    ExitFocus,
    /// The focused pane went away.
    PaneClosed,
}

/// The mode transition table.
pub fn next_mode(mode: Mode, input: ModeInput) -> Mode {
    match (mode, input) {
        (Mode::Normal, ModeInput::EnterMove) => Mode::Moving,
        (Mode::Moving, ModeInput::ExitMove | ModeInput::PaneClosed) => Mode::Normal,
        (Mode::Normal, ModeInput::ToggleFocus) => Mode::Focus,
        (Mode::Focus, ModeInput::ToggleFocus | ModeInput::ExitFocus | ModeInput::PaneClosed) => {
            Mode::Normal
        }
        (mode, _) => mode,
    }
}

/// A floating pane and where it sits.
#[derive(Debug)]
pub struct PaneSlot {
    /// Identifier.
    pub id: PaneId,
    /// The pane.
    pub pane: Box<dyn Pane>,
    /// Outer rectangle, borders included.
    pub rect: Rect,
}

/// Owns every pane and decides what gets input and what gets drawn.
#[derive(Debug)]
pub struct PaneManager {
    session: SessionPane,
    slots: Vec<PaneSlot>,
    focus: Option<PaneId>,
    history: Vec<PaneId>,
    mode: Mode,
    overlay: Option<Overlay>,
    screen: Rect,
    next_id: u64,
}

impl PaneManager {
    /// Only the session pane, focused.
    pub fn new(screen: Rect) -> Self {
        Self {
            session: SessionPane::new(),
            slots: Vec::new(),
            focus: None,
            history: Vec::new(),
            mode: Mode::Normal,
            overlay: None,
            screen,
            next_id: 1,
        }
    }

    // === Accessors ===

    /// The session pane.
    pub fn session(&self) -> &SessionPane {
        &self.session
    }

    /// The session pane, mutably.
    pub fn session_mut(&mut self) -> &mut SessionPane {
        &mut self.session
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Focused floating pane, or `None` when the session has focus.
    pub fn focused_id(&self) -> Option<PaneId> {
        self.focus
    }

    /// Kind of the focused pane.
    pub fn focused_kind(&self) -> PaneKind {
        self.focus
            .and_then(|id| self.slot(id))
            .map_or(PaneKind::Session, |s| s.pane.kind())
    }

    /// The focused pane.
    pub fn focused_mut(&mut self) -> &mut dyn Pane {
        let index = self.focus.and_then(|id| self.index_of(id));
        match index {
            Some(i) => self.slots[i].pane.as_mut(),
            None => &mut self.session,
        }
    }

    /// Floating panes, bottom to top.
    pub fn slots(&self) -> &[PaneSlot] {
        &self.slots
    }

    /// Number of floating panes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when only the session is open.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Pane by id.
    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut dyn Pane> {
        let i = self.index_of(id)?;
        Some(self.slots[i].pane.as_mut())
    }

    /// Outer rect of a floating pane.
    pub fn rect(&self, id: PaneId) -> Option<Rect> {
        self.slot(id).map(|s| s.rect)
    }

    /// Topmost pane of `kind`.
    pub fn find_kind(&self, kind: PaneKind) -> Option<PaneId> {
        self.slots.iter().rev().find(|s| s.pane.kind() == kind).map(|s| s.id)
    }

    /// Pane showing interpreter window `token`.
    pub fn find_window(&self, token: i64) -> Option<PaneId> {
        self.slots
            .iter()
            .rev()
            .find(|s| s.pane.window_token() == Some(token))
            .map(|s| s.id)
    }

    fn slot(&self, id: PaneId) -> Option<&PaneSlot> {
        self.slots.iter().find(|s| s.id == id)
    }

    fn index_of(&self, id: PaneId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }

    // === Stack operations ===

    /// Open `pane` on top and focus it.
    pub fn push(&mut self, pane: Box<dyn Pane>) -> PaneId {
        let id = PaneId(self.next_id);
        self.next_id += 1;
        let kind = pane.kind();
        let stacked = self.slots.iter().filter(|s| s.pane.kind() == kind).count();
        let rect = default_rect(kind, self.screen, stacked);
        log::debug!("[Panes] Push {kind:?} as {}", id.get());
        self.slots.push(PaneSlot { id, pane, rect });
        self.set_focus(Some(id));
        id
    }

    /// Close the focused floating pane. The session cannot be closed.
    pub fn pop(&mut self, ws: &mut Workspace) -> bool {
        match self.focus {
            Some(id) => self.close(id, ws),
            None => false,
        }
    }

    /// Close pane `id`, restoring the previous focus if it had focus.
    pub fn close(&mut self, id: PaneId, ws: &mut Workspace) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let mut slot = self.slots.remove(index);
        slot.pane.on_close(ws);
        log::debug!("[Panes] Close {:?} {}", slot.pane.kind(), id.get());

        self.history.retain(|&h| h != id);
        if self.focus == Some(id) {
            self.focus = self.history.pop();
            if let Some(next) = self.focus {
                self.raise(next);
            }
            self.mode = next_mode(self.mode, ModeInput::PaneClosed);
        }
        true
    }

    /// Focus the next pane in stacking order, wrapping through the session.
    pub fn cycle(&mut self) {
        let order: Vec<Option<PaneId>> = std::iter::once(None)
            .chain(self.slots.iter().map(|s| Some(s.id)))
            .collect();
        let current = order.iter().position(|&id| id == self.focus).unwrap_or(0);
        let next = order[(current + 1) % order.len()];
        self.set_focus(next);
    }

    /// Focus pane `id`.
    pub fn focus(&mut self, id: PaneId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        self.set_focus(Some(id));
        true
    }

    /// Give focus back to the session.
    pub fn focus_session(&mut self) {
        self.set_focus(None);
    }

    fn set_focus(&mut self, target: Option<PaneId>) {
        if self.focus == target {
            return;
        }
        if let Some(previous) = self.focus {
            self.history.retain(|&h| h != previous);
            self.history.push(previous);
        }
        if let Some(id) = target {
            self.history.retain(|&h| h != id);
            self.raise(id);
        }
        self.focus = target;
        if self.mode == Mode::Moving {
            self.mode = next_mode(self.mode, ModeInput::ExitMove);
        }
    }

    fn raise(&mut self, id: PaneId) {
        if let Some(index) = self.index_of(id) {
            let slot = self.slots.remove(index);
            self.slots.push(slot);
        }
    }

    // === Modes ===

    /// Start moving the focused floating pane. False for the session.
    pub fn enter_move_mode(&mut self) -> bool {
        if self.focus.is_none() {
            return false;
        }
        self.mode = next_mode(self.mode, ModeInput::EnterMove);
        self.mode == Mode::Moving
    }

    /// Finish moving.
    pub fn exit_move_mode(&mut self) {
        self.mode = next_mode(self.mode, ModeInput::ExitMove);
    }

    /// Toggle focus mode.
    pub fn toggle_focus_mode(&mut self) {
        self.mode = next_mode(self.mode, ModeInput::ToggleFocus);
    }

    /// Leave focus mode. False if it was not active.
    pub fn exit_focus_mode(&mut self) -> bool {
        let was = self.mode;
        self.mode = next_mode(self.mode, ModeInput::ExitFocus);
        was == Mode::Focus && self.mode == Mode::Normal
    }

    /// Move-mode keys: arrows move, Shift+arrows resize, Esc/Enter finish.
    pub fn handle_move_key(&mut self, key: &KeyEvent) -> bool {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            self.exit_move_mode();
            return true;
        }
        let Some(index) = self.focus.and_then(|id| self.index_of(id)) else {
            self.exit_move_mode();
            return false;
        };
        let step = i32::from(MOVE_STEP);
        let (dx, dy) = match key.code {
            KeyCode::Left => (-step, 0),
            KeyCode::Right => (step, 0),
            KeyCode::Up => (0, -1),
            KeyCode::Down => (0, 1),
            _ => return false,
        };
        let rect = self.slots[index].rect;
        self.slots[index].rect = if key.modifiers.contains(KeyModifiers::SHIFT) {
            resize(rect, dx, dy, self.screen)
        } else {
            shift(rect, dx, dy, self.screen)
        };
        true
    }

    // === Overlay ===

    /// Open `overlay`, replacing any open one.
    pub fn open_overlay(&mut self, overlay: Overlay) {
        self.overlay = Some(overlay);
    }

    /// Close the overlay.
    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    /// The open overlay.
    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// The open overlay, mutably.
    pub fn overlay_mut(&mut self) -> Option<&mut Overlay> {
        self.overlay.as_mut()
    }

    // === Mouse ===

    /// Topmost floating pane under `(col, row)`; `None` means the session.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<PaneId> {
        if self.mode == Mode::Focus {
            return self.focus;
        }
        let point = Position::new(col, row);
        self.slots.iter().rev().find(|s| s.rect.contains(point)).map(|s| s.id)
    }

    /// Route a mouse event. A left click also focuses the pane under it.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent, ws: &mut Workspace) -> PaneResponse {
        let target = self.hit_test(mouse.column, mouse.row);
        if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            self.set_focus(target);
        }
        let area = self.content_area(target);
        let col = mouse.column.saturating_sub(area.x);
        let row = mouse.row.saturating_sub(area.y);
        match target.and_then(|id| self.index_of(id)) {
            Some(i) => self.slots[i].pane.handle_mouse(mouse, col, row, ws),
            None => self.session.handle_mouse(mouse, col, row, ws),
        }
    }

    /// Where `target`'s body is drawn, in screen coordinates.
    fn content_area(&self, target: Option<PaneId>) -> Rect {
        if self.mode == Mode::Focus {
            return self.screen;
        }
        match target.and_then(|id| self.slot(id)) {
            Some(slot) => inner(slot.rect),
            None => inner(self.screen),
        }
    }

    // === Rendering ===

    /// Draw everything. `status` is appended to the bottom-right status.
    pub fn render(&mut self, f: &mut Frame, ws: &Workspace, status: Option<&str>) {
        let screen = f.area();
        if screen != self.screen {
            self.screen = screen;
            for slot in &mut self.slots {
                slot.rect = clamp_to(slot.rect, screen);
            }
        }

        let focus = self.focus;
        let cursor = if self.mode == Mode::Focus {
            match focus.and_then(|id| self.index_of(id)) {
                Some(i) => draw_pane(f, self.slots[i].pane.as_mut(), ws, screen, true, false),
                None => draw_pane(f, &mut self.session, ws, screen, true, false),
            }
        } else {
            let mut cursor = draw_pane(f, &mut self.session, ws, screen, focus.is_none(), true);
            for slot in &mut self.slots {
                let focused = Some(slot.id) == focus;
                let c = draw_pane(f, slot.pane.as_mut(), ws, slot.rect, focused, true);
                if focused {
                    cursor = c;
                }
            }
            cursor
        };

        if let Some(overlay) = &self.overlay {
            overlay.render(f, cursor);
        }
        if !matches!(self.overlay, Some(Overlay::Prompt(_))) {
            if let Some((x, y)) = cursor {
                f.set_cursor_position((x, y));
            }
        }

        let mut parts: Vec<String> = Vec::new();
        if let Some(text) = self.focused_status(ws) {
            parts.push(text);
        }
        match self.mode {
            Mode::Moving => parts.push("MOVE".into()),
            Mode::Focus => parts.push(FOCUS_HINT.into()),
            Mode::Normal => {}
        }
        if let Some(text) = status {
            parts.push(text.to_string());
        }
        draw_status(f, screen, &parts.join(" | "));
    }

    fn focused_status(&self, ws: &Workspace) -> Option<String> {
        match self.focus.and_then(|id| self.slot(id)) {
            Some(slot) => slot.pane.status(ws),
            None => self.session.status(ws),
        }
    }
}

fn inner(rect: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(rect)
}

/// Draw one pane; returns its absolute cursor if it reported one.
fn draw_pane(
    f: &mut Frame,
    pane: &mut dyn Pane,
    ws: &Workspace,
    area: Rect,
    focused: bool,
    bordered: bool,
) -> Option<(u16, u16)> {
    f.render_widget(Clear, area);
    let body = if bordered {
        let (border_type, color) = if focused {
            (BorderType::Double, Color::Cyan)
        } else {
            (BorderType::Plain, Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(Style::default().fg(color))
            .title(format!(" {} ", pane.title(ws)));
        let body = block.inner(area);
        f.render_widget(block, area);
        body
    } else {
        area
    };
    if body.width == 0 || body.height == 0 {
        return None;
    }

    let view = pane.render(ws, body.width, body.height, focused);
    f.render_widget(Paragraph::new(view.lines), body);
    view.cursor.map(|(x, y)| {
        (
            body.x + x.min(body.width - 1),
            body.y + y.min(body.height - 1),
        )
    })
}

fn draw_status(f: &mut Frame, screen: Rect, text: &str) {
    if text.is_empty() || screen.height == 0 {
        return;
    }
    let label = format!(" {text} ");
    let width = u16::try_from(label.chars().count()).unwrap_or(u16::MAX).min(screen.width);
    let area = Rect::new(
        screen.right().saturating_sub(width + 1),
        screen.bottom() - 1,
        width,
        1,
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            label,
            Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))),
        area,
    );
}
