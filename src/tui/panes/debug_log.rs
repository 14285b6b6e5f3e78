//! In-app log of protocol traffic and notices.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::super::pane::{Pane, PaneKind, PaneResponse, PaneView};
use super::super::scroll::ScrollView;
use super::super::workspace::Workspace;

const WHEEL_LINES: usize = 3;

/// Tail of [`Workspace::debug_log`].
#[derive(Debug)]
pub struct DebugLogPane {
    scroll: ScrollView,
}

impl Default for DebugLogPane {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugLogPane {
    /// Following the newest line.
    pub fn new() -> Self {
        Self {
            scroll: ScrollView::following(),
        }
    }
}

fn styled(line: &str) -> Line<'static> {
    let color = if line.starts_with('→') {
        Color::Cyan
    } else if line.starts_with('←') {
        Color::Green
    } else {
        Color::Yellow
    };
    Line::from(Span::styled(line.to_string(), Style::default().fg(color)))
}

impl Pane for DebugLogPane {
    fn kind(&self) -> PaneKind {
        PaneKind::DebugLog
    }

    fn title(&self, ws: &Workspace) -> String {
        format!("debug ({})", ws.debug_log.lines().len())
    }

    fn render(&mut self, ws: &Workspace, _width: u16, height: u16, _focused: bool) -> PaneView {
        let lines = ws.debug_log.lines();
        let range = self.scroll.window(lines.len(), usize::from(height));
        PaneView {
            lines: lines[range].iter().map(|l| styled(l)).collect(),
            cursor: None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, ws: &mut Workspace) -> PaneResponse {
        let total = ws.debug_log.lines().len();
        match key.code {
            KeyCode::Up => self.scroll.up(1),
            KeyCode::Down => self.scroll.down(1, total),
            KeyCode::PageUp => self.scroll.up(self.scroll.page()),
            KeyCode::PageDown => self.scroll.down(self.scroll.page(), total),
            KeyCode::Home => self.scroll.to_top(),
            KeyCode::End => self.scroll.to_bottom(),
            _ => return PaneResponse::Ignored,
        }
        PaneResponse::Handled
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, _col: u16, _row: u16, ws: &mut Workspace) -> PaneResponse {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll.up(WHEEL_LINES),
            MouseEventKind::ScrollDown => self.scroll.down(WHEEL_LINES, ws.debug_log.lines().len()),
            _ => return PaneResponse::Ignored,
        }
        PaneResponse::Handled
    }
}
