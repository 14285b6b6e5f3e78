//! Selection list and query line shared by the list-style panes.
//!
//! ```text
//! ┌ palette ────────────┐
//! │ > sta               │  query row (tui-input)
//! │ stack   show stack  │
//! │▌save    save session│  selected row, reversed
//! └─────────────────────┘
//! ```

// Rust guideline compliant 2026-01

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use tui_input::{Input, InputRequest};

use super::super::input::printable;
use super::super::scroll::ScrollView;

/// Selected row over a list whose length can change between frames.
#[derive(Debug, Clone)]
pub struct ListView {
    selected: usize,
    count: usize,
    scroll: ScrollView,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

impl ListView {
    /// Selection on the first row.
    pub fn new() -> Self {
        Self {
            selected: 0,
            count: 0,
            scroll: ScrollView::top(),
        }
    }

    /// Current row.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move up one row, stopping at the first.
    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move down one row, stopping at the last.
    pub fn select_down(&mut self) {
        if self.selected + 1 < self.count {
            self.selected += 1;
        }
    }

    /// Back to the first row.
    pub fn reset(&mut self) {
        self.selected = 0;
        self.scroll.to_top();
    }

    /// Record the current row count, clamping the selection.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        if count > 0 && self.selected >= count {
            self.selected = count - 1;
        }
    }

    /// Handle Up/Down/PgUp/PgDn/Home/End. Returns true if consumed.
    pub fn navigate(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Up => self.select_up(),
            KeyCode::Down => self.select_down(),
            KeyCode::PageUp => self.selected = self.selected.saturating_sub(self.scroll.page()),
            KeyCode::PageDown => {
                self.selected = (self.selected + self.scroll.page()).min(self.count.saturating_sub(1));
            }
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.count.saturating_sub(1),
            _ => return false,
        }
        true
    }

    /// Window `rows` into `height` lines, highlighting the selection.
    pub fn render(&mut self, rows: Vec<Line<'static>>, height: usize) -> Vec<Line<'static>> {
        self.set_count(rows.len());
        self.scroll.window(rows.len(), height);
        self.scroll.ensure_visible(self.selected);
        let range = self.scroll.window(rows.len(), height);
        let selected = self.selected;
        rows.into_iter()
            .enumerate()
            .skip(range.start)
            .take(range.len())
            .map(|(i, line)| {
                if i == selected {
                    line.patch_style(Style::default().add_modifier(Modifier::REVERSED))
                } else {
                    line
                }
            })
            .collect()
    }
}

/// Apply a text-editing key to a query line. Returns true if the text or
/// cursor changed.
pub fn edit_query(input: &mut Input, key: &KeyEvent) -> bool {
    let request = match key.code {
        KeyCode::Backspace => InputRequest::DeletePrevChar,
        KeyCode::Delete => InputRequest::DeleteNextChar,
        KeyCode::Left => InputRequest::GoToPrevChar,
        KeyCode::Right => InputRequest::GoToNextChar,
        KeyCode::Home => InputRequest::GoToStart,
        KeyCode::End => InputRequest::GoToEnd,
        _ => match printable(key) {
            Some(ch) => InputRequest::InsertChar(ch),
            None => return false,
        },
    };
    input.handle(request);
    true
}

/// The `> query` line and the cursor column on it.
pub fn query_line(input: &Input) -> (Line<'static>, u16) {
    const PREFIX: &str = "> ";
    let line = Line::from(vec![
        Span::styled(PREFIX, Style::default().add_modifier(Modifier::DIM)),
        Span::raw(input.value().to_string()),
    ]);
    let col = u16::try_from(PREFIX.len() + input.visual_cursor()).unwrap_or(u16::MAX);
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn rows(n: usize) -> Vec<Line<'static>> {
        (0..n).map(|i| Line::from(i.to_string())).collect()
    }

    #[test]
    fn test_selection_clamps_to_count() {
        let mut list = ListView::new();
        list.set_count(3);
        list.navigate(&key(KeyCode::End));
        assert_eq!(list.selected(), 2);
        list.select_down();
        assert_eq!(list.selected(), 2);
        list.set_count(1);
        assert_eq!(list.selected(), 0);
    }

    #[test]
    fn test_render_scrolls_to_selection() {
        let mut list = ListView::new();
        list.render(rows(20), 5);
        for _ in 0..7 {
            list.select_down();
        }
        let shown = list.render(rows(20), 5);
        assert_eq!(shown.len(), 5);
        assert_eq!(shown[4].to_string(), "7");
        assert!(shown[4].style.add_modifier.contains(Modifier::REVERSED));
        assert!(!shown[3].style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_edit_query() {
        let mut input = Input::default();
        for ch in "rhx".chars() {
            edit_query(&mut input, &key(KeyCode::Char(ch)));
        }
        edit_query(&mut input, &key(KeyCode::Backspace));
        assert_eq!(input.value(), "rh");
        assert!(!edit_query(&mut input, &key(KeyCode::Enter)));
        let (line, col) = query_line(&input);
        assert_eq!(line.to_string(), "> rh");
        assert_eq!(col, 4);
    }

    #[test]
    fn test_edit_query_moves_cursor_mid_line() {
        let mut input = Input::new("ac".to_string());
        edit_query(&mut input, &key(KeyCode::Home));
        assert_eq!(input.cursor(), 0);
        edit_query(&mut input, &key(KeyCode::Right));
        edit_query(&mut input, &key(KeyCode::Char('b')));
        assert_eq!(input.value(), "abc");
        edit_query(&mut input, &key(KeyCode::End));
        edit_query(&mut input, &key(KeyCode::Delete));
        assert_eq!(input.cursor(), 3);
        assert_eq!(input.value(), "abc");
    }
}
