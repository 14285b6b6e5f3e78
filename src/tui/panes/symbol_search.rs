//! Glyph search. Enter inserts the selected glyph into the session input.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use tui_input::Input;

use super::list::{edit_query, query_line, ListView};
use super::super::pane::{AppCommand, Pane, PaneKind, PaneResponse, PaneView};
use super::super::workspace::Workspace;
use crate::symbols;

/// Query line over the glyph table.
#[derive(Debug, Default)]
pub struct SymbolSearchPane {
    query: Input,
    list: ListView,
}

impl SymbolSearchPane {
    /// Empty query, every glyph listed.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Pane for SymbolSearchPane {
    fn kind(&self) -> PaneKind {
        PaneKind::SymbolSearch
    }

    fn title(&self, _ws: &Workspace) -> String {
        "symbols".to_string()
    }

    fn render(&mut self, _ws: &Workspace, _width: u16, height: u16, focused: bool) -> PaneView {
        let (query, col) = query_line(&self.query);
        let rows = symbols::search(self.query.value())
            .into_iter()
            .map(|s| {
                Line::from(vec![
                    Span::styled(format!(" {} ", s.glyph), Style::default().fg(Color::Yellow)),
                    Span::styled(format!("`{} ", s.key), Style::default().add_modifier(Modifier::DIM)),
                    Span::raw(s.name),
                ])
            })
            .collect();
        let mut lines = vec![query];
        lines.extend(self.list.render(rows, usize::from(height.saturating_sub(1))));
        PaneView {
            lines,
            cursor: focused.then_some((col, 0)),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, _ws: &mut Workspace) -> PaneResponse {
        if key.code == KeyCode::Enter {
            return match symbols::search(self.query.value()).get(self.list.selected()) {
                Some(symbol) => PaneResponse::CloseWith(AppCommand::InsertText(symbol.glyph.to_string())),
                None => PaneResponse::Handled,
            };
        }
        if self.list.navigate(key) {
            return PaneResponse::Handled;
        }
        if edit_query(&mut self.query, key) {
            self.list.reset();
            return PaneResponse::Handled;
        }
        PaneResponse::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyMap;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_enter_inserts_glyph() {
        let mut ws = Workspace::new(KeyMap::defaults(), None);
        let mut pane = SymbolSearchPane::new();
        for ch in "reshape".chars() {
            pane.handle_key(&KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE), &mut ws);
        }
        let view = pane.render(&ws, 40, 10, true);
        assert_eq!(view.lines.len(), 2);
        assert_eq!(
            pane.handle_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &mut ws),
            PaneResponse::CloseWith(AppCommand::InsertText("⍴".into()))
        );
    }
}
