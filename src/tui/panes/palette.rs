//! Command palette: filter by name or description, Enter runs.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use tui_input::Input;

use super::list::{edit_query, query_line, ListView};
use super::super::pane::{AppCommand, Pane, PaneKind, PaneResponse, PaneView};
use super::super::workspace::Workspace;

/// One palette entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Short name typed to find it.
    pub name: &'static str,
    /// Description.
    pub help: &'static str,
    /// What it does.
    pub command: AppCommand,
}

/// The full command list in display order.
pub fn entries() -> Vec<PaletteEntry> {
    let entry = |name, help, command| PaletteEntry { name, help, command };
    vec![
        entry("debug", "toggle debug log", AppCommand::ToggleDebug),
        entry("keys", "show key mappings", AppCommand::ShowKeys),
        entry("stack", "show call stack", AppCommand::ShowStack),
        entry("variables", "show variables", AppCommand::ShowVariables),
        entry("breakpoint", "toggle breakpoint at cursor", AppCommand::ToggleBreakpoint),
        entry("save", "save session to file", AppCommand::SaveSession),
        entry("docs", "search documentation", AppCommand::SearchDocs),
        entry("symbols", "search APL symbols", AppCommand::SearchSymbols),
        entry("focus", "toggle focus mode", AppCommand::ToggleFocusMode),
        entry("move", "move or resize pane", AppCommand::EnterMoveMode),
        entry("clear", "clear session screen", AppCommand::ClearScreen),
        entry("quit", "quit", AppCommand::Quit),
    ]
}

/// Entries whose name or help contains `query`, case-insensitively.
pub fn filter(query: &str) -> Vec<PaletteEntry> {
    let query = query.trim().to_lowercase();
    entries()
        .into_iter()
        .filter(|e| query.is_empty() || e.name.contains(&query) || e.help.to_lowercase().contains(&query))
        .collect()
}

/// Query line over the filtered command list.
#[derive(Debug, Default)]
pub struct PalettePane {
    query: Input,
    list: ListView,
}

impl PalettePane {
    /// Empty query, every command listed.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Pane for PalettePane {
    fn kind(&self) -> PaneKind {
        PaneKind::Palette
    }

    fn title(&self, _ws: &Workspace) -> String {
        "commands".to_string()
    }

    fn render(&mut self, _ws: &Workspace, _width: u16, height: u16, focused: bool) -> PaneView {
        let (query, col) = query_line(&self.query);
        let rows = filter(self.query.value())
            .into_iter()
            .map(|e| {
                Line::from(vec![
                    Span::raw(format!("{:<12}", e.name)),
                    Span::styled(e.help, Style::default().add_modifier(Modifier::DIM)),
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
            let matches = filter(self.query.value());
            return match matches.into_iter().nth(self.list.selected()) {
                Some(entry) => PaneResponse::CloseWith(entry.command),
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

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_filter_matches_name_and_help() {
        let names: Vec<_> = filter("sta").iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["stack"]);
        assert!(filter("DOCUMENTATION").iter().any(|e| e.name == "docs"));
        assert_eq!(filter("").len(), 12);
    }

    #[test]
    fn test_enter_runs_selected() {
        let mut ws = Workspace::new(KeyMap::defaults(), None);
        let mut pane = PalettePane::new();
        for ch in "s".chars() {
            pane.handle_key(&key(KeyCode::Char(ch)), &mut ws);
        }
        pane.render(&ws, 40, 10, true);
        pane.handle_key(&key(KeyCode::Down), &mut ws);
        let first_two: Vec<_> = filter("s").iter().take(2).map(|e| e.command.clone()).collect();
        assert_eq!(pane.handle_key(&key(KeyCode::Enter), &mut ws), PaneResponse::CloseWith(first_two[1].clone()));
    }

    #[test]
    fn test_no_match_enter_is_noop() {
        let mut ws = Workspace::new(KeyMap::defaults(), None);
        let mut pane = PalettePane::new();
        for ch in "zzz".chars() {
            pane.handle_key(&key(KeyCode::Char(ch)), &mut ws);
        }
        assert_eq!(pane.handle_key(&key(KeyCode::Enter), &mut ws), PaneResponse::Handled);
    }
}
