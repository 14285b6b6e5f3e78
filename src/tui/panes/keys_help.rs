//! Key binding reference built from the live key map.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use super::super::pane::{Pane, PaneKind, PaneResponse, PaneView};
use super::super::scroll::ScrollView;
use super::super::workspace::Workspace;
use crate::config::{Action, KeyMap};

/// Fixed bindings that are not configurable.
const FIXED: &[(&str, &[(&str, &str)])] = &[
    (
        "After leader",
        &[
            ("d", "toggle debug log"),
            ("q", "quit"),
            ("?", "this help"),
            (":", "command palette"),
            ("m", "move mode"),
            ("f", "focus mode"),
            ("b", "toggle breakpoint"),
            ("s", "stack"),
            ("l", "variables"),
            ("n", "next pane"),
        ],
    ),
    (
        "Tracer",
        &[
            ("n", "run current line"),
            ("i", "step into"),
            ("c", "continue"),
            ("< >", "trace backward / forward"),
            ("b", "toggle breakpoint"),
            ("e", "edit function"),
            ("esc", "pop frame"),
        ],
    ),
    (
        "Move mode",
        &[
            ("arrows", "move pane"),
            ("shift+arrows", "resize pane"),
            ("esc enter", "done"),
        ],
    ),
    ("Focus mode", &[("esc", "back to all panes")]),
    (
        "Session",
        &[
            ("tab", "complete name"),
            ("`", "APL symbol prefix"),
            ("ctrl+l", "clear screen"),
            ("f1", "docs for symbol at cursor"),
            ("ctrl+s", "save editor"),
        ],
    ),
];

/// Scrollable list of bindings.
#[derive(Debug)]
pub struct KeysHelpPane {
    scroll: ScrollView,
}

impl Default for KeysHelpPane {
    fn default() -> Self {
        Self::new()
    }
}

impl KeysHelpPane {
    /// Scrolled to the top.
    pub fn new() -> Self {
        Self {
            scroll: ScrollView::top(),
        }
    }
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn entry(keys: &str, help: &str) -> Line<'static> {
    Line::from(format!("  {keys:<14} {help}"))
}

/// Every help line for `keymap`.
pub fn help_lines(keymap: &KeyMap) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current = "";
    for action in Action::ALL {
        if action.section() != current {
            if !current.is_empty() {
                lines.push(Line::default());
            }
            current = action.section();
            lines.push(section(current));
        }
        lines.push(entry(&keymap.describe(action), action.help()));
    }
    for (title, entries) in FIXED {
        lines.push(Line::default());
        lines.push(section(title));
        for (keys, help) in *entries {
            lines.push(entry(keys, help));
        }
    }
    lines
}

impl Pane for KeysHelpPane {
    fn kind(&self) -> PaneKind {
        PaneKind::KeysHelp
    }

    fn title(&self, _ws: &Workspace) -> String {
        "keys".to_string()
    }

    fn render(&mut self, ws: &Workspace, _width: u16, height: u16, _focused: bool) -> PaneView {
        let lines = help_lines(&ws.keymap);
        let range = self.scroll.window(lines.len(), usize::from(height));
        PaneView {
            lines: lines[range].to_vec(),
            cursor: None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, ws: &mut Workspace) -> PaneResponse {
        let total = help_lines(&ws.keymap).len();
        match key.code {
            KeyCode::Up => self.scroll.up(1),
            KeyCode::Down => self.scroll.down(1, total),
            KeyCode::PageUp => self.scroll.up(self.scroll.page()),
            KeyCode::PageDown => self.scroll.down(self.scroll.page(), total),
            KeyCode::Char('q') => return PaneResponse::Close,
            _ => return PaneResponse::Ignored,
        }
        PaneResponse::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_configured_bindings() {
        let (keymap, _) = KeyMap::parse(r#"{"keys": {"leader": ["ctrl+a"]}}"#);
        let text: Vec<String> = help_lines(&keymap).iter().map(ToString::to_string).collect();
        assert_eq!(text[0], "Actions");
        assert!(text.iter().any(|l| l.contains("ctrl+a") && l.contains("leader prefix")));
        assert!(text.iter().any(|l| l == "Tracer"));
        assert!(text.iter().any(|l| l.contains("f1") && l.contains("docs for symbol")));
    }
}
