//! Documentation search.
//!
//! Two views over one pane: the query with its results, and a single
//! entry's text. Enter opens an entry, Esc goes back to the results, and
//! Esc on the results lets the manager close the pane. [`DocSearchPane::lookup`]
//! starts on the best entry for a glyph or name.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use tui_input::Input;

use super::list::{edit_query, query_line, ListView};
use super::super::pane::{Pane, PaneKind, PaneResponse, PaneView};
use super::super::scroll::ScrollView;
use super::super::workspace::Workspace;
use crate::constants::DOC_SEARCH_LIMIT;
use crate::docs::DocEntry;

#[derive(Debug)]
enum View {
    Results,
    Entry { title: String, body: Vec<String>, scroll: ScrollView },
}

/// Query line, result list, entry viewer.
#[derive(Debug)]
pub struct DocSearchPane {
    query: Input,
    list: ListView,
    view: View,
}

impl Default for DocSearchPane {
    fn default() -> Self {
        Self::new()
    }
}

impl DocSearchPane {
    /// Empty query.
    pub fn new() -> Self {
        Self {
            query: Input::default(),
            list: ListView::new(),
            view: View::Results,
        }
    }

    /// Query pre-filled with `token`, opened on its best match if any.
    pub fn lookup(token: &str, ws: &Workspace) -> Self {
        let mut pane = Self {
            query: Input::new(token.to_string()),
            ..Self::new()
        };
        pane.open_selected(ws);
        pane
    }

    /// True while an entry is open.
    pub fn is_showing_entry(&self) -> bool {
        matches!(self.view, View::Entry { .. })
    }

    fn open_selected(&mut self, ws: &Workspace) {
        let picked = self
            .results(ws)
            .get(self.list.selected())
            .map(|e| (e.title.clone(), e.content.lines().map(str::to_string).collect()));
        if let Some((title, body)) = picked {
            self.view = View::Entry {
                title,
                body,
                scroll: ScrollView::top(),
            };
        }
    }

    fn results<'a>(&self, ws: &'a Workspace) -> Vec<&'a DocEntry> {
        ws.docs
            .as_ref()
            .map(|docs| docs.search(self.query.value(), DOC_SEARCH_LIMIT))
            .unwrap_or_default()
    }
}

impl Pane for DocSearchPane {
    fn kind(&self) -> PaneKind {
        PaneKind::DocSearch
    }

    fn title(&self, _ws: &Workspace) -> String {
        match &self.view {
            View::Results => "docs".to_string(),
            View::Entry { title, .. } => format!("docs: {title}"),
        }
    }

    fn render(&mut self, ws: &Workspace, _width: u16, height: u16, focused: bool) -> PaneView {
        let height = usize::from(height);
        if let View::Entry { body, scroll, .. } = &mut self.view {
            let range = scroll.window(body.len(), height);
            return PaneView {
                lines: body[range].iter().map(|l| Line::from(l.clone())).collect(),
                cursor: None,
            };
        }

        let (query, col) = query_line(&self.query);
        let rows = self
            .results(ws)
            .into_iter()
            .map(|e| {
                let keywords = e.keywords.join(" ");
                Line::from(vec![
                    Span::raw(e.title.clone()),
                    Span::raw(" "),
                    Span::styled(keywords, Style::default().add_modifier(Modifier::DIM)),
                ])
            })
            .collect();
        let mut lines = vec![query];
        lines.extend(self.list.render(rows, height.saturating_sub(1)));
        PaneView {
            lines,
            cursor: focused.then_some((col, 0)),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, ws: &mut Workspace) -> PaneResponse {
        if let View::Entry { body, scroll, .. } = &mut self.view {
            let total = body.len();
            match key.code {
                KeyCode::Esc => self.view = View::Results,
                KeyCode::Up => scroll.up(1),
                KeyCode::Down => scroll.down(1, total),
                KeyCode::PageUp => scroll.up(scroll.page()),
                KeyCode::PageDown => scroll.down(scroll.page(), total),
                _ => return PaneResponse::Ignored,
            }
            return PaneResponse::Handled;
        }

        if key.code == KeyCode::Enter {
            self.open_selected(ws);
            return PaneResponse::Handled;
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
