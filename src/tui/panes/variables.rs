//! Variables pane.
//!
//! Shows [`Workspace::variables`] rows. `~` flips between the top frame's
//! locals and every workspace name; Enter asks the interpreter to open an
//! editor on the selected name.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::list::ListView;
use super::super::pane::{Pane, PaneKind, PaneResponse, PaneView};
use super::super::workspace::Workspace;
use crate::protocol::command;
use crate::tracer::{Scope, VariableRow};

const LOCAL_MARK: &str = "• ";

/// Name/value list.
#[derive(Debug, Default)]
pub struct VariablesPane {
    list: ListView,
}

impl VariablesPane {
    /// Selection on the first row.
    pub fn new() -> Self {
        Self::default()
    }
}

fn row_line(row: &VariableRow, scope: Scope, name_width: usize) -> Line<'static> {
    let mark = if scope == Scope::All && row.local { LOCAL_MARK } else { "  " };
    Line::from(vec![
        Span::styled(mark, Style::default().fg(Color::Yellow)),
        Span::raw(format!("{:<name_width$} ", row.name)),
        Span::styled(row.value.clone(), Style::default().fg(Color::Cyan)),
    ])
}

impl Pane for VariablesPane {
    fn kind(&self) -> PaneKind {
        PaneKind::Variables
    }

    fn title(&self, ws: &Workspace) -> String {
        format!("variables [{}]", ws.variables.scope().label())
    }

    fn render(&mut self, ws: &Workspace, _width: u16, height: u16, _focused: bool) -> PaneView {
        let rows = ws.variables.rows();
        let scope = ws.variables.scope();
        let name_width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
        let lines = rows.iter().map(|r| row_line(r, scope, name_width)).collect();
        PaneView {
            lines: self.list.render(lines, usize::from(height)),
            cursor: None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, ws: &mut Workspace) -> PaneResponse {
        match key.code {
            KeyCode::Char('~') => {
                ws.toggle_variable_scope();
                self.list.reset();
                PaneResponse::Handled
            }
            KeyCode::Enter => {
                if let Some(row) = ws.variables.rows().get(self.list.selected()) {
                    ws.send(command::edit(&row.name));
                }
                PaneResponse::Handled
            }
            KeyCode::Char('r') => {
                ws.refresh_variables();
                PaneResponse::Handled
            }
            _ if self.list.navigate(key) => PaneResponse::Handled,
            _ => PaneResponse::Ignored,
        }
    }
}
