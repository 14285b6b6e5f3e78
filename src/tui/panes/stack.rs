//! Call stack, innermost frame first. Enter focuses the frame's tracer.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::list::ListView;
use super::super::pane::{AppCommand, Pane, PaneKind, PaneResponse, PaneView};
use super::super::workspace::Workspace;

/// Frame list.
#[derive(Debug, Default)]
pub struct StackPane {
    list: ListView,
}

impl StackPane {
    /// Selection on the top frame.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Pane for StackPane {
    fn kind(&self) -> PaneKind {
        PaneKind::Stack
    }

    fn title(&self, ws: &Workspace) -> String {
        format!("stack ({})", ws.tracer.frames().len())
    }

    fn render(&mut self, ws: &Workspace, _width: u16, height: u16, _focused: bool) -> PaneView {
        let frames = ws.tracer.frames();
        let lines = if frames.is_empty() {
            vec![Line::from(Span::styled(
                "no suspended functions",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            frames.iter().rev().map(|f| Line::from(f.label())).collect()
        };
        PaneView {
            lines: self.list.render(lines, usize::from(height)),
            cursor: None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, ws: &mut Workspace) -> PaneResponse {
        match key.code {
            KeyCode::Enter => {
                let frames = ws.tracer.frames();
                match frames.iter().rev().nth(self.list.selected()) {
                    Some(frame) => PaneResponse::Command(AppCommand::FocusFrame(frame.token())),
                    None => PaneResponse::Handled,
                }
            }
            _ if self.list.navigate(key) => PaneResponse::Handled,
            _ => PaneResponse::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyMap;
    use crate::protocol::WindowSpec;
    use crate::tracer::TracerInput;
    use crossterm::event::KeyModifiers;

    fn suspend(ws: &mut Workspace, token: i64, name: &str, row: usize) {
        ws.tracer_input(TracerInput::Suspend(WindowSpec {
            token,
            name: name.into(),
            text: vec![name.into(), "x".into(), "y".into()],
            debugger: true,
            stop: vec![],
            current_row: Some(row),
            read_only: true,
        }));
    }

    #[test]
    fn test_lists_top_first_and_focuses() {
        let mut ws = Workspace::new(KeyMap::defaults(), None);
        suspend(&mut ws, 1, "Outer", 2);
        suspend(&mut ws, 2, "Inner", 1);

        let mut pane = StackPane::new();
        assert_eq!(pane.title(&ws), "stack (2)");
        let view = pane.render(&ws, 30, 5, true);
        let labels: Vec<_> = view.lines.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["Inner[1]", "Outer[2]"]);

        pane.handle_key(&KeyEvent::new(KeyCode::Down, KeyModifiers::NONE), &mut ws);
        assert_eq!(
            pane.handle_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &mut ws),
            PaneResponse::Command(AppCommand::FocusFrame(1))
        );
    }
}
