//! Modal overlays drawn above every pane.
//!
//! At most one overlay is open. While it is, it sees every key first:
//!
//! ```text
//! key ──► Overlay::handle_key ──► Keep             (consumed)
//!                               ├► Close            (dismissed, consumed)
//!                               ├► CloseAndForward  (dismissed, key goes on to the pane)
//!                               ├► Complete {..}    (replace prefix in target pane)
//!                               └► Submit {..}      (prompt answered)
//! ```

// Rust guideline compliant 2026-01

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_input::Input;

use super::layout::centered_rect;
use super::panes::list::edit_query;
use super::workspace::CompletionTarget;
use crate::complete::AutocompleteState;

/// Prompt variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// "Quit? (y/n)"
    ConfirmQuit,
    /// "Save as: <file>"
    SaveAs,
}

/// A one-line question with optional editable answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Which question.
    pub kind: PromptKind,
    /// Answer line with its cursor.
    pub input: Input,
}

/// Label in front of the Save-as answer.
const SAVE_AS_LABEL: &str = "Save as: ";

impl Prompt {
    /// Quit confirmation.
    pub fn confirm_quit() -> Self {
        Self {
            kind: PromptKind::ConfirmQuit,
            input: Input::default(),
        }
    }

    /// File name prompt pre-filled with `default`.
    pub fn save_as(default: impl Into<String>) -> Self {
        Self {
            kind: PromptKind::SaveAs,
            input: Input::new(default.into()),
        }
    }

    /// Displayed text.
    pub fn text(&self) -> String {
        match self.kind {
            PromptKind::ConfirmQuit => "Quit? (y/n)".to_string(),
            PromptKind::SaveAs => format!("{SAVE_AS_LABEL}{}", self.input.value()),
        }
    }
}

/// The open overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// Completion popup for a pane's cursor line.
    Autocomplete {
        /// Selection state.
        state: AutocompleteState,
        /// Pane the result is applied to.
        target: CompletionTarget,
    },
    /// Question in the middle of the screen.
    Prompt(Prompt),
}

/// What an overlay did with a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayResult {
    /// Consumed; stay open.
    Keep,
    /// Dismissed; key consumed.
    Close,
    /// Dismissed; deliver the key to the focused pane.
    CloseAndForward,
    /// Replace the prefix with `text`.
    Complete {
        /// Pane to edit.
        target: CompletionTarget,
        /// Column where the prefix starts.
        anchor: usize,
        /// Prefix length in chars.
        prefix_len: usize,
        /// Chosen candidate.
        text: String,
    },
    /// Prompt answered.
    Submit {
        /// Which prompt.
        kind: PromptKind,
        /// Final answer.
        value: String,
    },
}

impl Overlay {
    /// Offer a key.
    pub fn handle_key(&mut self, key: &KeyEvent) -> OverlayResult {
        match self {
            Self::Autocomplete { state, target } => match key.code {
                KeyCode::Tab | KeyCode::Down => {
                    state.next();
                    OverlayResult::Keep
                }
                KeyCode::BackTab | KeyCode::Up => {
                    state.prev();
                    OverlayResult::Keep
                }
                KeyCode::Enter => match state.selected() {
                    Some(text) => OverlayResult::Complete {
                        target: *target,
                        anchor: state.anchor(),
                        prefix_len: state.prefix_len(),
                        text: text.to_string(),
                    },
                    None => OverlayResult::Close,
                },
                KeyCode::Esc => OverlayResult::Close,
                _ => OverlayResult::CloseAndForward,
            },
            Self::Prompt(prompt) => prompt_key(prompt, key),
        }
    }

    /// Draw over everything. `cursor` is the focused pane's absolute cursor.
    pub fn render(&self, f: &mut Frame, cursor: Option<(u16, u16)>) {
        match self {
            Self::Autocomplete { state, .. } => render_popup(f, state, cursor),
            Self::Prompt(prompt) => render_prompt(f, prompt),
        }
    }
}

fn prompt_key(prompt: &mut Prompt, key: &KeyEvent) -> OverlayResult {
    match prompt.kind {
        PromptKind::ConfirmQuit => match key.code {
            KeyCode::Char('y' | 'Y') => OverlayResult::Submit {
                kind: PromptKind::ConfirmQuit,
                value: "y".into(),
            },
            KeyCode::Char('n' | 'N') | KeyCode::Esc => OverlayResult::Close,
            _ => OverlayResult::Keep,
        },
        PromptKind::SaveAs => match key.code {
            KeyCode::Enter => {
                let value = prompt.input.value().trim().to_string();
                if value.is_empty() {
                    OverlayResult::Keep
                } else {
                    OverlayResult::Submit {
                        kind: PromptKind::SaveAs,
                        value,
                    }
                }
            }
            KeyCode::Esc => OverlayResult::Close,
            _ => {
                edit_query(&mut prompt.input, key);
                OverlayResult::Keep
            }
        },
    }
}

fn render_popup(f: &mut Frame, state: &AutocompleteState, cursor: Option<(u16, u16)>) {
    let screen = f.area();
    let (offset, visible) = state.visible();
    if visible.is_empty() {
        return;
    }

    let widest = state
        .candidates()
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0);
    let width = u16::try_from(widest + 4).unwrap_or(u16::MAX).min(screen.width);
    let height = u16::try_from(visible.len() + 2).unwrap_or(u16::MAX).min(screen.height);

    let (cx, cy) = cursor.unwrap_or((screen.x, screen.y));
    let back = u16::try_from(state.prefix_len()).unwrap_or(0);
    let x = cx.saturating_sub(back + 1).min(screen.right().saturating_sub(width));
    let below = cy + 1;
    let y = if below + height <= screen.bottom() {
        below
    } else {
        cy.saturating_sub(height)
    };
    let area = Rect::new(x, y, width, height);

    let lines: Vec<Line> = visible
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let style = if offset + i == state.selected_index() {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!(" {candidate} "), style))
        })
        .collect();

    f.render_widget(Clear, area);
    let title = format!("{}/{}", state.selected_index() + 1, state.candidates().len());
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn render_prompt(f: &mut Frame, prompt: &Prompt) {
    let screen = f.area();
    let text = prompt.text();
    let width = u16::try_from(text.chars().count() + 4)
        .unwrap_or(u16::MAX)
        .max(30)
        .min(screen.width);
    let band = centered_rect(100, 20, screen);
    let area = Rect::new(
        screen.x + (screen.width - width) / 2,
        band.y + band.height.saturating_sub(3) / 2,
        width,
        3.min(screen.height),
    );
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(Line::from(text)).block(Block::default().borders(Borders::ALL)),
        area,
    );
    if prompt.kind == PromptKind::SaveAs {
        let col = u16::try_from(SAVE_AS_LABEL.chars().count() + prompt.input.visual_cursor()).unwrap_or(0);
        f.set_cursor_position((area.x + 1 + col.min(area.width.saturating_sub(3)), area.y + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn popup() -> Overlay {
        Overlay::Autocomplete {
            state: AutocompleteState::new(
                0,
                3,
                vec!["alpha".into(), "alphabet".into(), "alpine".into()],
            ),
            target: CompletionTarget::Session,
        }
    }

    #[test]
    fn test_enter_without_cycling_picks_first() {
        let mut overlay = popup();
        match overlay.handle_key(&key(KeyCode::Enter)) {
            OverlayResult::Complete { text, anchor, prefix_len, .. } => {
                assert_eq!(text, "alpha");
                assert_eq!((anchor, prefix_len), (0, 3));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_tab_and_backtab_cycle() {
        let mut overlay = popup();
        overlay.handle_key(&key(KeyCode::Tab));
        overlay.handle_key(&key(KeyCode::Tab));
        overlay.handle_key(&key(KeyCode::BackTab));
        let OverlayResult::Complete { text, .. } = overlay.handle_key(&key(KeyCode::Enter)) else {
            panic!("expected completion");
        };
        assert_eq!(text, "alphabet");
    }

    #[test]
    fn test_other_key_closes_and_forwards() {
        let mut overlay = popup();
        assert_eq!(overlay.handle_key(&key(KeyCode::Char('x'))), OverlayResult::CloseAndForward);
        assert_eq!(overlay.handle_key(&key(KeyCode::Esc)), OverlayResult::Close);
    }

    #[test]
    fn test_save_prompt_editing() {
        let mut overlay = Overlay::Prompt(Prompt::save_as("a.txt"));
        overlay.handle_key(&key(KeyCode::Backspace));
        overlay.handle_key(&key(KeyCode::Backspace));
        overlay.handle_key(&key(KeyCode::Backspace));
        overlay.handle_key(&key(KeyCode::Char('l')));
        overlay.handle_key(&key(KeyCode::Char('g')));
        assert_eq!(
            overlay.handle_key(&key(KeyCode::Enter)),
            OverlayResult::Submit { kind: PromptKind::SaveAs, value: "a.lg".into() }
        );
    }

    #[test]
    fn test_save_prompt_edits_mid_name() {
        let mut overlay = Overlay::Prompt(Prompt::save_as("session-1.txt"));
        for _ in 0..4 {
            overlay.handle_key(&key(KeyCode::Left));
        }
        overlay.handle_key(&key(KeyCode::Char('b')));
        overlay.handle_key(&key(KeyCode::Home));
        overlay.handle_key(&key(KeyCode::Delete));
        overlay.handle_key(&key(KeyCode::Char('S')));
        overlay.handle_key(&key(KeyCode::End));
        overlay.handle_key(&key(KeyCode::Backspace));
        overlay.handle_key(&key(KeyCode::Char('m')));

        let Overlay::Prompt(prompt) = &overlay else {
            panic!("prompt closed");
        };
        assert_eq!(prompt.text(), "Save as: Session-1b.txm");
        assert_eq!(prompt.input.cursor(), 14);
    }

    #[test]
    fn test_save_prompt_cursor_drawn_at_edit_point() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut overlay = Overlay::Prompt(Prompt::save_as("ab"));
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|f| overlay.render(f, None)).unwrap();
        let at_end = terminal.get_cursor_position().unwrap();

        overlay.handle_key(&key(KeyCode::Left));
        terminal.draw(|f| overlay.render(f, None)).unwrap();
        let mid = terminal.get_cursor_position().unwrap();
        assert_eq!(mid.y, at_end.y);
        assert_eq!(mid.x + 1, at_end.x);
    }

    #[test]
    fn test_quit_prompt() {
        let mut overlay = Overlay::Prompt(Prompt::confirm_quit());
        assert_eq!(overlay.handle_key(&key(KeyCode::Char('x'))), OverlayResult::Keep);
        assert_eq!(overlay.handle_key(&key(KeyCode::Char('n'))), OverlayResult::Close);
        assert!(matches!(
            overlay.handle_key(&key(KeyCode::Char('y'))),
            OverlayResult::Submit { kind: PromptKind::ConfirmQuit, .. }
        ));
    }
}
