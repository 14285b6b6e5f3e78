//! Pane geometry.
//!
//! Floating panes keep an absolute [`Rect`]. New panes get a default spot
//! by kind; move mode shifts or resizes that rect, always clamped so the
//! pane stays on screen with a usable minimum size.
//!
//! ```text
//! ┌ session (full screen) ───────────────────────────────┐
//! │                         ┌ variables ─────────────────┤
//! │   ┌ editor ───────┐     │                            │
//! │   │               │     ├ stack ─────────────────────┤
//! │   └───────────────┘     │                            │
//! └─────────────────────────┴────────────────────────────┘
//! ```

// Rust guideline compliant 2026-01

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::pane::PaneKind;

/// Smallest width a pane can be resized to, borders included.
pub const MIN_PANE_WIDTH: u16 = 12;

/// Smallest height a pane can be resized to, borders included.
pub const MIN_PANE_HEIGHT: u16 = 3;

/// Creates a centered rectangle within a parent area.
///
/// # Arguments
///
/// * `percent_x` - Width of the centered rect as a percentage of parent width
/// * `percent_y` - Height of the centered rect as a percentage of parent height
/// * `parent` - The parent rectangle to center within
pub fn centered_rect(percent_x: u16, percent_y: u16, parent: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(parent);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Right-hand column split into a top and bottom half.
fn side_column(screen: Rect) -> (Rect, Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(screen);
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);
    (halves[0], halves[1])
}

/// Where a newly opened pane of `kind` appears.
///
/// `stacked` is how many panes of the same kind are already open; editors
/// cascade by that many cells so they do not hide each other exactly.
pub fn default_rect(kind: PaneKind, screen: Rect, stacked: usize) -> Rect {
    let rect = match kind {
        PaneKind::Session => screen,
        PaneKind::Editor => {
            let base = centered_rect(70, 70, screen);
            let step = u16::try_from(stacked.min(8)).unwrap_or(8) * 2;
            Rect { x: base.x + step, y: base.y + step / 2, ..base }
        }
        PaneKind::DebugLog => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(screen);
            columns[1]
        }
        PaneKind::Variables => side_column(screen).0,
        PaneKind::Stack => side_column(screen).1,
        PaneKind::KeysHelp => centered_rect(60, 80, screen),
        PaneKind::Palette => centered_rect(50, 50, screen),
        PaneKind::DocSearch => centered_rect(80, 80, screen),
        PaneKind::SymbolSearch => centered_rect(50, 60, screen),
    };
    clamp_to(rect, screen)
}

/// Fit `rect` inside `screen`, shrinking and then shifting as needed.
pub fn clamp_to(rect: Rect, screen: Rect) -> Rect {
    let width = rect.width.clamp(MIN_PANE_WIDTH.min(screen.width), screen.width);
    let height = rect.height.clamp(MIN_PANE_HEIGHT.min(screen.height), screen.height);
    let max_x = screen.x + screen.width - width;
    let max_y = screen.y + screen.height - height;
    Rect {
        x: rect.x.clamp(screen.x, max_x),
        y: rect.y.clamp(screen.y, max_y),
        width,
        height,
    }
}

/// Move by `(dx, dy)` cells, staying on screen.
pub fn shift(rect: Rect, dx: i32, dy: i32, screen: Rect) -> Rect {
    let x = (i32::from(rect.x) + dx).max(0);
    let y = (i32::from(rect.y) + dy).max(0);
    clamp_to(
        Rect {
            x: u16::try_from(x).unwrap_or(u16::MAX),
            y: u16::try_from(y).unwrap_or(u16::MAX),
            ..rect
        },
        screen,
    )
}

/// Grow or shrink by `(dw, dh)` cells, keeping the top-left corner.
pub fn resize(rect: Rect, dw: i32, dh: i32, screen: Rect) -> Rect {
    let width = (i32::from(rect.width) + dw).max(i32::from(MIN_PANE_WIDTH));
    let height = (i32::from(rect.height) + dh).max(i32::from(MIN_PANE_HEIGHT));
    let max_width = i32::from(screen.x + screen.width) - i32::from(rect.x);
    let max_height = i32::from(screen.y + screen.height) - i32::from(rect.y);
    clamp_to(
        Rect {
            width: u16::try_from(width.min(max_width).max(1)).unwrap_or(1),
            height: u16::try_from(height.min(max_height).max(1)).unwrap_or(1),
            ..rect
        },
        screen,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 24,
    };

    #[test]
    fn test_centered_rect() {
        let parent = Rect::new(0, 0, 100, 50);
        let modal = centered_rect(50, 30, parent);
        assert_eq!(modal.width, 50);
        assert_eq!(modal.x, 25);
    }

    #[test]
    fn test_defaults_fit_on_screen() {
        for kind in [
            PaneKind::Editor,
            PaneKind::DebugLog,
            PaneKind::Variables,
            PaneKind::Stack,
            PaneKind::KeysHelp,
            PaneKind::Palette,
            PaneKind::DocSearch,
            PaneKind::SymbolSearch,
        ] {
            let rect = default_rect(kind, SCREEN, 3);
            assert!(rect.right() <= SCREEN.right(), "{kind:?} {rect:?}");
            assert!(rect.bottom() <= SCREEN.bottom(), "{kind:?} {rect:?}");
        }
        assert_eq!(default_rect(PaneKind::Session, SCREEN, 0), SCREEN);
    }

    #[test]
    fn test_editors_cascade() {
        let first = default_rect(PaneKind::Editor, SCREEN, 0);
        let second = default_rect(PaneKind::Editor, SCREEN, 1);
        assert_eq!(second.x, first.x + 2);
        assert_eq!(second.width, first.width);
    }

    #[test]
    fn test_shift_clamps_to_screen() {
        let rect = Rect::new(10, 5, 20, 10);
        assert_eq!(shift(rect, 2, 1, SCREEN), Rect::new(12, 6, 20, 10));
        assert_eq!(shift(rect, -50, -50, SCREEN), Rect::new(0, 0, 20, 10));
        assert_eq!(shift(rect, 500, 500, SCREEN), Rect::new(60, 14, 20, 10));
    }

    #[test]
    fn test_resize_respects_minimum_and_edge() {
        let rect = Rect::new(10, 5, 20, 10);
        assert_eq!(resize(rect, -100, -100, SCREEN), Rect::new(10, 5, MIN_PANE_WIDTH, MIN_PANE_HEIGHT));
        assert_eq!(resize(rect, 100, 100, SCREEN), Rect::new(10, 5, 70, 19));
    }

    #[test]
    fn test_clamp_after_screen_shrinks() {
        let rect = Rect::new(60, 20, 30, 10);
        let small = Rect::new(0, 0, 40, 12);
        let clamped = clamp_to(rect, small);
        assert_eq!(clamped, Rect::new(10, 2, 30, 10));
    }
}
