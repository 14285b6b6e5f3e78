//! Pane stack behaviour driven through the application, no socket.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use rideterm::config::KeyMap;
use rideterm::tui::{App, Mode, PaneKind, Workspace};

fn app() -> App {
    App::new(Workspace::new(KeyMap::defaults(), None), Rect::new(0, 0, 100, 30))
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_terminal_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
}

fn leader(app: &mut App, ch: char) {
    app.handle_terminal_event(&Event::Key(KeyEvent::new(KeyCode::Char(']'), KeyModifiers::CONTROL)));
    press(app, KeyCode::Char(ch));
}

#[test]
fn test_move_mode_changes_only_geometry() {
    let mut app = app();
    leader(&mut app, '?');
    let id = app.panes().focused_id().unwrap();
    let before = app.panes().rect(id).unwrap();

    leader(&mut app, 'm');
    assert_eq!(app.panes().mode(), Mode::Moving);
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Esc);

    assert_eq!(app.panes().mode(), Mode::Normal);
    assert_eq!(app.panes().focused_id(), Some(id));
    let after = app.panes().rect(id).unwrap();
    assert_eq!(after.x, before.x + 2);
    assert_eq!(after.y, before.y + 1);
    assert_eq!((after.width, after.height), (before.width, before.height));
    assert_eq!(app.panes().len(), 1);
}

#[test]
fn test_move_mode_refused_for_session() {
    let mut app = app();
    leader(&mut app, 'm');
    assert_eq!(app.panes().mode(), Mode::Normal);
    assert!(app
        .ws()
        .debug_log
        .lines()
        .iter()
        .any(|l| l.contains("cannot be moved")));
}

#[test]
fn test_escape_cancels_leader() {
    let mut app = app();
    app.handle_terminal_event(&Event::Key(KeyEvent::new(KeyCode::Char(']'), KeyModifiers::CONTROL)));
    assert!(app.leader_pending());
    press(&mut app, KeyCode::Esc);
    assert!(!app.leader_pending());
    press(&mut app, KeyCode::Char('d'));
    assert!(app.panes().is_empty());
    assert_eq!(app.panes().session().input(), "d");
}

#[test]
fn test_tab_cycles_and_escape_closes() {
    let mut app = app();
    leader(&mut app, 'd');
    leader(&mut app, '?');
    assert_eq!(app.panes().focused_kind(), PaneKind::KeysHelp);

    leader(&mut app, 'n');
    assert_eq!(app.panes().focused_kind(), PaneKind::Session);
    leader(&mut app, 'n');
    assert_ne!(app.panes().focused_kind(), PaneKind::Session);

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.panes().len(), 1);
    press(&mut app, KeyCode::Esc);
    assert!(app.panes().is_empty());
    assert_eq!(app.panes().focused_kind(), PaneKind::Session);
}

#[test]
fn test_focus_mode_renders_single_pane() {
    let mut app = app();
    leader(&mut app, '?');
    leader(&mut app, 'f');
    assert_eq!(app.panes().mode(), Mode::Focus);

    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| app.render(f)).unwrap();
    let buffer = terminal.backend().buffer();
    let top: String = (0..100).map(|x| buffer[(x, 0)].symbol()).collect();
    assert!(!top.contains('╔'));
    assert!(!top.contains(" session "));

    leader(&mut app, 'f');
    assert_eq!(app.panes().mode(), Mode::Normal);
}

#[test]
fn test_click_focuses_session() {
    let mut app = app();
    leader(&mut app, 'd');
    let id = app.panes().focused_id().unwrap();
    let rect = app.panes().rect(id).unwrap();

    // Any cell outside the floating pane belongs to the session.
    let (column, row) = if rect.x > 0 { (0, 0) } else { (99, 29) };
    app.handle_terminal_event(&Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }));
    assert_eq!(app.panes().focused_kind(), PaneKind::Session);
    assert_eq!(app.panes().len(), 1);
}

fn rows(app: &mut App) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| app.render(f)).unwrap();
    let buffer = terminal.backend().buffer();
    (0u16..30)
        .map(|y| (0u16..100).map(|x| buffer[(x, y)].symbol()).collect())
        .collect()
}

#[test]
fn test_escape_leaves_focus_mode_on_session() {
    let mut app = app();
    leader(&mut app, 'f');
    let screen = rows(&mut app);
    assert!(!screen[0].contains('╔'));
    assert!(screen[29].contains("focus mode (esc exits)"));

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.panes().mode(), Mode::Normal);
    let screen = rows(&mut app);
    assert!(screen[0].starts_with('╔'));
    assert!(!screen[29].contains("focus mode"));
}

#[test]
fn test_escape_leaves_focus_mode_before_closing_pane() {
    let mut app = app();
    leader(&mut app, '?');
    leader(&mut app, 'f');

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.panes().mode(), Mode::Normal);
    assert_eq!(app.panes().focused_kind(), PaneKind::KeysHelp);

    press(&mut app, KeyCode::Esc);
    assert!(app.panes().is_empty());
    assert_eq!(app.panes().mode(), Mode::Normal);
}
