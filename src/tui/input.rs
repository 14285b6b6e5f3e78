//! Key event naming.
//!
//! Bindings in the config file are plain strings; [`key_spec`] turns a
//! crossterm key event into the same spelling so matching is a string
//! comparison.
//!
//! ```text
//! KeyEvent { Char(']'), CONTROL } ──► "ctrl+]"
//! KeyEvent { Char('\x1d'), NONE } ──► "ctrl+]"    (raw control byte)
//! KeyEvent { BackTab, SHIFT }     ──► "shift+tab"
//! KeyEvent { PageDown, NONE }     ──► "pgdown"
//! ```

// Rust guideline compliant 2026-01

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Config spelling of `key`, or `None` for keys that cannot be bound.
#[must_use]
pub fn key_spec(key: &KeyEvent) -> Option<String> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    let base = match key.code {
        KeyCode::Char(c) => {
            if let Some(name) = control_byte_name(c) {
                return Some(name.to_string());
            }
            c.to_lowercase().to_string()
        }
        KeyCode::Enter => "enter".into(),
        KeyCode::Esc => "esc".into(),
        KeyCode::Tab => "tab".into(),
        KeyCode::BackTab => return Some("shift+tab".into()),
        KeyCode::Backspace => "backspace".into(),
        KeyCode::Delete => "delete".into(),
        KeyCode::Insert => "insert".into(),
        KeyCode::Up => "up".into(),
        KeyCode::Down => "down".into(),
        KeyCode::Left => "left".into(),
        KeyCode::Right => "right".into(),
        KeyCode::Home => "home".into(),
        KeyCode::End => "end".into(),
        KeyCode::PageUp => "pgup".into(),
        KeyCode::PageDown => "pgdown".into(),
        KeyCode::F(n) => format!("f{n}"),
        _ => return None,
    };

    let mut spec = String::new();
    if ctrl {
        spec.push_str("ctrl+");
    }
    if alt {
        spec.push_str("alt+");
    }
    let shifted_named = key.modifiers.contains(KeyModifiers::SHIFT) && !matches!(key.code, KeyCode::Char(_));
    if shifted_named {
        spec.push_str("shift+");
    }
    spec.push_str(&base);
    Some(spec)
}

/// Terminals deliver Ctrl+\ .. Ctrl+_ as bare bytes 0x1C..0x1F.
fn control_byte_name(c: char) -> Option<&'static str> {
    match c {
        '\u{1c}' => Some("ctrl+\\"),
        '\u{1d}' => Some("ctrl+]"),
        '\u{1e}' => Some("ctrl+^"),
        '\u{1f}' => Some("ctrl+_"),
        _ => None,
    }
}

/// Only presses and repeats drive the UI.
#[must_use]
pub fn is_press(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
}

/// True for a plain or shifted printable character.
#[must_use]
pub fn printable(key: &KeyEvent) -> Option<char> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(c) if !c.is_control() => Some(c),
        _ => None,
    }
}

/// True for Ctrl+`c`.
#[must_use]
pub fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}
