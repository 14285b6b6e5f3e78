//! Terminal state guard for RAII cleanup.
//!
//! Entering the UI switches the terminal into raw mode, the alternate
//! screen and mouse capture. [`TerminalGuard::enter`] does all three and the
//! returned guard undoes them on drop, including when the UI loop unwinds.
//! [`install_panic_hook`] restores the terminal before the default hook
//! prints, so panic messages land on the normal screen.

use std::io::{self, stdout};

use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Restores terminal state when dropped.
#[derive(Debug)]
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    /// Enable raw mode, the alternate screen and mouse capture.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self { _private: () };
        execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore();
    }
}

/// Best-effort terminal restore. Errors are ignored.
pub fn restore() {
    let _ = disable_raw_mode();
    let _ = execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture, Show);
}

/// Chain a hook that restores the terminal ahead of the existing one.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log::error!("PANIC: {info}");
        restore();
        previous(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_is_idempotent() {
        // Safe to call without a prior enter().
        restore();
        restore();
    }
}
