//! The pane abstraction.
//!
//! Every view on screen implements [`Pane`]. A pane renders into plain
//! lines for a given inner size and reacts to keys; it never draws its own
//! border and never decides where it sits. The [`PaneManager`] owns those
//! concerns and routes input to exactly one focused pane.
//!
//! Panes talk back through [`PaneResponse`]: either they consumed the key,
//! they did not (so global bindings get a chance), they want to close, or
//! they ask the application to run an [`AppCommand`].
//!
//! [`PaneManager`]: super::pane_manager::PaneManager

// Rust guideline compliant 2026-01

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::text::Line;

use super::workspace::Workspace;
use crate::editor::EditorWindow;
use crate::protocol::WindowSpec;

/// Stable pane identifier. Never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaneId(pub(crate) u64);

impl PaneId {
    /// Raw value, for logging.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Pane variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneKind {
    /// REPL transcript and input line.
    Session,
    /// Function editor or tracer frame.
    Editor,
    /// In-app protocol/debug log.
    DebugLog,
    /// Key binding reference.
    KeysHelp,
    /// Command palette.
    Palette,
    /// Variable inspector.
    Variables,
    /// Call stack.
    Stack,
    /// Documentation search.
    DocSearch,
    /// Glyph search.
    SymbolSearch,
}

/// Application-level requests a pane cannot fulfil itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Open or close the debug log.
    ToggleDebug,
    /// Open or close key help.
    ShowKeys,
    /// Open the stack pane.
    ShowStack,
    /// Open the variables pane.
    ShowVariables,
    /// Toggle a breakpoint at the focused editor's cursor.
    ToggleBreakpoint,
    /// Prompt for a file name and save the transcript.
    SaveSession,
    /// Open documentation search.
    SearchDocs,
    /// Open the documentation entry for a glyph or name.
    ContextHelp(String),
    /// Open glyph search.
    SearchSymbols,
    /// Open the command palette.
    OpenPalette,
    /// Toggle focus mode.
    ToggleFocusMode,
    /// Enter move mode for the focused pane.
    EnterMoveMode,
    /// Clear the visible session screen.
    ClearScreen,
    /// Ask for quit confirmation.
    Quit,
    /// Focus the pane showing this frame.
    FocusFrame(i64),
    /// Insert text at the session cursor.
    InsertText(String),
    /// Focus the next pane.
    CycleFocus,
}

/// Result of offering input to a pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneResponse {
    /// Not consumed; global bindings may apply.
    Ignored,
    /// Consumed.
    Handled,
    /// Close this pane.
    Close,
    /// Run a command, keep the pane.
    Command(AppCommand),
    /// Close this pane, then run a command.
    CloseWith(AppCommand),
}

/// Rendered pane body.
#[derive(Debug, Default)]
pub struct PaneView {
    /// Lines for the inner area, top to bottom.
    pub lines: Vec<Line<'static>>,
    /// Cursor position relative to the inner area.
    pub cursor: Option<(u16, u16)>,
}

/// A view managed by the pane manager.
pub trait Pane: std::fmt::Debug {
    /// Which variant this is.
    fn kind(&self) -> PaneKind;

    /// Border title.
    fn title(&self, ws: &Workspace) -> String;

    /// Render for an inner area of `width` × `height` cells.
    fn render(&mut self, ws: &Workspace, width: u16, height: u16, focused: bool) -> PaneView;

    /// React to a key while focused.
    fn handle_key(&mut self, key: &KeyEvent, ws: &mut Workspace) -> PaneResponse;

    /// React to a mouse event at `(col, row)` inside the inner area.
    fn handle_mouse(&mut self, _mouse: &MouseEvent, _col: u16, _row: u16, _ws: &mut Workspace) -> PaneResponse {
        PaneResponse::Ignored
    }

    /// Interpreter window token, for editor panes.
    fn window_token(&self) -> Option<i64> {
        None
    }

    /// Apply an `UpdateWindow` for this pane's window.
    fn update_window(&mut self, _spec: &WindowSpec) -> bool {
        false
    }

    /// Copy of an owned editor window, for re-typing it as a tracer.
    fn owned_window(&self) -> Option<EditorWindow> {
        None
    }

    /// Replace `prefix_len` chars at `anchor` on the cursor line with `text`.
    fn apply_completion(&mut self, _ws: &mut Workspace, _anchor: usize, _prefix_len: usize, _text: &str) {}

    /// Toggle a breakpoint at the cursor. Returns false when not applicable.
    fn toggle_breakpoint(&mut self, _ws: &mut Workspace) -> bool {
        false
    }

    /// Short status text shown while this pane is focused.
    fn status(&self, _ws: &Workspace) -> Option<String> {
        None
    }

    /// Called before the pane is removed.
    fn on_close(&mut self, _ws: &mut Workspace) {}
}
