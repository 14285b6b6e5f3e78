//! Terminal user interface.
//!
//! # Architecture
//!
//! ```text
//! Runner<B, T>
//! ├── App
//! │   ├── Workspace     - transcript, debug log, tracer, variables, keymap, outbox
//! │   └── PaneManager   - session + floating pane stack, focus, modes, overlay
//! │         └── panes::* (Box<dyn Pane>)
//! ├── Terminal<B>       - ratatui terminal
//! ├── T: Transport      - connection write half
//! └── UnboundedReceiver<Inbound> - from the reader thread
//! ```
//!
//! Helpers: [`guard`] (raw mode RAII), [`input`] (key specs), [`layout`]
//! (rect geometry), [`scroll`] (scroll views), [`overlay`] (popup and
//! prompts).

pub mod app;
pub mod guard;
pub mod input;
pub mod layout;
pub mod overlay;
pub mod pane;
pub mod pane_manager;
pub mod panes;
pub mod runner;
pub mod scroll;
pub mod workspace;

pub use app::App;
pub use guard::{install_panic_hook, TerminalGuard};
pub use pane::{AppCommand, Pane, PaneId, PaneKind, PaneResponse, PaneView};
pub use pane_manager::{Mode, PaneManager};
pub use runner::Runner;
pub use workspace::Workspace;
