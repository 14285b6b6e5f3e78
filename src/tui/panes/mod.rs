//! Pane implementations.

pub mod debug_log;
pub mod doc_search;
pub mod editor;
pub mod keys_help;
pub mod list;
pub mod palette;
pub mod session;
pub mod stack;
pub mod symbol_search;
pub mod variables;

pub use debug_log::DebugLogPane;
pub use doc_search::DocSearchPane;
pub use editor::EditorPane;
pub use keys_help::KeysHelpPane;
pub use palette::PalettePane;
pub use session::SessionPane;
pub use stack::StackPane;
pub use symbol_search::SymbolSearchPane;
pub use variables::VariablesPane;
