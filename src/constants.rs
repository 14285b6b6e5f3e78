//! Application-wide constants for rideterm.
//!
//! # Categories
//!
//! - **Connection**: default address and environment overrides
//! - **Polling**: event loop timing
//! - **UI**: prompts, list limits and layout sizes

use std::time::Duration;

// ============================================================================
// Connection
// ============================================================================

/// Interpreter address used when `-addr` is not given.
pub const DEFAULT_ADDR: &str = "localhost:4502";

/// Environment variable overriding the diagnostic log path.
pub const LOG_FILE_ENV: &str = "RIDETERM_LOG_FILE";

/// Diagnostic log file name inside the temp directory.
pub const DEFAULT_LOG_FILE: &str = "rideterm.log";

// ============================================================================
// Polling
// ============================================================================

/// How long the UI loop waits for terminal input when nothing is queued.
///
/// 16ms keeps redraws near 60fps and bounds the latency of queued
/// protocol messages.
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(16);

// ============================================================================
// UI
// ============================================================================

/// Session prompt while the interpreter is ready.
pub const PROMPT_READY: &str = "      ";

/// Session prompt while code runs.
pub const PROMPT_BUSY: &str = "  ... ";

/// Lines kept in the in-app debug log before the oldest are dropped.
pub const MAX_DEBUG_LOG_LINES: usize = 5000;

/// Maximum documentation search results.
pub const DOC_SEARCH_LIMIT: usize = 50;

/// Documentation index file name, next to the user config.
pub const DOCS_INDEX_FILE: &str = "docs.json";

/// Rows moved by PageUp / PageDown when the view height is unknown.
pub const DEFAULT_PAGE_ROWS: usize = 10;

/// Cells a pane moves per arrow press in move mode.
pub const MOVE_STEP: u16 = 2;
