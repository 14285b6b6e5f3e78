//! rideterm - multi-pane terminal client for interpreter sessions over the
//! RIDE protocol.
//!
//! # Modules
//!
//! - [`protocol`] - framing, messages, typed events, connection
//! - [`tracer`] - readiness, suspended frames, breakpoints, variables
//! - [`editor`] - editable text buffers for editor and tracer windows
//! - [`complete`] - prefix completion and popup state
//! - [`config`] - key bindings
//! - [`docs`], [`symbols`] - documentation index and glyph table
//! - [`tui`] - panes, pane manager, application and event loop

// Rust guideline compliant 2026-01

pub mod complete;
pub mod config;
pub mod constants;
pub mod docs;
pub mod editor;
pub mod error;
pub mod protocol;
pub mod symbols;
pub mod tracer;
pub mod tui;

pub use error::ClientError;
