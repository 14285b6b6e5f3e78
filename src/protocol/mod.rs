//! Interpreter wire protocol.
//!
//! - [`framing`] - length + magic frame codec
//! - [`value`] - tagged-union argument values
//! - [`message`] - `["Command", {args}]` messages
//! - [`event`] - typed inbound events
//! - [`command`] - outbound command builders
//! - [`transcript`] - optional timestamped protocol log
//! - [`client`] - connection, handshake and background reader

pub mod client;
pub mod command;
pub mod event;
pub mod framing;
pub mod message;
pub mod transcript;
pub mod value;

pub use client::{Inbound, ProtocolClient, Transport};
pub use event::{Event, WindowSpec};
pub use message::Message;
pub use value::Value;
