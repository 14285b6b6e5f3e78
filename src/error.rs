//! Error taxonomy for the client.
//!
//! Each variant maps to one recovery policy:
//!
//! | Variant         | Policy                                              |
//! |-----------------|-----------------------------------------------------|
//! | `Connection`    | fatal, tears down the reader and exits the process  |
//! | `Decode`        | frame dropped and logged, connection continues      |
//! | `ProtocolEvent` | shown as a session output line, state left as-is    |
//! | `Config`        | affected field falls back to its default silently   |
//! | `Io`            | local file operation failed, reported in session    |

// Rust guideline compliant 2026-01

use thiserror::Error;

/// Errors produced by the protocol, tracer and configuration layers.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The socket could not be established or was lost.
    #[error("connection error: {0}")]
    Connection(String),

    /// A frame arrived intact but its payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A well-formed event that does not fit the current client state.
    #[error("unexpected event {command}: {detail}")]
    ProtocolEvent {
        /// Command name of the offending event.
        command: String,
        /// What was wrong with it.
        detail: String,
    },

    /// A configuration value was malformed.
    #[error("config error: {0}")]
    Config(String),

    /// Local file I/O (log sink, transcript save).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// True when the error must terminate the session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Build a connection error from an I/O failure with context.
    pub(crate) fn connection(context: &str, err: &std::io::Error) -> Self {
        Self::Connection(format!("{context}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_connection_errors_are_fatal() {
        assert!(ClientError::Connection("closed".into()).is_fatal());
        assert!(!ClientError::Decode("bad json".into()).is_fatal());
        assert!(!ClientError::Config("keys".into()).is_fatal());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(!ClientError::from(io).is_fatal());
    }

    #[test]
    fn test_protocol_event_display() {
        let err = ClientError::ProtocolEvent {
            command: "SetHighlightLine".into(),
            detail: "no frame for window 9".into(),
        };
        assert_eq!(
            err.to_string(),
            "unexpected event SetHighlightLine: no frame for window 9"
        );
    }
}
