//! Optional protocol transcript sink.
//!
//! Appends one timestamped line per frame:
//!
//! ```text
//! [14:03:07.125] → Execute {"text":"1+1\n","trace":0}
//! [14:03:07.131] ← ["AppendSessionOutput",{"result":"2\n","type":2}]
//! [14:03:06.900] → SupportedProtocols=2
//! ```
//!
//! A disabled log is a no-op. Write failures are swallowed so logging can
//! never change protocol behaviour.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::message::Message;
use crate::error::ClientError;

/// Direction marker for raw lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Client to interpreter.
    Sent,
    /// Interpreter to client.
    Received,
}

impl Direction {
    fn arrow(self) -> &'static str {
        match self {
            Self::Sent => "→",
            Self::Received => "←",
        }
    }
}

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Append-only protocol log, cheap to clone and share with the reader thread.
#[derive(Clone, Default)]
pub struct ProtocolLog {
    sink: Option<Sink>,
}

impl fmt::Debug for ProtocolLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolLog")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl ProtocolLog {
    /// A log that discards everything.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> Result<Self, ClientError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(file))
    }

    /// Log into an arbitrary writer.
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Some(Arc::new(Mutex::new(Box::new(writer)))),
        }
    }

    /// True when lines are being written somewhere.
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Record an outbound application message.
    pub fn sent(&self, msg: &Message) {
        self.write_line(&format!("{} {msg}", Direction::Sent.arrow()));
    }

    /// Record an inbound payload exactly as received.
    pub fn received(&self, payload: &str) {
        self.write_line(&format!("{} {payload}", Direction::Received.arrow()));
    }

    /// Record a handshake line.
    pub fn raw(&self, direction: Direction, text: &str) {
        self.write_line(&format!("{} {text}", direction.arrow()));
    }

    fn write_line(&self, line: &str) {
        let Some(sink) = &self.sink else {
            return;
        };
        let stamp = chrono::Local::now().format("%H:%M:%S%.3f");
        if let Ok(mut writer) = sink.lock() {
            let _ = writeln!(writer, "[{stamp}] {line}");
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_log_is_noop() {
        let log = ProtocolLog::disabled();
        assert!(!log.is_enabled());
        log.sent(&Message::new("Execute"));
        log.received("[]");
    }

    #[test]
    fn test_lines_are_timestamped_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ride.log");
        std::fs::write(&path, "existing\n").unwrap();

        let log = ProtocolLog::open(&path).unwrap();
        log.raw(Direction::Sent, "SupportedProtocols=2");
        log.sent(&Message::new("CloseWindow").with("win", 1_i64));
        log.received(r#"["SetPromptType",{"type":1}]"#);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "existing");
        assert!(lines[1].starts_with('['));
        assert!(lines[1].ends_with("] → SupportedProtocols=2"));
        assert!(lines[2].ends_with(r#"] → CloseWindow {"win":1}"#));
        assert!(lines[3].ends_with(r#"] ← ["SetPromptType",{"type":1}]"#));
        // [HH:MM:SS.mmm]
        assert_eq!(lines[1].find(']'), Some(13));
    }
}
