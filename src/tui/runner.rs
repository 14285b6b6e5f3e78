//! UI event loop.
//!
//! The runner owns the [`App`], the ratatui terminal, the outbound
//! [`Transport`] and the receiving end of the reader thread's channel.
//!
//! # Event Loop
//!
//! ```text
//! loop {
//!   1. a terminal event is pending?  apply it
//!      else an inbound item is queued? apply it
//!      else wait up to INPUT_POLL_INTERVAL for terminal input
//!   2. flush the workspace outbox to the transport
//!   3. render
//! }
//! ```
//!
//! Exactly one event is applied per iteration and every one is followed by
//! a render. All state mutation happens on this thread; the reader thread
//! only decodes frames and forwards them in wire order.

// Rust guideline compliant 2026-01

use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::event;
use ratatui::backend::Backend;
use ratatui::Terminal;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;

use super::app::App;
use crate::constants::INPUT_POLL_INTERVAL;
use crate::protocol::{Inbound, Transport};

/// Drives an [`App`] against a terminal and a connection.
///
/// `B` is `CrosstermBackend<Stdout>` in production and `TestBackend` in
/// tests; `T` is the connection's write half.
pub struct Runner<B: Backend, T: Transport> {
    app: App,
    terminal: Terminal<B>,
    transport: T,
    inbound: UnboundedReceiver<Inbound>,
}

impl<B: Backend, T: Transport> std::fmt::Debug for Runner<B, T>
where
    B::Error: std::error::Error + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("app", &self.app)
            .finish_non_exhaustive()
    }
}

impl<B, T> Runner<B, T>
where
    B: Backend,
    B::Error: std::error::Error + Send + Sync + 'static,
    T: Transport,
{
    /// Assemble a runner.
    pub fn new(app: App, terminal: Terminal<B>, transport: T, inbound: UnboundedReceiver<Inbound>) -> Self {
        Self {
            app,
            terminal,
            transport,
            inbound,
        }
    }

    /// Application state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Application state, mutably.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// The terminal, for inspecting a test backend.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// The transport, for inspecting a test double.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run until the user quits or the connection drops.
    pub fn run(&mut self) -> Result<()> {
        log::info!("[Runner] Event loop starting");
        self.flush()?;
        self.render()?;

        while !self.app.should_quit() {
            if event::poll(Duration::ZERO)? {
                let ev = event::read()?;
                self.handle_terminal_event(&ev);
            } else if !self.process_inbound()? {
                // Idle: block briefly on the terminal so the loop does not spin.
                event::poll(INPUT_POLL_INTERVAL)?;
                continue;
            }
            self.flush()?;
            self.render()?;
        }

        log::info!("[Runner] Event loop exiting");
        Ok(())
    }

    /// Apply one terminal event.
    pub fn handle_terminal_event(&mut self, ev: &event::Event) {
        if let event::Event::Resize(cols, rows) = ev {
            log::debug!("[Runner] Resize {cols}x{rows}");
        }
        self.app.handle_terminal_event(ev);
    }

    /// Apply the oldest queued inbound item, if any.
    ///
    /// Returns whether one was applied. A lost connection is an error.
    pub fn process_inbound(&mut self) -> Result<bool> {
        match self.inbound.try_recv() {
            Ok(item) => {
                self.app.handle_inbound(item).context("interpreter connection lost")?;
                Ok(true)
            }
            Err(TryRecvError::Empty) => Ok(false),
            Err(TryRecvError::Disconnected) => bail!("interpreter connection closed"),
        }
    }

    /// Send everything the workspace queued.
    pub fn flush(&mut self) -> Result<()> {
        for msg in self.app.ws_mut().take_outbox() {
            self.transport
                .send(&msg)
                .with_context(|| format!("failed to send {}", msg.command))?;
        }
        Ok(())
    }

    /// Draw one frame.
    pub fn render(&mut self) -> Result<()> {
        let app = &mut self.app;
        self.terminal.draw(|f| app.render(f))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyMap;
    use crate::error::ClientError;
    use crate::protocol::Message;
    use crate::tui::workspace::Workspace;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use tokio::sync::mpsc;

    #[derive(Debug, Default)]
    struct Recorder {
        sent: Vec<Message>,
    }

    impl Transport for Recorder {
        fn send(&mut self, msg: &Message) -> Result<(), ClientError> {
            self.sent.push(msg.clone());
            Ok(())
        }
    }

    fn runner() -> (Runner<TestBackend, Recorder>, mpsc::UnboundedSender<Inbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(Workspace::new(KeyMap::defaults(), None), Rect::new(0, 0, 60, 12));
        let terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        (Runner::new(app, terminal, Recorder::default(), rx), tx)
    }

    fn msg(json: &str) -> Inbound {
        Inbound::Message(Message::from_payload(json.as_bytes()).unwrap())
    }

    fn screen(runner: &Runner<TestBackend, Recorder>) -> String {
        let buffer = runner.terminal().backend().buffer();
        let area = buffer.area;
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_inbound_applied_in_order_and_rendered() {
        let (mut runner, tx) = runner();
        tx.send(msg(r#"["AppendSessionOutput",{"result":"first\n","type":1}]"#)).unwrap();
        tx.send(msg(r#"["AppendSessionOutput",{"result":"second\n","type":1}]"#)).unwrap();
        assert!(runner.process_inbound().unwrap());
        runner.render().unwrap();
        assert!(screen(&runner).contains("first"));
        assert!(!screen(&runner).contains("second"));

        assert!(runner.process_inbound().unwrap());
        assert!(!runner.process_inbound().unwrap());
        runner.render().unwrap();

        let text = screen(&runner);
        let first = text.find("first").unwrap();
        let second = text.find("second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_flush_sends_outbox() {
        let (mut runner, _tx) = runner();
        for ch in "1+1".chars() {
            runner.handle_terminal_event(&event::Event::Key(event::KeyEvent::new(
                event::KeyCode::Char(ch),
                event::KeyModifiers::NONE,
            )));
        }
        runner.handle_terminal_event(&event::Event::Key(event::KeyEvent::new(
            event::KeyCode::Enter,
            event::KeyModifiers::NONE,
        )));
        runner.flush().unwrap();
        assert_eq!(runner.transport().sent.len(), 1);
        assert_eq!(runner.transport().sent[0].command, "Execute");
        assert!(runner.app().ws().outbox().is_empty());
    }

    #[test]
    fn test_closed_channel_is_error() {
        let (mut runner, tx) = runner();
        drop(tx);
        assert!(runner.process_inbound().is_err());
    }

    #[test]
    fn test_disconnect_item_is_error() {
        let (mut runner, tx) = runner();
        tx.send(Inbound::Disconnected(ClientError::Connection("reset".into())))
            .unwrap();
        assert!(runner.process_inbound().is_err());
    }
}
