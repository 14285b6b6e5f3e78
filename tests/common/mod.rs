//! Loopback fake interpreter shared by the integration tests.

#![allow(dead_code, reason = "each test binary uses a subset")]

use std::net::{TcpListener, TcpStream};
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use rideterm::config::KeyMap;
use rideterm::protocol::framing::{encode_frame, FrameReader};
use rideterm::protocol::transcript::ProtocolLog;
use rideterm::protocol::{Message, ProtocolClient};
use rideterm::tui::{App, Runner, Workspace};

/// Listening socket on an ephemeral port.
pub struct FakeInterpreter {
    listener: TcpListener,
}

impl FakeInterpreter {
    pub fn bind() -> Self {
        Self {
            listener: TcpListener::bind("127.0.0.1:0").unwrap(),
        }
    }

    pub fn addr(&self) -> String {
        self.listener.local_addr().unwrap().to_string()
    }

    /// Accept one client and answer its handshake.
    pub fn accept(self) -> Peer {
        let (stream, _) = self.listener.accept().unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let mut peer = Peer {
            reader: FrameReader::new(stream.try_clone().unwrap()),
            stream,
        };
        assert_eq!(peer.recv_raw(), "SupportedProtocols=2");
        peer.send_raw("SupportedProtocols=2");
        assert_eq!(peer.recv_raw(), "UsingProtocol=2");
        peer.send_raw("UsingProtocol=2");
        peer
    }
}

/// The interpreter's end of an accepted connection.
pub struct Peer {
    stream: TcpStream,
    reader: FrameReader<TcpStream>,
}

impl Peer {
    pub fn recv_raw(&mut self) -> String {
        String::from_utf8(self.reader.next_payload().unwrap()).unwrap()
    }

    pub fn send_raw(&mut self, text: &str) {
        self.stream.write_all(&encode_frame(text.as_bytes())).unwrap();
    }

    pub fn recv(&mut self) -> Message {
        Message::from_payload(&self.reader.next_payload().unwrap()).unwrap()
    }

    /// Skip messages until one named `command` arrives.
    pub fn expect(&mut self, command: &str) -> Message {
        loop {
            let msg = self.recv();
            if msg.command == command {
                return msg;
            }
        }
    }

    /// Send a `["Command", {args}]` JSON payload.
    pub fn send(&mut self, json: &str) {
        self.send_raw(json);
    }
}

/// Connect a client to a fresh fake interpreter.
pub fn connect() -> (ProtocolClient, Peer) {
    let fake = FakeInterpreter::bind();
    let addr = fake.addr();
    let server = thread::spawn(move || fake.accept());
    let client = ProtocolClient::connect(&addr, ProtocolLog::disabled()).unwrap();
    let mut peer = server.join().unwrap();
    assert_eq!(peer.recv().command, "Identify");
    assert_eq!(peer.recv().command, "Connect");
    assert_eq!(peer.recv().command, "GetWindowLayout");
    (client, peer)
}

pub type TestRunner = Runner<TestBackend, ProtocolClient>;

/// A runner on an 80x24 test terminal wired to a fake interpreter.
pub fn runner() -> (TestRunner, Peer) {
    let (mut client, peer) = connect();
    let inbound = client.spawn_reader().unwrap();
    let app = App::new(Workspace::new(KeyMap::defaults(), None), Rect::new(0, 0, 80, 24));
    let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    (Runner::new(app, terminal, client, inbound), peer)
}

/// Apply inbound messages until `done` holds or two seconds pass.
pub fn pump_until(runner: &mut TestRunner, done: impl Fn(&App) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while !done(runner.app()) {
        assert!(Instant::now() < deadline, "timed out waiting for the interpreter");
        runner.process_inbound().unwrap();
        thread::sleep(Duration::from_millis(5));
    }
}

/// Rendered screen, one string per row.
pub fn screen(runner: &TestRunner) -> Vec<String> {
    let buffer = runner.terminal().backend().buffer();
    let area = buffer.area;
    (0..area.height)
        .map(|y| (0..area.width).map(|x| buffer[(x, y)].symbol()).collect())
        .collect()
}
