//! Connection to the interpreter.
//!
//! # Architecture
//!
//! ```text
//! ProtocolClient::connect(addr)
//!   ├── TCP connect
//!   ├── handshake (SupportedProtocols / UsingProtocol, then Identify/Connect)
//!   └── split:
//!         writer  (TcpStream)  ── send() on the UI thread
//!         reader  (FrameReader) ─ spawn_reader() ─► "ride-reader" thread
//!                                                     │
//!                         UnboundedReceiver<Inbound> ◄┘ (FIFO, wire order)
//! ```
//!
//! The reader thread is the only code that blocks. It decodes one frame at
//! a time and forwards it; a decode failure is forwarded as
//! [`Inbound::DecodeFailed`] and the loop continues, a connection failure is
//! forwarded as [`Inbound::Disconnected`] and the thread exits. There is no
//! reconnect.

// Rust guideline compliant 2026-01

use std::io::Write;
use std::net::{Shutdown, TcpStream};
use std::thread;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::command;
use super::framing::{encode_frame, FrameReader};
use super::message::Message;
use super::transcript::{Direction, ProtocolLog};
use crate::error::ClientError;

/// What the reader thread hands to the UI loop.
#[derive(Debug)]
pub enum Inbound {
    /// A decoded application message.
    Message(Message),
    /// A frame whose payload could not be decoded. Already logged.
    DecodeFailed(ClientError),
    /// The connection is gone. Always the last item.
    Disconnected(ClientError),
}

/// Outbound half of a connection, as seen by the UI loop.
pub trait Transport {
    /// Send one application message.
    fn send(&mut self, msg: &Message) -> Result<(), ClientError>;
}

/// An established, handshaken connection.
#[derive(Debug)]
pub struct ProtocolClient {
    writer: TcpStream,
    reader: Option<FrameReader<TcpStream>>,
    log: ProtocolLog,
    peer: String,
}

/// Turn off Nagle batching. Failure is logged and otherwise ignored.
fn disable_nagle(stream: &TcpStream) {
    if let Err(err) = stream.set_nodelay(true) {
        log::debug!("[Protocol] set_nodelay failed: {err}");
    }
}

impl ProtocolClient {
    /// Connect to `addr` and complete the handshake.
    pub fn connect(addr: &str, log: ProtocolLog) -> Result<Self, ClientError> {
        log::info!("[Protocol] Connecting to {addr}");
        let stream =
            TcpStream::connect(addr).map_err(|e| ClientError::connection(&format!("connect {addr}"), &e))?;
        disable_nagle(&stream);
        let read_half = stream
            .try_clone()
            .map_err(|e| ClientError::connection("clone socket", &e))?;

        let mut client = Self {
            writer: stream,
            reader: Some(FrameReader::new(read_half)),
            log,
            peer: addr.to_string(),
        };
        client.handshake()?;
        log::info!("[Protocol] Connected to {addr}");
        Ok(client)
    }

    /// Address this client connected to.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    fn handshake(&mut self) -> Result<(), ClientError> {
        self.send_raw(&command::supported_protocols())?;
        let offered = self.recv_raw()?;
        if !offered.starts_with("SupportedProtocols=") {
            return Err(ClientError::Connection(format!(
                "unexpected handshake reply {offered:?}"
            )));
        }

        self.send_raw(&command::using_protocol())?;
        let agreed = self.recv_raw()?;
        if !agreed.starts_with("UsingProtocol=") {
            return Err(ClientError::Connection(format!(
                "unexpected handshake reply {agreed:?}"
            )));
        }

        self.send(&command::identify())?;
        self.send(&command::connect())?;
        self.send(&command::get_window_layout())?;
        Ok(())
    }

    fn send_raw(&mut self, text: &str) -> Result<(), ClientError> {
        self.log.raw(Direction::Sent, text);
        self.write_frame(text.as_bytes())
    }

    fn recv_raw(&mut self) -> Result<String, ClientError> {
        let payload = self.reader_mut()?.next_payload()?;
        let text = String::from_utf8_lossy(&payload).into_owned();
        self.log.raw(Direction::Received, &text);
        Ok(text)
    }

    fn write_frame(&mut self, payload: &[u8]) -> Result<(), ClientError> {
        self.writer
            .write_all(&encode_frame(payload))
            .and_then(|()| self.writer.flush())
            .map_err(|e| ClientError::connection("write", &e))
    }

    fn reader_mut(&mut self) -> Result<&mut FrameReader<TcpStream>, ClientError> {
        self.reader
            .as_mut()
            .ok_or_else(|| ClientError::Connection("reader already handed to background thread".into()))
    }

    /// Send one application message.
    pub fn send(&mut self, msg: &Message) -> Result<(), ClientError> {
        log::debug!("[Protocol] → {}", msg.command);
        self.log.sent(msg);
        self.write_frame(&msg.to_payload())
    }

    /// Block for the next inbound message.
    ///
    /// Only usable until [`ProtocolClient::spawn_reader`] takes the read half.
    pub fn recv(&mut self) -> Result<Message, ClientError> {
        let log = self.log.clone();
        let payload = self.reader_mut()?.next_payload()?;
        decode_payload(&log, &payload)
    }

    /// Move the read half onto a background thread.
    ///
    /// Messages arrive on the returned channel in wire order.
    pub fn spawn_reader(&mut self) -> Result<UnboundedReceiver<Inbound>, ClientError> {
        let reader = self
            .reader
            .take()
            .ok_or_else(|| ClientError::Connection("reader already spawned".into()))?;
        let (tx, rx) = mpsc::unbounded_channel();
        let log = self.log.clone();

        thread::Builder::new()
            .name("ride-reader".into())
            .spawn(move || read_loop(reader, &log, &tx))
            .map_err(|e| ClientError::connection("spawn reader", &e))?;

        Ok(rx)
    }

    /// Close both directions, unblocking the reader thread.
    pub fn shutdown(&self) {
        let _ = self.writer.shutdown(Shutdown::Both);
    }
}

impl Transport for ProtocolClient {
    fn send(&mut self, msg: &Message) -> Result<(), ClientError> {
        ProtocolClient::send(self, msg)
    }
}

fn decode_payload(log: &ProtocolLog, payload: &[u8]) -> Result<Message, ClientError> {
    let text = String::from_utf8_lossy(payload);
    log.received(&text);
    Message::from_payload(payload)
}

fn read_loop(mut reader: FrameReader<TcpStream>, log: &ProtocolLog, tx: &UnboundedSender<Inbound>) {
    log::info!("[Protocol] Reader thread started");
    loop {
        let payload = match reader.next_payload() {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("[Protocol] Reader stopping: {err}");
                let _ = tx.send(Inbound::Disconnected(err));
                return;
            }
        };

        let item = match decode_payload(log, &payload) {
            Ok(msg) => Inbound::Message(msg),
            Err(err) => {
                log::warn!("[Protocol] Dropping frame: {err}");
                Inbound::DecodeFailed(err)
            }
        };

        if tx.send(item).is_err() {
            log::info!("[Protocol] UI loop gone, reader exiting");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_disable_nagle_on_connected_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let stream = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        disable_nagle(&stream);
        assert!(stream.nodelay().unwrap());

        // A socket that is already shut down still does not panic.
        stream.shutdown(Shutdown::Both).unwrap();
        disable_nagle(&stream);
    }
}
