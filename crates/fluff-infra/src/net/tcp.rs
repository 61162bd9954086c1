// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A non-blocking TCP client socket.
//!
//! Received bytes are not handed back through the multiplexer; they are
//! published as [`SocketEvent`]s on a channel (usually an
//! [`EventBus`](fluff_core::event::EventBus) sender) that game code drains.

use fluff_core::net::{Socket, SocketError, SocketStatus};
use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

const READ_CHUNK: usize = 4096;

/// What a [`TcpSocket`] reports to game code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// The connection is established.
    Connected {
        /// Label of the socket.
        label: String,
    },
    /// Bytes arrived.
    Data {
        /// Label of the socket.
        label: String,
        /// The bytes, in arrival order.
        bytes: Vec<u8>,
    },
    /// The connection is gone, closed by either side.
    Closed {
        /// Label of the socket.
        label: String,
    },
}

/// A TCP connection serviced once per tick.
#[derive(Debug)]
pub struct TcpSocket {
    label: String,
    stream: Option<TcpStream>,
    status: SocketStatus,
    outbox: Vec<u8>,
    events: flume::Sender<SocketEvent>,
}

impl TcpSocket {
    /// Connects to `addr`, waiting at most `timeout`, then switches the
    /// stream to non-blocking mode.
    ///
    /// The connect itself blocks the calling thread, so the socket is
    /// already `Connected` when this returns and never reports
    /// `Connecting`. Connect before the frame loop runs (or from another
    /// thread), never from a callback: a slow peer would stall the tick
    /// for up to `timeout`.
    pub fn connect(
        label: impl Into<String>,
        addr: SocketAddr,
        timeout: Duration,
        events: flume::Sender<SocketEvent>,
    ) -> Result<Self, SocketError> {
        let label = label.into();
        let stream = TcpStream::connect_timeout(&addr, timeout)?;
        stream.set_nonblocking(true)?;
        stream.set_nodelay(true)?;
        log::info!("Socket '{label}' connected to {addr}.");

        let socket = Self {
            label,
            stream: Some(stream),
            status: SocketStatus::Connected,
            outbox: Vec::new(),
            events,
        };
        socket.publish(SocketEvent::Connected {
            label: socket.label.clone(),
        });
        Ok(socket)
    }

    /// Label given at connect time.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Queues bytes to be written on the next [`handle`](Socket::handle).
    pub fn send(&mut self, bytes: &[u8]) {
        self.outbox.extend_from_slice(bytes);
    }

    /// Bytes queued but not yet written.
    pub fn pending_output(&self) -> usize {
        self.outbox.len()
    }

    fn publish(&self, event: SocketEvent) {
        if self.events.send(event).is_err() {
            log::trace!("Socket '{}' has no listener.", self.label);
        }
    }

    fn flush_outbox(&mut self) -> io::Result<()> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(());
        };
        while !self.outbox.is_empty() {
            match stream.write(&self.outbox) {
                Ok(0) => return Err(ErrorKind::WriteZero.into()),
                Ok(n) => {
                    self.outbox.drain(..n);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Reads everything available. Returns `false` once the peer closed.
    fn read_available(&mut self) -> io::Result<bool> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(false);
        };
        let mut received = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        let open = loop {
            match stream.read(&mut chunk) {
                Ok(0) => break false,
                Ok(n) => received.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::WouldBlock => break true,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        if !received.is_empty() {
            self.publish(SocketEvent::Data {
                label: self.label.clone(),
                bytes: received,
            });
        }
        Ok(open)
    }

    fn mark_closed(&mut self) {
        self.stream = None;
        self.outbox.clear();
        if self.status != SocketStatus::Closed {
            self.status = SocketStatus::Closed;
            self.publish(SocketEvent::Closed {
                label: self.label.clone(),
            });
        }
    }
}

impl Socket for TcpSocket {
    fn status(&self) -> SocketStatus {
        self.status
    }

    fn handle(&mut self) -> Result<(), SocketError> {
        let result = self
            .flush_outbox()
            .and_then(|()| self.read_available());
        match result {
            Ok(true) => Ok(()),
            Ok(false) => {
                log::info!("Socket '{}' closed by peer.", self.label);
                self.mark_closed();
                Ok(())
            }
            Err(e) => {
                self.mark_closed();
                Err(SocketError::Io(e))
            }
        }
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.as_ref() {
            self.status = SocketStatus::Closing;
            if let Err(e) = stream.shutdown(Shutdown::Both) {
                log::debug!("Socket '{}' shutdown: {e}", self.label);
            }
        }
        self.mark_closed();
    }
}
