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

use std::fmt;

/// Lifecycle of a socket, as seen by the multiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SocketStatus {
    /// Not connected; never serviced.
    Closed = 0,
    /// A connection attempt is in flight.
    Connecting = 1,
    /// Connected and exchanging data.
    Connected = 2,
    /// Shutting down; never serviced.
    Closing = 3,
}

impl SocketStatus {
    /// Returns `true` for statuses the multiplexer services each tick.
    pub const fn is_serviceable(self) -> bool {
        matches!(self, SocketStatus::Connecting | SocketStatus::Connected)
    }

    /// Numeric code of this status.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SocketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SocketStatus::Closed => "closed",
            SocketStatus::Connecting => "connecting",
            SocketStatus::Connected => "connected",
            SocketStatus::Closing => "closing",
        };
        f.write_str(name)
    }
}

/// Errors raised by a socket's readiness handler.
#[derive(Debug, thiserror::Error)]
pub enum SocketError {
    /// An I/O operation failed.
    #[error("socket I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The peer closed the connection.
    #[error("connection closed by peer")]
    Disconnected,
    /// Any other handler failure.
    #[error("{0}")]
    Handler(String),
}

/// A non-blocking socket owned outside the multiplexer.
///
/// `handle` is called once per tick while the socket is serviceable and must
/// never block.
pub trait Socket {
    /// Current status.
    fn status(&self) -> SocketStatus;

    /// Services pending readiness: finishes connects, reads, flushes writes.
    fn handle(&mut self) -> Result<(), SocketError>;

    /// Closes the socket. Must be safe to call in any status.
    fn close(&mut self);
}
