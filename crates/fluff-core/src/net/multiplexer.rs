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

use super::{Socket, SocketStatus};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A socket shared between its owner and the multiplexer.
pub type SharedSocket = Rc<RefCell<dyn Socket>>;

/// Outcome of one [`SocketMultiplexer::poll_all`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Sockets whose handler ran and returned `Ok`.
    pub serviced: usize,
    /// Sockets not serviceable this tick.
    pub skipped: usize,
    /// Sockets whose handler failed or that were already borrowed.
    pub faulted: usize,
}

/// Services every registered socket once per tick.
///
/// The registry keeps insertion order, does not de-duplicate and never
/// removes an entry: closing is the owner's business, except at shutdown
/// where [`close_all`](Self::close_all) closes everything.
#[derive(Default)]
pub struct SocketMultiplexer {
    sockets: Vec<SharedSocket>,
}

impl SocketMultiplexer {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a socket to the registry.
    pub fn register(&mut self, socket: SharedSocket) {
        self.sockets.push(socket);
    }

    /// One best-effort pass over the registry in insertion order.
    ///
    /// Each socket that is connecting or connected has its handler called
    /// exactly once. A failing handler is logged and counted; it does not
    /// stop the pass.
    pub fn poll_all(&self) -> PollReport {
        let mut report = PollReport::default();

        for (index, socket) in self.sockets.iter().enumerate() {
            let Ok(mut socket) = socket.try_borrow_mut() else {
                log::warn!("Socket #{index} is busy; skipping it this tick.");
                report.faulted += 1;
                continue;
            };

            if !socket.status().is_serviceable() {
                report.skipped += 1;
                continue;
            }

            match socket.handle() {
                Ok(()) => report.serviced += 1,
                Err(e) => {
                    log::error!("Socket #{index} handler failed: {e}");
                    report.faulted += 1;
                }
            }
        }

        report
    }

    /// Closes every registered socket, whatever its status.
    pub fn close_all(&self) {
        log::debug!("Closing {} registered socket(s).", self.sockets.len());
        for (index, socket) in self.sockets.iter().enumerate() {
            match socket.try_borrow_mut() {
                Ok(mut socket) => socket.close(),
                Err(_) => log::warn!("Socket #{index} is busy and could not be closed."),
            }
        }
    }

    /// Status of every registered socket, in registry order.
    pub fn statuses(&self) -> Vec<SocketStatus> {
        self.sockets
            .iter()
            .map(|s| s.try_borrow().map_or(SocketStatus::Closed, |s| s.status()))
            .collect()
    }

    /// Number of registered sockets.
    pub fn len(&self) -> usize {
        self.sockets.len()
    }

    /// Returns `true` if no socket is registered.
    pub fn is_empty(&self) -> bool {
        self.sockets.is_empty()
    }
}

impl fmt::Debug for SocketMultiplexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketMultiplexer")
            .field("sockets", &self.sockets.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::SocketError;

    struct FakeSocket {
        status: SocketStatus,
        fail: bool,
        handled: usize,
        closed: usize,
    }

    impl FakeSocket {
        fn shared(status: SocketStatus) -> Rc<RefCell<FakeSocket>> {
            Rc::new(RefCell::new(FakeSocket {
                status,
                fail: false,
                handled: 0,
                closed: 0,
            }))
        }
    }

    impl Socket for FakeSocket {
        fn status(&self) -> SocketStatus {
            self.status
        }

        fn handle(&mut self) -> Result<(), SocketError> {
            self.handled += 1;
            if self.fail {
                Err(SocketError::Handler("boom".into()))
            } else {
                Ok(())
            }
        }

        fn close(&mut self) {
            self.closed += 1;
            self.status = SocketStatus::Closed;
        }
    }

    #[test]
    fn only_connecting_and_connected_are_serviced() {
        let sockets = [
            FakeSocket::shared(SocketStatus::Closed),
            FakeSocket::shared(SocketStatus::Connecting),
            FakeSocket::shared(SocketStatus::Connected),
            FakeSocket::shared(SocketStatus::Closing),
        ];
        let mut mux = SocketMultiplexer::new();
        for socket in &sockets {
            mux.register(socket.clone());
        }

        let report = mux.poll_all();
        assert_eq!(report.serviced, 2);
        assert_eq!(report.skipped, 2);

        let handled: Vec<usize> = sockets.iter().map(|s| s.borrow().handled).collect();
        assert_eq!(handled, [0, 1, 1, 0]);
    }

    #[test]
    fn a_failing_handler_does_not_stop_the_pass() {
        let bad = FakeSocket::shared(SocketStatus::Connected);
        bad.borrow_mut().fail = true;
        let good = FakeSocket::shared(SocketStatus::Connected);

        let mut mux = SocketMultiplexer::new();
        mux.register(bad.clone());
        mux.register(good.clone());

        let report = mux.poll_all();
        assert_eq!(report.faulted, 1);
        assert_eq!(report.serviced, 1);
        assert_eq!(good.borrow().handled, 1);
    }

    #[test]
    fn duplicates_are_serviced_twice() {
        let socket = FakeSocket::shared(SocketStatus::Connected);
        let mut mux = SocketMultiplexer::new();
        mux.register(socket.clone());
        mux.register(socket.clone());
        mux.poll_all();
        assert_eq!(socket.borrow().handled, 2);
        assert_eq!(mux.len(), 2);
    }

    #[test]
    fn close_all_ignores_status() {
        let closed = FakeSocket::shared(SocketStatus::Closed);
        let open = FakeSocket::shared(SocketStatus::Connected);
        let mut mux = SocketMultiplexer::new();
        mux.register(closed.clone());
        mux.register(open.clone());

        mux.close_all();
        assert_eq!(closed.borrow().closed, 1);
        assert_eq!(open.borrow().closed, 1);
        assert_eq!(mux.statuses(), [SocketStatus::Closed, SocketStatus::Closed]);
    }

    #[test]
    fn busy_socket_is_reported_not_panicked_on() {
        let socket = FakeSocket::shared(SocketStatus::Connected);
        let mut mux = SocketMultiplexer::new();
        mux.register(socket.clone());

        let _guard = socket.borrow_mut();
        let report = mux.poll_all();
        assert_eq!(report.faulted, 1);
    }

    #[test]
    fn status_codes() {
        assert_eq!(SocketStatus::Closed.code(), 0);
        assert_eq!(SocketStatus::Closing.code(), 3);
        assert!(!SocketStatus::Closed.is_serviceable());
        assert!(!SocketStatus::Closing.is_serviceable());
    }
}
