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

//! TCP sockets driven through the core multiplexer and event bus.

use fluff_core::event::EventBus;
use fluff_core::net::{SharedSocket, Socket, SocketMultiplexer, SocketStatus};
use fluff_infra::{SocketEvent, TcpSocket};
use std::cell::RefCell;
use std::io::Write;
use std::net::TcpListener;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

#[test]
fn multiplexer_delivers_tcp_data_on_the_bus() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let bus: EventBus<SocketEvent> = EventBus::new();

    let socket = TcpSocket::connect("server", addr, Duration::from_secs(2), bus.sender()).unwrap();
    let socket = Rc::new(RefCell::new(socket));
    let mut mux = SocketMultiplexer::new();
    let shared: SharedSocket = socket.clone();
    mux.register(shared);

    let (mut server, _) = listener.accept().unwrap();
    server.write_all(b"tick").unwrap();

    let mut data = Vec::new();
    for _ in 0..100 {
        let report = mux.poll_all();
        assert_eq!(report.faulted, 0);
        for event in bus.drain() {
            if let SocketEvent::Data { bytes, .. } = event {
                data.extend(bytes);
            }
        }
        if data.len() >= 4 {
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(data, b"tick");

    mux.close_all();
    assert_eq!(socket.borrow().status(), SocketStatus::Closed);
    assert_eq!(mux.poll_all().serviced, 0, "closed sockets are not serviced");
}
