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

//! Frame loop behavior against recording collaborators.

use fluff_core::config::FaultPolicy;
use fluff_core::event::RawEvent;
use fluff_core::graphics::DrawCommand;
use fluff_core::input::{Key, MouseButton};
use fluff_core::math::LinearRgba;
use fluff_core::net::{Socket, SocketError, SocketStatus};
use fluff_core::platform::{Surface, SurfaceError, SurfaceSettings};
use fluff_core::script::{Callback, CallbackError};
use fluff_core::GameConfig;
use fluff_sdk::{CallbackTable, FrameLoop, LoopError, LoopPhase};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

fn position(log: &[String], entry: &str) -> usize {
    log.iter()
        .position(|e| e == entry)
        .unwrap_or_else(|| panic!("'{entry}' missing from {log:?}"))
}

/// A surface that replays one batch of events per frame and records every call.
struct RecordingSurface {
    log: Log,
    batches: VecDeque<Vec<RawEvent>>,
    current: VecDeque<RawEvent>,
    open: bool,
    fail_create: bool,
    fail_submit: bool,
    submitted: Vec<Vec<DrawCommand>>,
}

impl RecordingSurface {
    fn new(log: &Log, batches: Vec<Vec<RawEvent>>) -> Self {
        Self {
            log: Rc::clone(log),
            batches: batches.into(),
            current: VecDeque::new(),
            open: false,
            fail_create: false,
            fail_submit: false,
            submitted: Vec::new(),
        }
    }

    fn record(&self, entry: impl Into<String>) {
        self.log.borrow_mut().push(entry.into());
    }

    fn next_batch(&mut self) {
        // Once the script runs out, ask to close so no test can spin forever.
        self.current = self
            .batches
            .pop_front()
            .unwrap_or_else(|| vec![RawEvent::CloseRequested])
            .into();
    }
}

impl Surface for RecordingSurface {
    fn create(&mut self, settings: &SurfaceSettings) -> Result<(), SurfaceError> {
        if self.fail_create {
            return Err(SurfaceError::Creation("no display".into()));
        }
        self.record(format!("create {}x{}", settings.width, settings.height));
        self.open = true;
        self.next_batch();
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.record("close");
        self.open = false;
    }

    fn set_key_repeat(&mut self, enabled: bool) {
        self.record(format!("key_repeat {enabled}"));
    }

    fn set_vertical_sync(&mut self, _enabled: bool) {}

    fn set_frame_rate_limit(&mut self, fps: u32) {
        self.record(format!("fps {fps}"));
    }

    fn poll_event(&mut self) -> Option<RawEvent> {
        let event = self.current.pop_front()?;
        self.record("event");
        Some(event)
    }

    fn width(&self) -> u32 {
        640
    }

    fn height(&self) -> u32 {
        480
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.record(format!("size {width}x{height}"));
    }

    fn set_title(&mut self, title: &str) {
        self.record(format!("title {title}"));
    }

    fn submit(&mut self, commands: &[DrawCommand]) -> Result<(), SurfaceError> {
        if self.fail_submit {
            return Err(SurfaceError::Present("lost device".into()));
        }
        self.submitted.push(commands.to_vec());
        Ok(())
    }

    fn display(&mut self) -> Result<(), SurfaceError> {
        self.record("display");
        self.next_batch();
        Ok(())
    }

    fn frame_time(&self) -> f32 {
        0.016
    }
}

struct RecordingSocket {
    log: Log,
    status: SocketStatus,
}

impl Socket for RecordingSocket {
    fn status(&self) -> SocketStatus {
        self.status
    }

    fn handle(&mut self) -> Result<(), SocketError> {
        self.log.borrow_mut().push("socket.handle".into());
        Ok(())
    }

    fn close(&mut self) {
        self.log.borrow_mut().push("socket.close".into());
        self.status = SocketStatus::Closed;
    }
}

/// A table where every lifecycle callback just records its name.
fn recording_table(log: &Log) -> CallbackTable {
    let mut table = CallbackTable::new();
    for callback in [
        Callback::Update,
        Callback::Draw,
        Callback::Focus,
        Callback::Blur,
        Callback::Enter,
        Callback::Leave,
        Callback::Exit,
    ] {
        let log = Rc::clone(log);
        table.on(callback, move |_, _| {
            log.borrow_mut().push(callback.name().to_string());
            Ok(())
        });
    }
    table
}

fn key(key: Key) -> RawEvent {
    RawEvent::Key { key, pressed: true }
}

#[test]
fn exit_key_runs_the_full_stopping_sequence() {
    let log = Log::default();
    let surface = RecordingSurface::new(&log, vec![vec![key(Key::Escape)]]);
    let mut frame_loop = FrameLoop::new(GameConfig::default(), surface, recording_table(&log));
    frame_loop
        .context_mut()
        .register_socket(Rc::new(RefCell::new(RecordingSocket {
            log: Rc::clone(&log),
            status: SocketStatus::Connected,
        })));

    let outcome = frame_loop.run().unwrap();
    assert_eq!(outcome.frames, 1);
    assert!(!outcome.reload_requested);
    assert_eq!(frame_loop.phase(), LoopPhase::Stopped);

    let log = entries(&log);
    // The tick that saw the exit key still completes.
    assert!(position(&log, "onUpdate") < position(&log, "onDraw"));
    assert!(position(&log, "onDraw") < position(&log, "display"));
    assert!(position(&log, "socket.handle") < position(&log, "onUpdate"));
    // Shutdown order.
    assert!(position(&log, "display") < position(&log, "socket.close"));
    assert!(position(&log, "socket.close") < position(&log, "onExit"));
    assert!(position(&log, "onExit") < position(&log, "close"));
}

#[test]
fn close_request_stops_the_loop() {
    let log = Log::default();
    let surface = RecordingSurface::new(&log, vec![vec![], vec![RawEvent::CloseRequested]]);
    let mut frame_loop = FrameLoop::new(GameConfig::default(), surface, recording_table(&log));

    let outcome = frame_loop.run().unwrap();
    assert_eq!(outcome.frames, 2);
    let log = entries(&log);
    assert!(position(&log, "onExit") < position(&log, "close"));
}

#[test]
fn start_configures_the_surface() {
    let log = Log::default();
    let config = GameConfig {
        width: 320,
        height: 200,
        fps: 30,
        ..GameConfig::default()
    };
    let surface = RecordingSurface::new(&log, vec![]);
    let mut frame_loop = FrameLoop::new(config, surface, CallbackTable::new());
    frame_loop.start().unwrap();

    assert_eq!(frame_loop.phase(), LoopPhase::Running);
    assert!(frame_loop.context().run.running);
    assert!(frame_loop.context().run.has_focus);
    assert_eq!(
        entries(&log),
        ["create 320x200", "key_repeat false", "fps 30"]
    );
}

#[test]
fn reload_key_is_reported_to_the_host() {
    let log = Log::default();
    let surface = RecordingSurface::new(&log, vec![vec![key(Key::F5)]]);
    let mut frame_loop = FrameLoop::new(GameConfig::default(), surface, CallbackTable::new());

    let outcome = frame_loop.run().unwrap();
    assert!(outcome.reload_requested);
    assert_eq!(outcome.frames, 1);
}

#[test]
fn a_burst_of_events_is_applied_before_update() {
    let log = Log::default();
    let burst = vec![
        key(Key::A),
        key(Key::LShift),
        RawEvent::Button {
            button: MouseButton::Left,
            pressed: true,
        },
        RawEvent::PointerMoved { x: 12, y: 34 },
        RawEvent::Wheel { delta: -2 },
    ];
    let surface = RecordingSurface::new(&log, vec![burst]);

    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let mut table = CallbackTable::new();
    table.on_update(move |_, ctx| {
        *sink.borrow_mut() = Some((
            ctx.input.keys_down().collect::<Vec<_>>(),
            ctx.input.modifiers().shift,
            ctx.input.is_button_down(MouseButton::Left),
            ctx.pointer,
        ));
        ctx.request_exit();
        Ok(())
    });

    let mut frame_loop = FrameLoop::new(GameConfig::default(), surface, table);
    frame_loop.run().unwrap();

    let log = entries(&log);
    let events_before_first_display = log
        .iter()
        .take_while(|e| *e != "display")
        .filter(|e| *e == "event")
        .count();
    assert_eq!(events_before_first_display, 5);

    let (keys, shift, left, pointer) = seen.borrow().clone().unwrap();
    assert_eq!(keys, vec![Key::A, Key::LShift]);
    assert!(shift);
    assert!(left);
    assert_eq!((pointer.x, pointer.y, pointer.scroll_delta), (12, 34, -2));
}

#[test]
fn focus_and_pointer_callbacks_fire_during_the_drain() {
    let log = Log::default();
    let surface = RecordingSurface::new(
        &log,
        vec![vec![
            RawEvent::Focus { gained: false },
            RawEvent::Focus { gained: true },
            RawEvent::PointerCrossing { entered: true },
            RawEvent::PointerCrossing { entered: false },
            RawEvent::CloseRequested,
        ]],
    );
    let mut frame_loop = FrameLoop::new(GameConfig::default(), surface, recording_table(&log));
    frame_loop.run().unwrap();

    let log = entries(&log);
    let callbacks: Vec<&str> = log
        .iter()
        .map(String::as_str)
        .filter(|e| e.starts_with("on"))
        .collect();
    assert_eq!(
        callbacks,
        ["onBlur", "onFocus", "onEnter", "onLeave", "onUpdate", "onDraw", "onExit"]
    );
}

#[test]
fn missing_callbacks_are_skipped() {
    let log = Log::default();
    let surface = RecordingSurface::new(&log, vec![vec![RawEvent::Focus { gained: false }], vec![]]);
    let mut frame_loop = FrameLoop::new(GameConfig::default(), surface, CallbackTable::new());

    let outcome = frame_loop.run().unwrap();
    assert_eq!(outcome.frames, 3);
}

#[test]
fn update_receives_the_frame_time() {
    let log = Log::default();
    let surface = RecordingSurface::new(&log, vec![vec![RawEvent::CloseRequested]]);
    let seen = Rc::new(RefCell::new(0.0));
    let sink = Rc::clone(&seen);
    let mut table = CallbackTable::new();
    table.on_update(move |dt, _| {
        *sink.borrow_mut() = dt;
        Ok(())
    });

    FrameLoop::new(GameConfig::default(), surface, table)
        .run()
        .unwrap();
    approx::assert_relative_eq!(*seen.borrow(), 0.016, epsilon = 1e-6);
}

#[test]
fn frames_start_with_a_clear_and_apply_requests() {
    let log = Log::default();
    let config = GameConfig {
        clear_color: [0.0, 0.0, 1.0, 1.0],
        ..GameConfig::default()
    };
    let surface = RecordingSurface::new(&log, vec![vec![RawEvent::CloseRequested]]);
    let mut table = CallbackTable::new();
    table.on(Callback::Draw, |_, ctx| {
        ctx.set_caption("hello");
        ctx.set_size(100, 80);
        // No font loaded: nothing is recorded.
        assert!(!ctx.draw_text("x", "missing.ttf", 0, 0, 12));
        Ok(())
    });

    let mut frame_loop = FrameLoop::new(config, surface, table);
    frame_loop.run().unwrap();
    let (surface, _) = frame_loop.into_parts();

    // One clear when starting, then the single frame.
    let blue = DrawCommand::Clear(LinearRgba::rgb(0.0, 0.0, 1.0));
    assert_eq!(surface.submitted, vec![vec![blue.clone()], vec![blue]]);
    let log = entries(&log);
    assert!(position(&log, "title hello") < position(&log, "display"));
    assert!(position(&log, "size 100x80") < position(&log, "display"));
}

#[test]
fn surface_failure_is_fatal_before_running() {
    let log = Log::default();
    let mut surface = RecordingSurface::new(&log, vec![]);
    surface.fail_create = true;
    let mut frame_loop = FrameLoop::new(GameConfig::default(), surface, recording_table(&log));

    let err = frame_loop.run().unwrap_err();
    assert!(matches!(err, LoopError::Surface(_)));
    assert_eq!(frame_loop.phase(), LoopPhase::Stopped);
    assert!(entries(&log).is_empty(), "no callback may run");
}

#[test]
fn failed_initial_clear_releases_the_surface() {
    let log = Log::default();
    let mut surface = RecordingSurface::new(&log, vec![]);
    surface.fail_submit = true;
    let mut frame_loop = FrameLoop::new(GameConfig::default(), surface, recording_table(&log));

    let err = frame_loop.run().unwrap_err();
    assert!(matches!(err, LoopError::Surface(SurfaceError::Present(_))));
    assert_eq!(frame_loop.phase(), LoopPhase::Stopped);
    assert!(!frame_loop.surface().is_open());

    let log = entries(&log);
    assert!(position(&log, "create 640x480") < position(&log, "close"));
    assert!(!log.iter().any(|e| e == "onUpdate" || e == "onExit"));
}

#[test]
fn starting_reopens_a_surface_that_is_already_open() {
    let log = Log::default();
    let mut surface = RecordingSurface::new(&log, vec![]);
    surface.open = true;
    let mut frame_loop = FrameLoop::new(GameConfig::default(), surface, recording_table(&log));

    frame_loop.start().unwrap();
    assert_eq!(frame_loop.phase(), LoopPhase::Running);
    assert!(frame_loop.surface().is_open());

    let log = entries(&log);
    assert_eq!(&log[..2], ["close", "create 640x480"]);
}

fn failing_update(log: &Log) -> CallbackTable {
    let mut table = recording_table(log);
    table.on_update(|_, _| Err(CallbackError::Script("update exploded".into())));
    table
}

#[test]
fn propagated_fault_releases_the_surface() {
    let log = Log::default();
    let surface = RecordingSurface::new(&log, vec![vec![]]);
    let mut frame_loop = FrameLoop::new(GameConfig::default(), surface, failing_update(&log));

    let err = frame_loop.run().unwrap_err();
    assert!(matches!(err, LoopError::Callback { name: "onUpdate", .. }));
    assert_eq!(frame_loop.phase(), LoopPhase::Stopped);

    let log = entries(&log);
    assert!(log.contains(&"close".to_string()));
    assert!(!log.contains(&"onDraw".to_string()));
    assert!(!log.contains(&"onExit".to_string()));
}

#[test]
fn log_and_continue_keeps_ticking() {
    let log = Log::default();
    let config = GameConfig {
        fault_policy: FaultPolicy::LogAndContinue,
        ..GameConfig::default()
    };
    let surface = RecordingSurface::new(&log, vec![vec![], vec![RawEvent::CloseRequested]]);
    let mut frame_loop = FrameLoop::new(config, surface, failing_update(&log));

    let outcome = frame_loop.run().unwrap();
    assert_eq!(outcome.frames, 2);
    let draws = entries(&log).iter().filter(|e| *e == "onDraw").count();
    assert_eq!(draws, 2);
}

#[test]
fn log_and_stop_runs_the_normal_shutdown() {
    let log = Log::default();
    let config = GameConfig {
        fault_policy: FaultPolicy::LogAndStop,
        ..GameConfig::default()
    };
    let surface = RecordingSurface::new(&log, vec![vec![], vec![]]);
    let mut frame_loop = FrameLoop::new(config, surface, failing_update(&log));

    let outcome = frame_loop.run().unwrap();
    assert_eq!(outcome.frames, 1);
    let log = entries(&log);
    assert!(position(&log, "onDraw") < position(&log, "onExit"));
    assert!(position(&log, "onExit") < position(&log, "close"));
}

#[test]
fn ticking_outside_running_is_rejected() {
    let log = Log::default();
    let surface = RecordingSurface::new(&log, vec![]);
    let mut frame_loop = FrameLoop::new(GameConfig::default(), surface, CallbackTable::new());

    let err = frame_loop.tick().unwrap_err();
    assert!(matches!(
        err,
        LoopError::InvalidPhase {
            expected: LoopPhase::Running,
            actual: LoopPhase::Starting
        }
    ));
}
