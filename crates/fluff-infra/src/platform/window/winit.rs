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

//! A `winit` + `softbuffer` implementation of the [`Surface`] trait.
//!
//! The event loop is pumped, never run: each frame polls whatever the
//! platform queued with a zero timeout and returns, so the frame loop stays
//! in charge of the thread. winit allows a single event loop per process,
//! so it lives as long as the [`WinitSurface`] and survives close/create
//! cycles; only the window and its presentation buffer are recreated.

use crate::graphics::Rasterizer;
use crate::platform::input::translate_winit_event;
use crate::platform::pacer::FramePacer;
use fluff_core::event::RawEvent;
use fluff_core::graphics::DrawCommand;
use fluff_core::platform::{StyleFlags, Surface, SurfaceError, SurfaceSettings};
use softbuffer::{Context, Surface as SoftSurface};
use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop, OwnedDisplayHandle};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowButtons, WindowId};

/// Pumps allowed for the platform to hand us an active event loop.
const CREATE_ATTEMPTS: usize = 10;

/// Refresh rate assumed for vsync pacing when the monitor does not report one.
const FALLBACK_REFRESH_HZ: u32 = 60;

/// An open window and its presentation buffer.
///
/// Fields drop in declaration order: the buffer goes before the context,
/// the context before the window.
struct OpenWindow {
    surface: SoftSurface<OwnedDisplayHandle, Arc<Window>>,
    _context: Context<OwnedDisplayHandle>,
    window: Arc<Window>,
}

/// The `ApplicationHandler` handed to each pump.
///
/// Creates the pending window as soon as the loop is active, and queues
/// translated events that belong to the current window.
struct PumpHandler<'a> {
    pending_window: Option<WindowAttributes>,
    created: Option<Result<OpenWindow, SurfaceError>>,
    window_id: Option<WindowId>,
    events: &'a mut VecDeque<RawEvent>,
    key_repeat: bool,
}

impl PumpHandler<'_> {
    fn try_create(&mut self, event_loop: &ActiveEventLoop) {
        let Some(attributes) = self.pending_window.take() else {
            return;
        };
        let result = open_window(event_loop, attributes);
        if let Ok(open) = &result {
            self.window_id = Some(open.window.id());
        }
        self.created = Some(result);
    }
}

impl ApplicationHandler for PumpHandler<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.try_create(event_loop);
    }

    // `resumed` only fires once per event loop; later windows are created here.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.try_create(event_loop);
    }

    fn window_event(&mut self, _: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window_id != Some(id) {
            return;
        }
        if let Some(raw) = translate_winit_event(&event, self.key_repeat) {
            self.events.push_back(raw);
        }
    }
}

fn open_window(
    event_loop: &ActiveEventLoop,
    attributes: WindowAttributes,
) -> Result<OpenWindow, SurfaceError> {
    let window = event_loop
        .create_window(attributes)
        .map_err(|e| SurfaceError::Creation(e.to_string()))?;
    let window = Arc::new(window);

    let context = Context::new(event_loop.owned_display_handle())
        .map_err(|e| SurfaceError::Creation(format!("softbuffer context: {e}")))?;
    let surface = SoftSurface::new(&context, window.clone())
        .map_err(|e| SurfaceError::Creation(format!("softbuffer surface: {e}")))?;

    Ok(OpenWindow {
        surface,
        _context: context,
        window,
    })
}

/// (Internal) Builds the window attributes for a set of surface settings.
fn window_attributes(settings: &SurfaceSettings) -> WindowAttributes {
    let style = settings.style;
    let mut buttons = WindowButtons::all();
    if !style.contains(StyleFlags::CLOSE) {
        buttons.remove(WindowButtons::CLOSE);
    }

    let mut attributes = Window::default_attributes()
        .with_title(settings.title.clone())
        .with_inner_size(PhysicalSize::new(settings.width, settings.height))
        .with_resizable(style.contains(StyleFlags::RESIZE))
        .with_decorations(style.contains(StyleFlags::TITLEBAR))
        .with_enabled_buttons(buttons)
        .with_visible(true);
    if style.contains(StyleFlags::FULLSCREEN) {
        attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    attributes
}

/// (Internal) The frame cap the pacer should enforce.
///
/// An explicit limit wins; otherwise vsync paces at the monitor's refresh
/// rate, since softbuffer has no swap interval to wait on.
fn pacing_fps(frame_limit: u32, vsync: bool, refresh_hz: Option<u32>) -> u32 {
    if frame_limit > 0 {
        frame_limit
    } else if vsync {
        refresh_hz.filter(|hz| *hz > 0).unwrap_or(FALLBACK_REFRESH_HZ)
    } else {
        0
    }
}

/// A desktop window presented through `softbuffer`.
pub struct WinitSurface {
    window: Option<OpenWindow>,
    event_loop: EventLoop<()>,
    pending: VecDeque<RawEvent>,
    pumped: bool,
    key_repeat: bool,
    vsync: bool,
    frame_limit: u32,
    size: (u32, u32),
    pacer: FramePacer,
    raster: Rasterizer,
}

impl WinitSurface {
    /// Creates the process's event loop. No window is opened yet.
    ///
    /// # Errors
    /// Fails if the platform refuses the event loop, including when one
    /// already exists in this process.
    pub fn new() -> Result<Self, SurfaceError> {
        let event_loop = EventLoop::new().map_err(|e| SurfaceError::Creation(e.to_string()))?;
        Ok(Self {
            window: None,
            event_loop,
            pending: VecDeque::new(),
            pumped: false,
            key_repeat: true,
            vsync: false,
            frame_limit: 0,
            size: (0, 0),
            pacer: FramePacer::new(),
            raster: Rasterizer::new(),
        })
    }

    fn pump(&mut self) {
        let mut handler = PumpHandler {
            pending_window: None,
            created: None,
            window_id: self.window.as_ref().map(|open| open.window.id()),
            events: &mut self.pending,
            key_repeat: self.key_repeat,
        };
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut handler);
        if let PumpStatus::Exit(code) = status {
            log::warn!("Event loop exited with code {code}; treating it as a close request.");
            self.pending.push_back(RawEvent::CloseRequested);
        }
    }

    fn apply_pacing(&mut self) {
        let refresh_hz = self
            .window
            .as_ref()
            .and_then(|open| open.window.current_monitor())
            .and_then(|monitor| monitor.refresh_rate_millihertz())
            .map(|mhz| mhz / 1000);
        let fps = pacing_fps(self.frame_limit, self.vsync, refresh_hz);
        log::debug!("Frame pacing set to {fps} fps (0 = uncapped).");
        self.pacer.set_frame_rate_limit(fps);
    }
}

impl Surface for WinitSurface {
    fn create(&mut self, settings: &SurfaceSettings) -> Result<(), SurfaceError> {
        if self.window.is_some() {
            self.close();
        }
        if settings.antialiasing > 0 {
            log::debug!(
                "Antialiasing level {} requested; text is always antialiased.",
                settings.antialiasing
            );
        }

        let mut handler = PumpHandler {
            pending_window: Some(window_attributes(settings)),
            created: None,
            window_id: None,
            events: &mut self.pending,
            key_repeat: self.key_repeat,
        };
        for _ in 0..CREATE_ATTEMPTS {
            self.event_loop
                .pump_app_events(Some(Duration::from_millis(10)), &mut handler);
            if handler.created.is_some() {
                break;
            }
        }
        let created = handler.created.take();
        let mut open = created.unwrap_or_else(|| {
            Err(SurfaceError::Creation(
                "the event loop never became active".to_string(),
            ))
        })?;

        let size = open.window.inner_size();
        if let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
            open.surface
                .resize(w, h)
                .map_err(|e| SurfaceError::Creation(format!("softbuffer resize: {e}")))?;
        }

        log::info!(
            "Surface '{}' created ({}x{}).",
            settings.title,
            size.width,
            size.height
        );
        self.size = (size.width, size.height);
        self.window = Some(open);
        self.pumped = false;
        self.apply_pacing();
        self.pacer.restart();
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.window.is_some()
    }

    fn close(&mut self) {
        if self.window.take().is_some() {
            log::info!("Surface closed.");
        }
        self.pending.clear();
    }

    fn set_key_repeat(&mut self, enabled: bool) {
        self.key_repeat = enabled;
    }

    fn set_vertical_sync(&mut self, enabled: bool) {
        self.vsync = enabled;
        self.apply_pacing();
    }

    fn set_frame_rate_limit(&mut self, fps: u32) {
        self.frame_limit = fps;
        self.apply_pacing();
    }

    fn poll_event(&mut self) -> Option<RawEvent> {
        if self.pending.is_empty() && !self.pumped && self.window.is_some() {
            self.pump();
            self.pumped = true;
        }
        let event = self.pending.pop_front()?;
        if let RawEvent::Resized { width, height } = event {
            self.size = (width, height);
        }
        Some(event)
    }

    fn width(&self) -> u32 {
        self.size.0
    }

    fn height(&self) -> u32 {
        self.size.1
    }

    fn set_size(&mut self, width: u32, height: u32) {
        let Some(open) = &self.window else {
            return;
        };
        if let Some(applied) = open
            .window
            .request_inner_size(PhysicalSize::new(width, height))
        {
            self.size = (applied.width, applied.height);
        }
    }

    fn set_title(&mut self, title: &str) {
        if let Some(open) = &self.window {
            open.window.set_title(title);
        }
    }

    fn submit(&mut self, commands: &[DrawCommand]) -> Result<(), SurfaceError> {
        if self.window.is_none() {
            return Err(SurfaceError::NotOpen);
        }
        let (width, height) = self.size;
        if width == 0 || height == 0 {
            // Minimized; nothing to draw into.
            return Ok(());
        }
        self.raster
            .render(width, height, commands)
            .map_err(|e| SurfaceError::Present(e.to_string()))
    }

    fn display(&mut self) -> Result<(), SurfaceError> {
        let Some(open) = self.window.as_mut() else {
            return Err(SurfaceError::NotOpen);
        };

        let (width, height) = self.size;
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            open.surface
                .resize(w, h)
                .map_err(|e| SurfaceError::Present(e.to_string()))?;
            let mut buffer = open
                .surface
                .buffer_mut()
                .map_err(|e| SurfaceError::Present(e.to_string()))?;
            self.raster.copy_to_xrgb(&mut buffer);
            open.window.pre_present_notify();
            buffer
                .present()
                .map_err(|e| SurfaceError::Present(e.to_string()))?;
        }

        self.pumped = false;
        self.pacer.end_frame();
        Ok(())
    }

    fn frame_time(&self) -> f32 {
        self.pacer.frame_time_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::Size;

    fn settings(style: StyleFlags) -> SurfaceSettings {
        SurfaceSettings {
            width: 320,
            height: 240,
            color_depth: 32,
            title: "test".into(),
            style,
            antialiasing: 0,
        }
    }

    #[test]
    fn windowed_attributes() {
        let attributes = window_attributes(&settings(StyleFlags::WINDOWED));
        assert_eq!(attributes.title, "test");
        assert!(attributes.decorations);
        assert!(!attributes.resizable);
        assert!(attributes.fullscreen.is_none());
        assert!(attributes.enabled_buttons.contains(WindowButtons::CLOSE));
        assert_eq!(
            attributes.inner_size,
            Some(Size::Physical(PhysicalSize::new(320, 240)))
        );
    }

    #[test]
    fn fullscreen_attributes() {
        let attributes = window_attributes(&settings(StyleFlags::FULLSCREEN));
        assert!(attributes.fullscreen.is_some());
        assert!(!attributes.decorations);
        assert!(!attributes.enabled_buttons.contains(WindowButtons::CLOSE));
    }

    #[test]
    fn pacing_prefers_explicit_limit() {
        assert_eq!(pacing_fps(30, true, Some(144)), 30);
        assert_eq!(pacing_fps(0, true, Some(144)), 144);
        assert_eq!(pacing_fps(0, true, None), FALLBACK_REFRESH_HZ);
        assert_eq!(pacing_fps(0, false, Some(144)), 0);
    }
}
