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

//! Translation from `winit` window events to the runtime's [`RawEvent`].
//!
//! This is the only place that knows winit's key and button enums; the rest
//! of the runtime works with the closed key space of `fluff-core`.

use fluff_core::event::RawEvent;
use fluff_core::input::{Key, MouseButton};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Translates a `winit::event::WindowEvent` into a [`RawEvent`].
///
/// Returns `None` for events that must not reach the dispatcher at all:
/// keys and buttons outside the tracked space, zero wheel deltas, and key
/// repeats when `key_repeat` is off. Other window events the runtime does not
/// react to become [`RawEvent::Unhandled`].
pub fn translate_winit_event(event: &WindowEvent, key_repeat: bool) -> Option<RawEvent> {
    match event {
        WindowEvent::KeyboardInput {
            event: key_event, ..
        } => {
            if key_event.repeat && !key_repeat {
                return None;
            }
            let PhysicalKey::Code(code) = key_event.physical_key else {
                return None;
            };
            let key = map_keycode(code)?;
            Some(RawEvent::Key {
                key,
                pressed: key_event.state == ElementState::Pressed,
            })
        }
        WindowEvent::MouseInput { state, button, .. } => Some(RawEvent::Button {
            button: map_mouse_button(*button)?,
            pressed: *state == ElementState::Pressed,
        }),
        WindowEvent::CursorMoved { position, .. } => Some(RawEvent::PointerMoved {
            x: position.x.round() as i32,
            y: position.y.round() as i32,
        }),
        WindowEvent::MouseWheel { delta, .. } => {
            let delta = wheel_steps(*delta);
            (delta != 0).then_some(RawEvent::Wheel { delta })
        }
        WindowEvent::CursorEntered { .. } => Some(RawEvent::PointerCrossing { entered: true }),
        WindowEvent::CursorLeft { .. } => Some(RawEvent::PointerCrossing { entered: false }),
        WindowEvent::Focused(gained) => Some(RawEvent::Focus { gained: *gained }),
        WindowEvent::CloseRequested => Some(RawEvent::CloseRequested),
        WindowEvent::Resized(size) => Some(RawEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        _ => Some(RawEvent::Unhandled),
    }
}

// --- Private Helper Functions ---

/// (Internal) Converts a vertical wheel delta into whole steps.
///
/// Line deltas are rounded; anything that rounds to zero but still moved
/// counts as one step. Pixel deltas only carry a direction.
fn wheel_steps(delta: MouseScrollDelta) -> i32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => {
            let steps = y.round() as i32;
            if steps == 0 && y != 0.0 {
                y.signum() as i32
            } else {
                steps
            }
        }
        MouseScrollDelta::PixelDelta(pos) if pos.y != 0.0 => pos.y.signum() as i32,
        MouseScrollDelta::PixelDelta(_) => 0,
    }
}

/// (Internal) Maps a `winit::event::MouseButton` to a tracked button.
fn map_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        WinitMouseButton::Back => Some(MouseButton::Back),
        WinitMouseButton::Forward => Some(MouseButton::Forward),
        WinitMouseButton::Other(_) => None,
    }
}

/// (Internal) Maps a physical `winit::keyboard::KeyCode` to a tracked key.
fn map_keycode(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::Digit0 => Key::Num0,
        KeyCode::Digit1 => Key::Num1,
        KeyCode::Digit2 => Key::Num2,
        KeyCode::Digit3 => Key::Num3,
        KeyCode::Digit4 => Key::Num4,
        KeyCode::Digit5 => Key::Num5,
        KeyCode::Digit6 => Key::Num6,
        KeyCode::Digit7 => Key::Num7,
        KeyCode::Digit8 => Key::Num8,
        KeyCode::Digit9 => Key::Num9,
        KeyCode::Escape => Key::Escape,
        KeyCode::ControlLeft => Key::LControl,
        KeyCode::ShiftLeft => Key::LShift,
        KeyCode::AltLeft => Key::LAlt,
        KeyCode::SuperLeft => Key::LSystem,
        KeyCode::ControlRight => Key::RControl,
        KeyCode::ShiftRight => Key::RShift,
        KeyCode::AltRight => Key::RAlt,
        KeyCode::SuperRight => Key::RSystem,
        KeyCode::ContextMenu => Key::Menu,
        KeyCode::BracketLeft => Key::LBracket,
        KeyCode::BracketRight => Key::RBracket,
        KeyCode::Semicolon => Key::SemiColon,
        KeyCode::Comma => Key::Comma,
        KeyCode::Period => Key::Period,
        KeyCode::Quote => Key::Quote,
        KeyCode::Slash => Key::Slash,
        KeyCode::Backslash => Key::BackSlash,
        KeyCode::Backquote => Key::Tilde,
        KeyCode::Equal => Key::Equal,
        KeyCode::Minus => Key::Dash,
        KeyCode::Space => Key::Space,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Return,
        KeyCode::Backspace => Key::Back,
        KeyCode::Tab => Key::Tab,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::End => Key::End,
        KeyCode::Home => Key::Home,
        KeyCode::Insert => Key::Insert,
        KeyCode::Delete => Key::Delete,
        KeyCode::NumpadAdd => Key::Add,
        KeyCode::NumpadSubtract => Key::Subtract,
        KeyCode::NumpadMultiply => Key::Multiply,
        KeyCode::NumpadDivide => Key::Divide,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::Numpad0 => Key::Numpad0,
        KeyCode::Numpad1 => Key::Numpad1,
        KeyCode::Numpad2 => Key::Numpad2,
        KeyCode::Numpad3 => Key::Numpad3,
        KeyCode::Numpad4 => Key::Numpad4,
        KeyCode::Numpad5 => Key::Numpad5,
        KeyCode::Numpad6 => Key::Numpad6,
        KeyCode::Numpad7 => Key::Numpad7,
        KeyCode::Numpad8 => Key::Numpad8,
        KeyCode::Numpad9 => Key::Numpad9,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        KeyCode::F13 => Key::F13,
        KeyCode::F14 => Key::F14,
        KeyCode::F15 => Key::F15,
        KeyCode::Pause => Key::Pause,
        _ => return None,
    };
    Some(key)
}

// --- Unit Tests for Input Translation ---
#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::{PhysicalPosition, PhysicalSize};
    use winit::event::{DeviceId, TouchPhase};

    #[test]
    fn test_map_keycode() {
        assert_eq!(map_keycode(KeyCode::KeyA), Some(Key::A));
        assert_eq!(map_keycode(KeyCode::Digit1), Some(Key::Num1));
        assert_eq!(map_keycode(KeyCode::ControlRight), Some(Key::RControl));
        assert_eq!(map_keycode(KeyCode::F5), Some(Key::F5));
        assert_eq!(map_keycode(KeyCode::F24), None);
    }

    #[test]
    fn test_map_mouse_button() {
        assert_eq!(map_mouse_button(WinitMouseButton::Left), Some(MouseButton::Left));
        assert_eq!(
            map_mouse_button(WinitMouseButton::Forward),
            Some(MouseButton::Forward)
        );
        assert_eq!(map_mouse_button(WinitMouseButton::Other(8)), None);
    }

    #[test]
    fn test_translate_mouse_button() {
        let event = WindowEvent::MouseInput {
            device_id: DeviceId::dummy(),
            state: ElementState::Released,
            button: WinitMouseButton::Right,
        };
        assert_eq!(
            translate_winit_event(&event, false),
            Some(RawEvent::Button {
                button: MouseButton::Right,
                pressed: false
            })
        );
    }

    #[test]
    fn test_translate_cursor_moved_rounds() {
        let event = WindowEvent::CursorMoved {
            device_id: DeviceId::dummy(),
            position: PhysicalPosition::new(100.4, 200.6),
        };
        assert_eq!(
            translate_winit_event(&event, false),
            Some(RawEvent::PointerMoved { x: 100, y: 201 })
        );
    }

    #[test]
    fn test_wheel_steps() {
        assert_eq!(wheel_steps(MouseScrollDelta::LineDelta(0.0, 2.0)), 2);
        assert_eq!(wheel_steps(MouseScrollDelta::LineDelta(0.0, -0.3)), -1);
        assert_eq!(wheel_steps(MouseScrollDelta::LineDelta(3.0, 0.0)), 0);
        assert_eq!(
            wheel_steps(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 42.0))),
            1
        );
    }

    #[test]
    fn test_zero_wheel_is_dropped() {
        let event = WindowEvent::MouseWheel {
            device_id: DeviceId::dummy(),
            delta: MouseScrollDelta::LineDelta(1.0, 0.0),
            phase: TouchPhase::Moved,
        };
        assert_eq!(translate_winit_event(&event, false), None);
    }

    #[test]
    fn test_translate_window_events() {
        assert_eq!(
            translate_winit_event(&WindowEvent::Focused(false), false),
            Some(RawEvent::Focus { gained: false })
        );
        assert_eq!(
            translate_winit_event(&WindowEvent::CloseRequested, false),
            Some(RawEvent::CloseRequested)
        );
        assert_eq!(
            translate_winit_event(
                &WindowEvent::CursorLeft {
                    device_id: DeviceId::dummy()
                },
                false
            ),
            Some(RawEvent::PointerCrossing { entered: false })
        );
        assert_eq!(
            translate_winit_event(&WindowEvent::Resized(PhysicalSize::new(10, 20)), false),
            Some(RawEvent::Resized {
                width: 10,
                height: 20
            })
        );
        assert_eq!(
            translate_winit_event(&WindowEvent::RedrawRequested, false),
            Some(RawEvent::Unhandled)
        );
    }
}
