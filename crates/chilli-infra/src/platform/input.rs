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

//! Bridge from the `winit` message pump to the engine's event bus.
//!
//! This is the one place outside the frame loop that feeds the bus: native
//! window events are translated into [`EngineEvent`]s and queued through an
//! [`EventSender`] for the next drain.

use chilli_core::{EngineEvent, EventSender, MouseButton};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Translates a `winit::event::WindowEvent` into an [`EngineEvent`].
///
/// Returns `None` for events the engine has no use for (focus changes,
/// redraw requests, key repeats, zero-length scrolls...).
pub fn translate_window_event(event: &WindowEvent) -> Option<EngineEvent> {
    match event {
        WindowEvent::Resized(size) => Some(EngineEvent::WindowResized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::CloseRequested => Some(EngineEvent::WindowClosed),
        WindowEvent::KeyboardInput {
            event: key_event, ..
        } => {
            let PhysicalKey::Code(keycode) = key_event.physical_key else {
                return None;
            };
            let key_code = map_keycode_to_string(keycode);
            match key_event.state {
                ElementState::Pressed if !key_event.repeat => {
                    Some(EngineEvent::KeyPressed { key_code })
                }
                ElementState::Released => Some(EngineEvent::KeyReleased { key_code }),
                _ => None,
            }
        }
        WindowEvent::CursorMoved { position, .. } => Some(EngineEvent::MouseMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),
        WindowEvent::MouseInput { state, button, .. } => {
            let button = map_mouse_button(*button);
            match state {
                ElementState::Pressed => Some(EngineEvent::MouseButtonPressed { button }),
                ElementState::Released => Some(EngineEvent::MouseButtonReleased { button }),
            }
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy): (f32, f32) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                MouseScrollDelta::PixelDelta(pos) => (pos.x as f32, pos.y as f32),
            };
            if dx != 0.0 || dy != 0.0 {
                Some(EngineEvent::MouseWheelScrolled {
                    delta_x: dx,
                    delta_y: dy,
                })
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Forwards translated window events onto an engine's event queue.
#[derive(Debug, Clone)]
pub struct WindowBridge {
    sender: EventSender,
}

impl WindowBridge {
    /// Creates a bridge feeding the bus behind `sender`.
    pub fn new(sender: EventSender) -> Self {
        Self { sender }
    }

    /// Translates and queues `event`. Returns `false` if it was ignored.
    pub fn forward(&self, event: &WindowEvent) -> bool {
        match translate_window_event(event) {
            Some(engine_event) => {
                self.sender.push(engine_event);
                true
            }
            None => false,
        }
    }
}

// --- Private Helper Functions ---

fn map_keycode_to_string(keycode: KeyCode) -> String {
    format!("{keycode:?}")
}

fn map_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(id) => MouseButton::Other(id),
    }
}
