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

/// Something that happened, queued on the [`EventBus`](super::EventBus) and
/// delivered to subscribers during the next drain.
///
/// Events are plain values: the bus owns them from `push` until they have
/// been dispatched, then drops them.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The application window was resized.
    WindowResized {
        /// The new client width in pixels.
        width: u32,
        /// The new client height in pixels.
        height: u32,
    },
    /// The user asked to close the window.
    WindowClosed,
    /// The mouse cursor moved.
    MouseMoved {
        /// The new x-coordinate of the cursor.
        x: f32,
        /// The new y-coordinate of the cursor.
        y: f32,
    },
    /// A mouse button was pressed.
    MouseButtonPressed {
        /// The mouse button that was pressed.
        button: MouseButton,
    },
    /// A mouse button was released.
    MouseButtonReleased {
        /// The mouse button that was released.
        button: MouseButton,
    },
    /// The mouse wheel was scrolled.
    MouseWheelScrolled {
        /// The horizontal scroll delta.
        delta_x: f32,
        /// The vertical scroll delta.
        delta_y: f32,
    },
    /// A keyboard key was pressed.
    KeyPressed {
        /// A string representation of the physical key code.
        key_code: String,
    },
    /// A keyboard key was released.
    KeyReleased {
        /// A string representation of the physical key code.
        key_code: String,
    },
}

impl EngineEvent {
    /// Returns the kind subscribers use to filter this event.
    pub fn kind(&self) -> EventKind {
        match self {
            EngineEvent::WindowResized { .. } => EventKind::WindowResized,
            EngineEvent::WindowClosed => EventKind::WindowClosed,
            EngineEvent::MouseMoved { .. } => EventKind::MouseMoved,
            EngineEvent::MouseButtonPressed { .. } => EventKind::MouseButtonPressed,
            EngineEvent::MouseButtonReleased { .. } => EventKind::MouseButtonReleased,
            EngineEvent::MouseWheelScrolled { .. } => EventKind::MouseWheelScrolled,
            EngineEvent::KeyPressed { .. } => EventKind::KeyPressed,
            EngineEvent::KeyReleased { .. } => EventKind::KeyReleased,
        }
    }
}

/// The payload-free discriminant of an [`EngineEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`EngineEvent::WindowResized`].
    WindowResized,
    /// See [`EngineEvent::WindowClosed`].
    WindowClosed,
    /// See [`EngineEvent::MouseMoved`].
    MouseMoved,
    /// See [`EngineEvent::MouseButtonPressed`].
    MouseButtonPressed,
    /// See [`EngineEvent::MouseButtonReleased`].
    MouseButtonReleased,
    /// See [`EngineEvent::MouseWheelScrolled`].
    MouseWheelScrolled,
    /// See [`EngineEvent::KeyPressed`].
    KeyPressed,
    /// See [`EngineEvent::KeyReleased`].
    KeyReleased,
}

impl EventKind {
    /// Every event kind.
    pub const ALL: [EventKind; 8] = [
        EventKind::WindowResized,
        EventKind::WindowClosed,
        EventKind::MouseMoved,
        EventKind::MouseButtonPressed,
        EventKind::MouseButtonReleased,
        EventKind::MouseWheelScrolled,
        EventKind::KeyPressed,
        EventKind::KeyReleased,
    ];
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// An engine-internal representation of a mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// The left mouse button.
    Left,
    /// The right mouse button.
    Right,
    /// The middle mouse button.
    Middle,
    /// The back mouse button (typically on the side).
    Back,
    /// The forward mouse button (typically on the side).
    Forward,
    /// Another mouse button, identified by a numeric code.
    Other(u16),
}
