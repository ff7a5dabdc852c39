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

//! # Chilli Infra
//!
//! Concrete implementations of the collaborators the core only knows at their
//! boundary: the `winit` windowing layer, which feeds native input into the
//! [`EventBus`](chilli_core::EventBus), and graphics backends for the
//! [`Renderer`](chilli_core::Renderer).

#![warn(missing_docs)]

#[cfg(feature = "graphics")]
pub mod graphics;
#[cfg(feature = "platform")]
pub mod platform;

#[cfg(feature = "graphics")]
pub use graphics::headless::HeadlessBackend;
#[cfg(feature = "platform")]
pub use platform::input::{translate_window_event, WindowBridge};
