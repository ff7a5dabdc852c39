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

//! # Chilli Core
//!
//! Foundational crate containing the subsystem contract, the dependency
//! registry and the frame-synchronous event bus that every engine subsystem
//! builds on.
//!
//! Everything in this crate is single-threaded: the registry and the bus are
//! only ever touched from the frame driver's thread. The one exception is
//! [`EventSender`], whose channel can be fed from anywhere.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod event;
pub mod registry;
pub mod renderer;
pub mod subsystem;
pub mod timer;

pub use config::{EngineConfig, WindowConfig};
pub use error::{ConfigError, RegistryError};
pub use event::{
    DrainReport, EngineEvent, EventBus, EventKind, EventSender, FrameState, MouseButton,
};
pub use registry::{RegistryLink, SubsystemRegistry};
pub use renderer::{GraphicsBackend, Renderer};
pub use subsystem::{FrameStage, Subsystem, SubsystemKind, SystemId};
pub use timer::{FrameTimer, Stopwatch};
