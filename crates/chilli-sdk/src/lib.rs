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

//! The public-facing entry point of the Chilli engine.
//!
//! [`Engine`] is the frame driver: it owns the subsystem registry, builds and
//! registers the core subsystems, runs their two-phase initialisation and
//! then ticks everything in a fixed order until shutdown.
//!
//! ```no_run
//! use chilli_sdk::prelude::*;
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! engine.init_headless()?;
//! while engine.update() {}
//! # Ok::<(), chilli_sdk::EngineError>(())
//! ```

mod engine;
mod error;

pub use engine::{Engine, EngineState, ShutdownHandle};
pub use error::EngineError;

/// Everything an application usually needs.
pub mod prelude {
    pub use crate::{Engine, EngineError, EngineState, ShutdownHandle};
    pub use chilli_core::{
        EngineConfig, EngineEvent, EventBus, EventKind, EventSender, FrameState, FrameTimer,
        GraphicsBackend, MouseButton, RegistryLink, Renderer, Subsystem, SubsystemKind,
        SystemId,
    };
    pub use chilli_infra::{HeadlessBackend, WindowBridge};
}
