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

//! The contract shared by every engine subsystem.

use crate::registry::RegistryLink;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity token under which a subsystem is registered and resolved.
///
/// The set is closed: every concrete subsystem type maps to exactly one
/// variant through [`SubsystemKind::ID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum SystemId {
    /// The frame clock.
    Timer,
    /// The frame-synchronous event bus.
    EventSystem,
    /// Input handling and other event-adjacent logic.
    Input,
    /// The presentation subsystem.
    Renderer,
}

impl SystemId {
    /// Returns the stage this identity is ticked in.
    pub fn stage(self) -> FrameStage {
        match self {
            SystemId::Timer => FrameStage::Time,
            SystemId::EventSystem => FrameStage::Events,
            SystemId::Input => FrameStage::Logic,
            SystemId::Renderer => FrameStage::Presentation,
        }
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Coarse position of a subsystem inside a frame.
///
/// Variants are declared in execution order: time advances first and
/// presentation observes the final state of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrameStage {
    /// Clocks and timers.
    Time,
    /// Event draining.
    Events,
    /// Gameplay, input and other I/O-adjacent work.
    Logic,
    /// Rendering and anything else that must see the settled frame.
    Presentation,
}

/// The uniform shape the frame driver and the registry need from a subsystem.
///
/// Subsystems are constructed with a [`RegistryLink`] and added to the
/// [`SubsystemRegistry`](crate::SubsystemRegistry) right away. Once every
/// subsystem is registered the driver calls [`init`](Subsystem::init) on each
/// of them, then [`process_frame`](Subsystem::process_frame) once per tick.
pub trait Subsystem {
    /// Returns the token this subsystem is registered under.
    ///
    /// Must never change after construction.
    fn identity(&self) -> SystemId;

    /// Second-phase initialisation, run after every subsystem is registered.
    ///
    /// This is where dependencies are resolved and event handlers subscribed.
    /// An error marks the subsystem as degraded; it keeps being ticked.
    fn init(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Performs this subsystem's work for the current frame.
    fn process_frame(&mut self);

    /// The non-owning link back to the registry this subsystem lives in.
    fn registry(&self) -> &RegistryLink;
}

/// Binds a concrete subsystem type to its identity at compile time.
///
/// Resolution goes through this constant, so `resolve::<T>()` can only ever
/// hand back a `T`.
pub trait SubsystemKind: Subsystem + 'static {
    /// The identity every instance of this type reports.
    const ID: SystemId;
}
