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

//! Frame-synchronous event communication between subsystems.
//!
//! Producers push [`EngineEvent`]s onto the [`EventBus`] at any time. Once per
//! frame the bus drains everything queued so far and hands each event to the
//! handlers subscribed to its [`EventKind`]. Events pushed while a drain is
//! running wait for the next one.

mod bus;
mod types;

pub use self::bus::{DrainReport, EventBus, EventSender, FrameState};
pub use self::types::{EngineEvent, EventKind, MouseButton};
