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

use crate::engine::EngineState;
use chilli_core::{RegistryError, SystemId};
use thiserror::Error;

/// An error raised by the frame driver.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The operation is not allowed in the engine's current state.
    #[error("engine is {current:?}, expected {expected:?}")]
    InvalidState {
        /// The state the engine is in.
        current: EngineState,
        /// The state the operation requires.
        expected: EngineState,
    },

    /// A subsystem could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A subsystem listed as critical failed its `init`.
    #[error("critical subsystem {id} failed to initialize: {reason}")]
    CriticalInitFailure {
        /// The subsystem that failed.
        id: SystemId,
        /// The rendered `init` error.
        reason: String,
    },
}
