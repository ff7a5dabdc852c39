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

//! Error types reported by the core.
//!
//! Resolution failures are not errors here: they surface as `None` from
//! [`SubsystemRegistry::resolve`](crate::SubsystemRegistry::resolve).

use crate::subsystem::SystemId;
use std::path::PathBuf;
use thiserror::Error;

/// An error raised while registering a subsystem.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A subsystem with the same identity is already registered.
    #[error("a subsystem is already registered under {0}")]
    DuplicateIdentity(SystemId),

    /// The instance reported an identity other than the one its type declares.
    #[error("subsystem declares {expected} but reports {reported}")]
    IdentityMismatch {
        /// The identity bound to the concrete type.
        expected: SystemId,
        /// The identity returned by the instance.
        reported: SystemId,
    },
}

/// An error raised while loading or validating an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config '{}': {source}", path.display())]
    Io {
        /// The path that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON or does not match the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The window must have a non-zero size.
    #[error("invalid window size {width}x{height}")]
    InvalidWindowSize {
        /// The configured width.
        width: u32,
        /// The configured height.
        height: u32,
    },
}
