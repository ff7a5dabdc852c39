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

//! Engine configuration.
//!
//! Configuration is plain JSON. Every field has a default, so a file only
//! needs to list what it overrides:
//!
//! ```json
//! {
//!     "window": { "title": "Sandbox", "width": 1280, "height": 720 },
//!     "max_frames": 600,
//!     "critical_systems": ["EventSystem"]
//! }
//! ```

use crate::error::ConfigError;
use crate::subsystem::SystemId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the window the engine presents into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Initial client width in pixels.
    pub width: u32,
    /// Initial client height in pixels.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Chilli Engine".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window settings.
    pub window: WindowConfig,
    /// Default `env_logger` filter, overridden by `RUST_LOG`.
    pub log_filter: String,
    /// Stop after this many frames. `None` runs until shutdown is requested.
    pub max_frames: Option<u64>,
    /// Subsystems whose `init` failure aborts startup instead of degrading.
    pub critical_systems: Vec<SystemId>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            log_filter: "info".to_string(),
            max_frames: None,
            critical_systems: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Reads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded engine config from '{}'.", path.display());
        Ok(config)
    }

    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidWindowSize {
                width: self.window.width,
                height: self.window.height,
            });
        }
        Ok(())
    }

    /// Whether an `init` failure of `id` should abort startup.
    pub fn is_critical(&self, id: SystemId) -> bool {
        self.critical_systems.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_object_yields_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(!config.is_critical(SystemId::Renderer));
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json_str(
            r#"{ "window": { "width": 800 }, "max_frames": 3, "critical_systems": ["Renderer"] }"#,
        )
        .unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.max_frames, Some(3));
        assert!(config.is_critical(SystemId::Renderer));
        assert!(!config.is_critical(SystemId::Timer));
    }

    #[test]
    fn test_zero_window_size_is_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "window": { "height": 0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidWindowSize {
                width: 1280,
                height: 0
            }
        ));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "log_filter": "debug" }}"#).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
