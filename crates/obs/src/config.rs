// Copyright 2024 RustFS Team
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

use emcecs_config::{DEFAULT_LOG_JSON, DEFAULT_LOG_LEVEL};
use tracing::Level;

/// Logging settings taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObsConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl ObsConfig {
    pub fn new(level: impl Into<String>, json: bool) -> Self {
        Self {
            level: level.into(),
            json,
        }
    }

    /// Normalized level string, rejected when it is not a tracing level.
    pub fn normalized_level(&self) -> Result<String, crate::ObsError> {
        let level = self.level.trim().to_ascii_lowercase();
        level
            .parse::<Level>()
            .map(|_| level.clone())
            .map_err(|_| crate::ObsError::InvalidLevel(self.level.clone()))
    }
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_LEVEL, DEFAULT_LOG_JSON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObsConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json);
    }

    #[test]
    fn test_normalized_level() {
        assert_eq!(ObsConfig::new(" DEBUG ", false).normalized_level().unwrap(), "debug");
        assert!(matches!(
            ObsConfig::new("verbose", false).normalized_level(),
            Err(crate::ObsError::InvalidLevel(level)) if level == "verbose"
        ));
    }
}
