//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Cobo.
//! The Cobo project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use log::{Level, LevelFilter};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration for [`CbLogger`](super::CbLogger).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CbLogConfig {
    /// Threshold level name (`DEBUG`, `INFO`, `WARNING`, `ERROR`, `OFF`).
    pub level: String,
    pub console_enabled: bool,
    /// Render records as JSON objects instead of text lines.
    pub json_format: bool,
    pub file_enabled: bool,
    /// Append-only log file used when file logging is enabled.
    pub file_path: Option<String>,
}

impl Default for CbLogConfig {
    fn default() -> Self {
        CbLogConfig {
            level: "INFO".to_string(),
            console_enabled: true,
            json_format: false,
            file_enabled: false,
            file_path: None,
        }
    }
}

impl CbLogConfig {
    pub fn level_filter(&self) -> LevelFilter {
        match self.level.trim().to_ascii_uppercase().as_str() {
            "OFF" => LevelFilter::Off,
            "TRACE" => LevelFilter::Trace,
            "DEBUG" => LevelFilter::Debug,
            "WARN" | "WARNING" => LevelFilter::Warn,
            "ERROR" => LevelFilter::Error,
            _ => LevelFilter::Info,
        }
    }

    pub fn should_log(&self, level: Level) -> bool {
        level <= self.level_filter()
    }
}

/// Partial configuration; unset fields fall back to the defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CbLogConfigBuilder {
    pub level: Option<String>,
    pub console_enabled: Option<bool>,
    pub json_format: Option<bool>,
    pub file_enabled: Option<bool>,
    pub file_path: Option<String>,
}

impl CbLogConfigBuilder {
    pub fn build(self) -> CbLogConfig {
        let base = CbLogConfig::default();
        CbLogConfig {
            level: self.level.unwrap_or(base.level),
            console_enabled: self.console_enabled.unwrap_or(base.console_enabled),
            json_format: self.json_format.unwrap_or(base.json_format),
            file_enabled: self
                .file_enabled
                .unwrap_or(base.file_enabled || self.file_path.is_some()),
            file_path: self.file_path.or(base.file_path),
        }
    }

    pub fn from_json(value: &Value) -> CbLogConfig {
        let builder: CbLogConfigBuilder =
            serde_json::from_value(value.clone()).unwrap_or_default();
        builder.build()
    }
}
