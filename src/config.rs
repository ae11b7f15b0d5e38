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

//! # Configuration Module
//!
//! One aggregate over the per-component settings, loadable from JSON or
//! YAML. Every section is optional and falls back to its defaults.
//!
//! ```yaml
//! parser:
//!   sequence_area: 0
//! layout:
//!   sizing: usage
//!   redefines_mode:
//!     mode: discriminator
//!     rule: "REC-TYPE = 'B'"
//! import:
//!   batch_size: 5000
//! logging:
//!   level: DEBUG
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::copybook::CbParserConfig;
use crate::ddl::CbDdlConfig;
use crate::errors::{CbError, Result};
use crate::import::CbImportConfig;
use crate::layout::CbLayoutConfig;
use crate::logging::CbLogConfig;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CbConfig {
    pub parser: CbParserConfig,
    pub layout: CbLayoutConfig,
    pub ddl: CbDdlConfig,
    pub import: CbImportConfig,
    pub logging: CbLogConfig,
}

impl CbConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Loads a file, choosing the format from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => Self::from_json_str(&content),
            "yaml" | "yml" => Self::from_yaml_str(&content),
            other => Err(CbError::validation(format!(
                "unsupported configuration format '{}' for {}",
                other,
                path.display()
            ))),
        }
    }
}
