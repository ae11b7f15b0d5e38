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

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use log::{Level, Log, Metadata, Record};
use serde_json::{json, Map, Value};

use crate::logging::config::CbLogConfig;
use crate::logging::handlers::{CbFileHandler, CbLogHandler, CbStderrHandler};

/// One log event as seen by the handlers.
#[derive(Clone, Debug)]
pub struct CbLogRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl CbLogRecord {
    pub fn new(level: Level, target: impl Into<String>, message: impl Into<String>) -> Self {
        CbLogRecord {
            level,
            target: target.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut data = Map::new();
        data.insert("level".into(), json!(self.level.as_str()));
        data.insert("target".into(), json!(self.target));
        data.insert("message".into(), json!(self.message));
        data.insert(
            "timestamp".into(),
            json!(self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        );
        Value::Object(data)
    }
}

struct CbLoggerInner {
    config: CbLogConfig,
    handlers: Vec<Box<dyn CbLogHandler + Send + Sync>>,
}

impl CbLoggerInner {
    fn emit(&self, record: &CbLogRecord) {
        if !self.config.should_log(record.level) {
            return;
        }
        for h in &self.handlers {
            h.handle(record);
        }
    }
}

static LOGGER: OnceLock<CbLoggerInner> = OnceLock::new();
static FACADE: CbLogger = CbLogger;

/// Backend for the `log` facade.
#[derive(Debug, Default)]
pub struct CbLogger;

impl CbLogger {
    /// Installs the global logger. Safe to call multiple times; the first
    /// call wins and is the only one that returns `true`.
    pub fn init(config: CbLogConfig) -> bool {
        let mut installed = false;
        LOGGER.get_or_init(|| {
            installed = true;
            let mut handlers: Vec<Box<dyn CbLogHandler + Send + Sync>> = Vec::new();
            if config.console_enabled {
                handlers.push(Box::new(CbStderrHandler::new(config.json_format)));
            }
            if config.file_enabled {
                if let Some(path) = &config.file_path {
                    handlers.push(Box::new(CbFileHandler::new(path.clone(), config.json_format)));
                }
            }
            CbLoggerInner {
                config: config.clone(),
                handlers,
            }
        });

        if installed && log::set_logger(&FACADE).is_ok() {
            log::set_max_level(config.level_filter());
        }
        installed
    }

    /// Sends a record straight to the installed handlers.
    pub fn emit(record: &CbLogRecord) {
        if let Some(inner) = LOGGER.get() {
            inner.emit(record);
        }
    }
}

impl Log for CbLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        LOGGER
            .get()
            .is_some_and(|inner| inner.config.should_log(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let record = CbLogRecord::new(record.level(), record.target(), record.args().to_string());
        CbLogger::emit(&record);
    }

    fn flush(&self) {}
}
