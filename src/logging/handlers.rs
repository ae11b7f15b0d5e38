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

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::logging::core::CbLogRecord;
use crate::logging::formatters::{CbJsonFormatter, CbTextFormatter};

pub trait CbLogHandler {
    fn handle(&self, record: &CbLogRecord);
}

fn render(record: &CbLogRecord, json: bool) -> String {
    if json {
        CbJsonFormatter::format(record)
    } else {
        CbTextFormatter::format(record)
    }
}

/// Writes to standard error so that standard output stays free for data.
pub struct CbStderrHandler {
    json: bool,
}

impl CbStderrHandler {
    pub fn new(json: bool) -> Self {
        CbStderrHandler { json }
    }
}

impl CbLogHandler for CbStderrHandler {
    fn handle(&self, record: &CbLogRecord) {
        eprintln!("{}", render(record, self.json));
    }
}

/// Appends one line per record to a file.
pub struct CbFileHandler {
    path: String,
    json: bool,
    file: Mutex<()>,
}

impl CbFileHandler {
    pub fn new(path: String, json: bool) -> Self {
        CbFileHandler {
            path,
            json,
            file: Mutex::new(()),
        }
    }
}

impl CbLogHandler for CbFileHandler {
    fn handle(&self, record: &CbLogRecord) {
        let Ok(_guard) = self.file.lock() else {
            return;
        };
        let line = render(record, self.json);
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{}", line);
        }
    }
}
