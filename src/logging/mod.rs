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

//! # Logging Module
//!
//! Backend for the `log` facade used throughout the library.
//!
//! ## Module Components
//!
//! - **Config** ([config.rs](config/index.html)): level threshold, console and
//!   file sinks, JSON or text rendering
//! - **Core** ([core.rs](core/index.html)): the record type and the global
//!   logger installed with [`CbLogger::init`]
//! - **Handlers** ([handlers.rs](handlers/index.html)): standard-error and
//!   append-only file sinks
//! - **Formatters** ([formatters.rs](formatters/index.html)): JSON and text
//!   line rendering
//!
//! Library code only calls `log::debug!`, `log::info!` and friends; installing
//! a logger is left to the application.

pub mod config;
pub mod core;
pub mod formatters;
pub mod handlers;

pub use config::{CbLogConfig, CbLogConfigBuilder};
pub use self::core::{CbLogRecord, CbLogger};
pub use formatters::{CbJsonFormatter, CbTextFormatter};
pub use handlers::{CbFileHandler, CbLogHandler, CbStderrHandler};
