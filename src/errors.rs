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

//! # Cobo Error Module
//!
//! This module defines the error types used throughout Cobo.
//!
//! ## Error Handling Philosophy
//!
//! Most of the pipeline is deliberately permissive:
//!
//! - **Grammar mismatches** in copybook text are skipped, never raised
//! - **Unrecognised storage notation** degrades to a zero-length field
//! - **Numeric decode failures** keep the raw trimmed text
//!
//! What remains are genuine failures: reading files, loading configuration,
//! and anything reported by the storage executor. Storage errors are handed
//! back to the caller exactly as the executor produced them.
//!
//! ## Error Categories
//!
//! - **Io**: Filesystem errors
//! - **Schema**: The field tree is not in a usable state (e.g. no layout yet)
//! - **Validation**: Invalid parameters or inputs
//! - **Storage**: Failures reported by a storage executor
//! - **Cancelled**: An import was cancelled at a line boundary
//! - **Serde**: Serialization/deserialization errors
//! - **Internal**: Unexpected internal failures

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Cobo.
pub type Result<T> = std::result::Result<T, CbError>;

/// Canonical error enumeration for Cobo.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum CbError {
    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// The field tree is missing information an operation depends on.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Failure reported by a storage executor while touching `target`.
    #[error("storage error on '{target}': {message}")]
    Storage { target: String, message: String },

    /// The import was cancelled; `rows_written` rows were already committed.
    #[error("import cancelled after {rows_written} committed rows")]
    Cancelled { rows_written: u64 },

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for CbError {
    fn from(err: io::Error) -> Self {
        CbError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CbError {
    fn from(err: serde_json::Error) -> Self {
        CbError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for CbError {
    fn from(err: serde_yaml::Error) -> Self {
        CbError::Serde(err.to_string())
    }
}

impl CbError {
    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        CbError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct schema errors.
    pub fn schema<T: Into<String>>(message: T) -> Self {
        CbError::Schema {
            message: message.into(),
        }
    }

    /// Helper to construct storage errors.
    pub fn storage(target: impl Into<String>, message: impl Into<String>) -> Self {
        CbError::Storage {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        CbError::Internal(message.into())
    }
}
