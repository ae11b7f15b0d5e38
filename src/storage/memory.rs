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

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::errors::{CbError, Result};
use crate::record::{CbParam, CbRow};
use crate::storage::{build_insert, CbStorage, SUB_BATCH_SIZE};

#[derive(Debug, Default)]
struct CbMemoryState {
    tables: HashMap<String, Vec<CbRow>>,
    statements: Vec<String>,
    sub_batches: usize,
    fail_on: Option<usize>,
}

/// In-process executor keeping tables as row vectors.
///
/// Statements are logged rather than interpreted. Inserts follow the same
/// transaction shape as a database executor: sub-batches of up to
/// [`SUB_BATCH_SIZE`] rows, each committed only when the whole chunk
/// succeeds.
#[derive(Debug, Default)]
pub struct CbMemoryStorage {
    state: Mutex<CbMemoryState>,
}

impl CbMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the sub-batch with this zero-based ordinal fail, counted over
    /// the lifetime of the executor.
    pub fn fail_on_sub_batch(mut self, ordinal: usize) -> Self {
        if let Ok(state) = self.state.get_mut() {
            state.fail_on = Some(ordinal);
        }
        self
    }

    /// Snapshot of the committed rows of `table`.
    pub fn rows(&self, table: &str) -> Vec<CbRow> {
        self.lock()
            .map(|s| s.tables.get(table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.lock()
            .map(|s| s.tables.get(table).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Every statement seen so far, inserts included, in execution order.
    pub fn statements(&self) -> Vec<String> {
        self.lock().map(|s| s.statements.clone()).unwrap_or_default()
    }

    /// Sub-batches attempted so far, failed ones included.
    pub fn sub_batches(&self) -> usize {
        self.lock().map(|s| s.sub_batches).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, CbMemoryState>> {
        self.state
            .lock()
            .map_err(|_| CbError::internal("memory storage lock poisoned"))
    }
}

#[async_trait]
impl CbStorage for CbMemoryStorage {
    async fn execute(&self, sql: &str) -> Result<u64> {
        self.lock()?.statements.push(sql.to_string());
        Ok(0)
    }

    async fn execute_with_params(&self, sql: &str, params: &[CbParam]) -> Result<u64> {
        log::debug!("memory storage: statement with {} parameters", params.len());
        self.lock()?.statements.push(sql.to_string());
        Ok(0)
    }

    async fn bulk_insert(&self, table: &str, rows: &[CbRow]) -> Result<u64> {
        let mut state = self.lock()?;
        let mut written = 0u64;

        for chunk in rows.chunks(SUB_BATCH_SIZE) {
            let ordinal = state.sub_batches;
            state.sub_batches += 1;

            let Some((sql, _params)) = build_insert(table, chunk) else {
                continue;
            };
            if state.fail_on == Some(ordinal) {
                log::warn!(
                    "sub-batch {} into '{}' failed, {} rows rolled back",
                    ordinal,
                    table,
                    chunk.len()
                );
                return Err(CbError::storage(
                    table,
                    format!("injected failure in sub-batch {ordinal}"),
                ));
            }

            state.statements.push(sql);
            state
                .tables
                .entry(table.to_string())
                .or_default()
                .extend_from_slice(chunk);
            written += chunk.len() as u64;
        }

        Ok(written)
    }
}
