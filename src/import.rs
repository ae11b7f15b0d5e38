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

//! # Import Module
//!
//! Batched loading of decoded records into a storage executor.
//!
//! ## Flow
//!
//! 1. Each line is read from a [`CbLineSource`]; empty lines are skipped
//! 2. The line is decoded against the laid-out copybook and tagged with the
//!    source name
//! 3. Rows accumulate until `batch_size` (1000 by default), then the batch
//!    goes to [`CbStorage::bulk_insert`]
//! 4. At end of input the partial batch is flushed
//!
//! Cancellation is checked before every line. A cancelled import drops the
//! unflushed batch and reports how many rows were already committed; those
//! rows are not undone. Storage failures are returned exactly as the executor
//! produced them.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::copybook::CbCopybook;
use crate::ddl::{CbDdlConfig, CbSqlGenerator};
use crate::errors::{CbError, Result};
use crate::ingest::{CbLineReader, CbLineSource, CbRecordDecoder};
use crate::record::{CbRowBatch, CbValue};
use crate::storage::CbStorage;

pub type CbProgressCallback = Box<dyn Fn(CbProgressInfo) + Send + Sync>;

#[derive(Clone, Debug)]
pub struct CbProgressInfo {
    pub lines_read: u64,
    pub rows_written: u64,
    pub bytes_read: u64,
    pub current_file: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CbImportConfig {
    pub batch_size: usize,
    /// Column receiving the source name on every row.
    pub file_name_column: String,
    /// Lines between progress callbacks; zero reports only at the end.
    pub progress_interval: u64,
}

impl Default for CbImportConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            file_name_column: "ImportFileName".to_string(),
            progress_interval: 10000,
        }
    }
}

/// Counters for one completed import.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbImportSummary {
    pub source_name: String,
    pub lines_read: u64,
    pub empty_lines: u64,
    pub rows_written: u64,
    pub batches: u64,
}

pub struct CbImportService {
    storage: Arc<dyn CbStorage>,
    config: CbImportConfig,
    ddl: CbDdlConfig,
    cancel: CancellationToken,
    progress: Option<CbProgressCallback>,
}

impl CbImportService {
    pub fn new(storage: Arc<dyn CbStorage>) -> Self {
        Self {
            storage,
            config: CbImportConfig::default(),
            ddl: CbDdlConfig::default(),
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    pub fn with_config(mut self, config: CbImportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_ddl_config(mut self, ddl: CbDdlConfig) -> Self {
        self.ddl = ddl;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_progress(mut self, callback: CbProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Token that cancels imports run by this service.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Generates the staging table definition and executes it.
    pub async fn apply_schema(&self, table: &str, copybook: &CbCopybook) -> Result<String> {
        let sql = CbSqlGenerator::new()
            .with_config(self.ddl.clone())
            .generate_schema(table, copybook);
        self.storage.execute(&sql).await?;
        log::info!("applied schema for '{}'", table);
        Ok(sql)
    }

    /// Executes a compiled view definition.
    pub async fn apply_transform(&self, sql: &str) -> Result<u64> {
        let affected = self.storage.execute(sql).await?;
        log::info!("applied transform ({} bytes of SQL)", sql.len());
        Ok(affected)
    }

    /// Loads every record of the data file at `path` into `table`.
    pub async fn import_records(
        &self,
        path: &Path,
        table: &str,
        copybook: &CbCopybook,
    ) -> Result<CbImportSummary> {
        let mut reader = CbLineReader::open(path).await?;
        self.import_from_source(&mut reader, table, copybook).await
    }

    /// Loads every record of `source` into `table`.
    ///
    /// `copybook` must already carry computed offsets.
    pub async fn import_from_source<S>(
        &self,
        source: &mut S,
        table: &str,
        copybook: &CbCopybook,
    ) -> Result<CbImportSummary>
    where
        S: CbLineSource + ?Sized,
    {
        let decoder = CbRecordDecoder::new(copybook)?;
        let batch_size = self.config.batch_size.max(1);
        let mut batch: CbRowBatch = Vec::with_capacity(batch_size);
        let mut summary = CbImportSummary {
            source_name: source.name().to_string(),
            ..CbImportSummary::default()
        };
        log::info!("importing '{}' into '{}'", summary.source_name, table);

        loop {
            if self.cancel.is_cancelled() {
                log::warn!(
                    "import of '{}' cancelled after {} committed rows; {} pending rows dropped",
                    summary.source_name,
                    summary.rows_written,
                    batch.len()
                );
                return Err(CbError::Cancelled {
                    rows_written: summary.rows_written,
                });
            }

            let Some(line) = source.next_line().await? else {
                break;
            };
            summary.lines_read += 1;
            if line.is_empty() {
                summary.empty_lines += 1;
                continue;
            }

            let mut row = decoder.decode(&line);
            row.push(
                self.config.file_name_column.clone(),
                CbValue::Text(summary.source_name.clone()),
            );
            batch.push(row);

            if batch.len() >= batch_size {
                self.flush(table, &mut batch, &mut summary).await?;
            }
            let interval = self.config.progress_interval;
            if interval > 0 && summary.lines_read % interval == 0 {
                self.report(&summary, source.bytes_read());
            }
        }

        if !batch.is_empty() {
            self.flush(table, &mut batch, &mut summary).await?;
        }
        self.report(&summary, source.bytes_read());

        log::info!(
            "imported '{}': {} lines, {} rows in {} batches",
            summary.source_name,
            summary.lines_read,
            summary.rows_written,
            summary.batches
        );
        Ok(summary)
    }

    async fn flush(
        &self,
        table: &str,
        batch: &mut CbRowBatch,
        summary: &mut CbImportSummary,
    ) -> Result<()> {
        let written = self.storage.bulk_insert(table, batch.as_slice()).await?;
        summary.rows_written += written;
        summary.batches += 1;
        log::debug!("flushed {} rows into '{}'", batch.len(), table);
        batch.clear();
        Ok(())
    }

    fn report(&self, summary: &CbImportSummary, bytes_read: u64) {
        if let Some(callback) = &self.progress {
            callback(CbProgressInfo {
                lines_read: summary.lines_read,
                rows_written: summary.rows_written,
                bytes_read,
                current_file: summary.source_name.clone(),
            });
        }
    }
}
