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

//! # Storage Module
//!
//! The executor contract the loader writes through, and an in-process
//! executor.
//!
//! ## Contract
//!
//! - `execute`: run one statement (DDL, view definitions)
//! - `execute_with_params`: run one statement with named parameters bound
//! - `bulk_insert`: insert rows into a table in sub-batches of at most
//!   [`SUB_BATCH_SIZE`] rows, each sub-batch all-or-nothing
//!
//! Every call returns an affected-row count. Errors are [`CbError::Storage`]
//! values and the loader hands them to its caller untouched; there is no
//! retry at this layer.
//!
//! [`CbError::Storage`]: crate::errors::CbError::Storage

pub mod memory;

use async_trait::async_trait;

use crate::ddl::quote_ident;
use crate::errors::Result;
use crate::record::{CbParam, CbRow};

pub use memory::CbMemoryStorage;

/// Maximum rows per insert transaction.
pub const SUB_BATCH_SIZE: usize = 500;

#[async_trait]
pub trait CbStorage: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<u64>;

    async fn execute_with_params(&self, sql: &str, params: &[CbParam]) -> Result<u64>;

    /// Inserts `rows` into `table`; a failed sub-batch is rolled back and
    /// reported, earlier sub-batches stay committed.
    async fn bulk_insert(&self, table: &str, rows: &[CbRow]) -> Result<u64>;
}

/// One multi-row parameterised INSERT for `rows`.
///
/// Columns come from the first row; parameters are named `@p0`, `@p1`, ...
/// in row-major order. Returns `None` for an empty slice.
pub fn build_insert(table: &str, rows: &[CbRow]) -> Option<(String, Vec<CbParam>)> {
    let first = rows.first()?;
    let columns: Vec<&str> = first.columns().collect();

    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ",
        quote_ident(table),
        columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(",")
    );
    let mut params = Vec::with_capacity(rows.len() * columns.len());

    for (row_idx, row) in rows.iter().enumerate() {
        if row_idx > 0 {
            sql.push(',');
        }
        sql.push('(');
        for (col_idx, column) in columns.iter().enumerate() {
            if col_idx > 0 {
                sql.push(',');
            }
            let name = format!("@p{}", params.len());
            sql.push_str(&name);
            let value = row.get(column).cloned().unwrap_or(crate::record::CbValue::Null);
            params.push((name, value));
        }
        sql.push(')');
    }

    Some((sql, params))
}
