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

//! # Cobo Core Library
//!
//! Cobo stages fixed-width legacy records into a relational database. A
//! copybook describes the record; from it Cobo builds a field tree, lays out
//! byte offsets, generates the staging table, decodes data files into rows,
//! and compiles a small transformation language into a view definition.
//!
//! ## Module Overview
//!
//! - **copybook**: field-tree arena, storage notation and the grammar parser
//! - **layout**: offsets, storage lengths, OCCURS / REDEFINES reporting
//! - **ddl**: column type mapping and `CREATE TABLE` generation
//! - **record**: decoded values and rows
//! - **ingest**: line reader and record decoder
//! - **storage**: the executor contract and an in-memory executor
//! - **import**: batched loading with cancellation and progress reporting
//! - **dsl**: transformation scripts compiled into `CREATE OR REPLACE VIEW`
//! - **config**: aggregated JSON / YAML configuration
//! - **logging**: backend for the `log` facade
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use cobo::{copybook, ddl, dsl, layout, CbImportService, CbMemoryStorage};
//!
//! let mut parsed = copybook::parse(&std::fs::read_to_string("customer.cpy")?);
//! layout::compute_offsets(&mut parsed.copybook);
//!
//! let storage = Arc::new(CbMemoryStorage::new());
//! let service = CbImportService::new(storage.clone());
//! service.apply_schema("staging_customer", &parsed.copybook).await?;
//! service
//!     .import_records("customer.dat".as_ref(), "staging_customer", &parsed.copybook)
//!     .await?;
//!
//! let view = dsl::compile("staging_customer", "customer_v", "MOVE CUST_ID -> ID");
//! service.apply_transform(&view).await?;
//! ```
//!
//! ## Error Handling
//!
//! Parsing, layout and decoding never fail; they degrade instead. Fallible
//! operations return `Result<T, CbError>`, and storage failures reach the
//! caller exactly as the executor reported them.

pub mod config;
pub mod copybook;
pub mod ddl;
pub mod dsl;
pub mod errors;
pub mod import;
pub mod ingest;
pub mod layout;
pub mod logging;
pub mod record;
pub mod storage;

pub use config::CbConfig;
pub use copybook::{
    CbCopybook, CbCopybookParser, CbNode, CbNodeId, CbParseResult, CbParserConfig, CbPicture,
    CbSignPosition, CbSkipReason, CbSkippedLine, CbUsage,
};
pub use ddl::{default_table_name, CbColumn, CbColumnType, CbDdlConfig, CbSqlGenerator};
pub use dsl::{CbTransformCompiler, CbTransformParser, CbTransformProgram, CbTransformStatement};
pub use errors::{CbError, Result};
pub use import::{
    CbImportConfig, CbImportService, CbImportSummary, CbProgressCallback, CbProgressInfo,
};
pub use ingest::{CbLineReader, CbLineSource, CbRecordDecoder};
pub use layout::{
    CbLayoutCalculator, CbLayoutConfig, CbLayoutReport, CbOccursDefinition, CbOccursMode,
    CbRedefinesGroup, CbRedefinesMode, CbSizingMode,
};
pub use logging::{CbLogConfig, CbLogger};
pub use record::{CbParam, CbRow, CbRowBatch, CbValue};
pub use storage::{build_insert, CbMemoryStorage, CbStorage, SUB_BATCH_SIZE};
