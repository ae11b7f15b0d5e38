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

//! # Data Ingestion Module
//!
//! Reading fixed-width data files and decoding their lines into rows.
//!
//! ## Module Components
//!
//! - **Reader** ([reader.rs](reader/index.html)): asynchronous line source over
//!   single-byte encoded text, tolerant of `\n`, `\r\n` and bare `\r` endings
//! - **Decoder** ([decoder.rs](decoder/index.html)): slices each line at the
//!   computed offsets and turns the slices into typed values
//!
//! ## Usage Patterns
//!
//! ```rust
//! use cobo::ingest::{CbLineReader, CbLineSource, CbRecordDecoder};
//!
//! let decoder = CbRecordDecoder::new(&copybook)?;
//! let mut reader = CbLineReader::open(&path).await?;
//! while let Some(line) = reader.next_line().await? {
//!     let row = decoder.decode(&line);
//! }
//! ```

pub mod decoder;
pub mod reader;

pub use decoder::{decode_number, CbFieldSlot, CbRecordDecoder};
pub use reader::{decode_latin1, CbLineReader, CbLineSource};
