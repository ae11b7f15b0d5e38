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

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::copybook::CbCopybook;
use crate::errors::{CbError, Result};
use crate::record::{CbRow, CbValue};

/// Where one output column lives inside a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbFieldSlot {
    pub column: String,
    pub offset: usize,
    pub length: usize,
    pub numeric: bool,
}

/// Slices fixed-width lines into rows.
///
/// Built once from a laid-out copybook; decoding itself cannot fail. Slices
/// are clamped to the line, blank slices become nulls, and numbers that do
/// not parse keep their trimmed text.
#[derive(Clone, Debug)]
pub struct CbRecordDecoder {
    slots: Vec<CbFieldSlot>,
}

impl CbRecordDecoder {
    /// Collects the data fields of `copybook`; offsets must already be computed.
    pub fn new(copybook: &CbCopybook) -> Result<Self> {
        let mut slots = Vec::new();
        for id in copybook.data_fields() {
            let node = copybook.node(id);
            let (Some(offset), Some(length)) = (node.offset, node.storage_length) else {
                return Err(CbError::schema(format!(
                    "field '{}' has no layout; compute offsets first",
                    node.name
                )));
            };
            slots.push(CbFieldSlot {
                column: node.column_name(),
                offset,
                length,
                numeric: node.is_numeric(),
            });
        }
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[CbFieldSlot] {
        &self.slots
    }

    pub fn decode(&self, line: &str) -> CbRow {
        let mut row = CbRow::with_capacity(self.slots.len() + 1);
        for slot in &self.slots {
            let text = window(line, slot.offset, slot.length).trim();
            row.push(slot.column.clone(), decode_value(text, slot.numeric));
        }
        row
    }
}

fn decode_value(text: &str, numeric: bool) -> CbValue {
    if text.is_empty() {
        return CbValue::Null;
    }
    if numeric {
        if let Some(number) = decode_number(text) {
            return CbValue::Decimal(number);
        }
    }
    CbValue::Text(text.to_string())
}

/// Parses display digits, honouring a leading or trailing `+`/`-`.
pub fn decode_number(text: &str) -> Option<Decimal> {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes() {
        [b'-', ..] => (true, &text[1..]),
        [b'+', ..] => (false, &text[1..]),
        [.., b'-'] => (true, &text[..text.len() - 1]),
        [.., b'+'] => (false, &text[..text.len() - 1]),
        _ => (false, text),
    };
    let digits = digits.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    let value = Decimal::from_str(digits).ok()?;
    Some(if negative { -value } else { value })
}

/// `[offset, offset + length)` in characters, clamped to the line.
fn window(line: &str, offset: usize, length: usize) -> &str {
    let end = offset.saturating_add(length);
    if line.is_ascii() {
        let start = offset.min(line.len());
        return &line[start..end.min(line.len())];
    }
    let byte_at = |n: usize| line.char_indices().nth(n).map(|(i, _)| i).unwrap_or(line.len());
    &line[byte_at(offset)..byte_at(end)]
}
