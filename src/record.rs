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

//! # Cobo Record Module
//!
//! Decoded values and rows produced from fixed-width data lines.
//!
//! ## Design Principles
//!
//! - **Exact numbers**: numeric fields decode into [`rust_decimal::Decimal`],
//!   never into floating point
//! - **Ordered rows**: a row keeps its columns in copybook traversal order, so
//!   insert statements and JSON output line up with the generated table
//! - **Null for empty**: a blank or missing slice is [`CbValue::Null`]
//!
//! ## Usage Example
//!
//! ```rust
//! use cobo::record::{CbRow, CbValue};
//!
//! let mut row = CbRow::new();
//! row.push("CUST_ID", CbValue::Decimal(42.into()));
//! row.push("CUST_NAME", CbValue::Text("ACME".into()));
//! assert_eq!(row.to_json()["CUST_ID"], serde_json::json!(42));
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A single decoded field value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CbValue {
    Null,
    Decimal(Decimal),
    Text(String),
}

impl CbValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CbValue::Null)
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            CbValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CbValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// JSON form; decimals become numbers whenever JSON can carry them.
    pub fn to_json(&self) -> Value {
        match self {
            CbValue::Null => Value::Null,
            CbValue::Decimal(d) => {
                let text = d.normalize().to_string();
                Number::from_str(&text)
                    .map(Value::Number)
                    .unwrap_or(Value::String(text))
            }
            CbValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl From<&str> for CbValue {
    fn from(value: &str) -> Self {
        CbValue::Text(value.to_string())
    }
}

impl From<Decimal> for CbValue {
    fn from(value: Decimal) -> Self {
        CbValue::Decimal(value)
    }
}

/// A named value bound into a statement.
pub type CbParam = (String, CbValue);

/// One decoded record: column name and value pairs in column order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbRow {
    pub values: Vec<(String, CbValue)>,
}

impl CbRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        CbRow {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: CbValue) {
        self.values.push((column.into(), value));
    }

    pub fn get(&self, column: &str) -> Option<&CbValue> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.values {
            map.insert(name.clone(), value.to_json());
        }
        Value::Object(map)
    }
}

/// Convenience alias for working on batches of rows.
pub type CbRowBatch = Vec<CbRow>;
