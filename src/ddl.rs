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

//! # DDL Module
//!
//! Maps elementary items to relational column types and renders the staging
//! table definition.
//!
//! | Notation | Column |
//! |---|---|
//! | `X(n)`, n <= 255 | `VARCHAR(n)` |
//! | `X(n)`, n > 255 | `TEXT` |
//! | `9(a)V9(b)` | `DECIMAL(a+b+sign, b)` |
//! | `9(n)`, n <= 9 | `INT` |
//! | `9(n)`, n <= 18 | `BIGINT` |
//! | `9(n)`, n > 18 | `DECIMAL(n,0)` |
//! | anything else | `VARCHAR(255)` |
//!
//! Generation reads only names and notations, so it does not need a layout
//! pass to have run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::copybook::{CbCopybook, CbNode, CbPictureShape};

const MAX_VARCHAR: usize = 255;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CbColumnType {
    Varchar(usize),
    Text,
    Decimal { precision: usize, scale: usize },
    Int,
    BigInt,
}

impl CbColumnType {
    /// Column type for one elementary item.
    pub fn for_node(node: &CbNode) -> Self {
        let Some(picture) = node.picture.as_ref() else {
            return CbColumnType::Varchar(MAX_VARCHAR);
        };
        match picture.shape() {
            CbPictureShape::Alphanumeric { width } if width <= MAX_VARCHAR => {
                CbColumnType::Varchar(width)
            }
            CbPictureShape::Alphanumeric { .. } => CbColumnType::Text,
            CbPictureShape::Decimal { integer, fraction } => CbColumnType::Decimal {
                precision: integer
                    .saturating_add(fraction)
                    .saturating_add(usize::from(node.is_signed())),
                scale: fraction,
            },
            CbPictureShape::Numeric { digits } if digits <= 9 => CbColumnType::Int,
            CbPictureShape::Numeric { digits } if digits <= 18 => CbColumnType::BigInt,
            CbPictureShape::Numeric { digits } => CbColumnType::Decimal {
                precision: digits,
                scale: 0,
            },
            CbPictureShape::Unknown => CbColumnType::Varchar(MAX_VARCHAR),
        }
    }
}

impl fmt::Display for CbColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CbColumnType::Varchar(n) => write!(f, "VARCHAR({n})"),
            CbColumnType::Text => f.write_str("TEXT"),
            CbColumnType::Decimal { precision, scale } => write!(f, "DECIMAL({precision},{scale})"),
            CbColumnType::Int => f.write_str("INT"),
            CbColumnType::BigInt => f.write_str("BIGINT"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbColumn {
    pub name: String,
    pub column_type: CbColumnType,
}

/// Shape of the generated table around the data columns.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CbDdlConfig {
    pub identity_column: String,
    pub file_name_column: String,
    pub if_not_exists: bool,
    /// Appended after the closing parenthesis; empty for none.
    pub table_options: String,
}

impl Default for CbDdlConfig {
    fn default() -> Self {
        Self {
            identity_column: "Id".to_string(),
            file_name_column: "ImportFileName".to_string(),
            if_not_exists: true,
            table_options: "ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_0900_ai_ci"
                .to_string(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CbSqlGenerator {
    config: CbDdlConfig,
}

impl CbSqlGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: CbDdlConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CbDdlConfig {
        &self.config
    }

    /// One column per non-FILLER leaf, in traversal order.
    pub fn columns(&self, copybook: &CbCopybook) -> Vec<CbColumn> {
        copybook
            .data_fields()
            .into_iter()
            .map(|id| {
                let node = copybook.node(id);
                CbColumn {
                    name: node.column_name(),
                    column_type: CbColumnType::for_node(node),
                }
            })
            .collect()
    }

    pub fn generate_schema(&self, table_name: &str, copybook: &CbCopybook) -> String {
        let cfg = &self.config;
        let mut sql = String::new();

        sql.push_str("CREATE TABLE ");
        if cfg.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&quote_ident(table_name));
        sql.push_str(" (\n");
        sql.push_str(&format!(
            "  {} BIGINT NOT NULL AUTO_INCREMENT,\n",
            quote_ident(&cfg.identity_column)
        ));
        for column in self.columns(copybook) {
            sql.push_str(&format!("  {} {},\n", quote_ident(&column.name), column.column_type));
        }
        sql.push_str(&format!(
            "  {} VARCHAR(255) NULL,\n",
            quote_ident(&cfg.file_name_column)
        ));
        sql.push_str(&format!("  PRIMARY KEY ({})\n", quote_ident(&cfg.identity_column)));
        sql.push(')');
        if !cfg.table_options.trim().is_empty() {
            sql.push(' ');
            sql.push_str(cfg.table_options.trim());
        }
        sql.push_str(";\n");
        sql
    }
}

/// Default-configured [`CbSqlGenerator::generate_schema`].
pub fn generate_schema(table_name: &str, copybook: &CbCopybook) -> String {
    CbSqlGenerator::new().generate_schema(table_name, copybook)
}

/// Backtick-quotes an identifier, doubling embedded backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// `staging_<file stem>` in lower case.
pub fn default_table_name(path: &std::path::Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    format!("staging_{stem}")
}
