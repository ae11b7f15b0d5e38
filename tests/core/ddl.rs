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

use std::path::Path;

use cobo::copybook::{CbCopybook, CbCopybookParser, CbParserConfig};
use cobo::ddl::{
    default_table_name, generate_schema, quote_ident, CbColumnType, CbDdlConfig, CbSqlGenerator,
};

fn fixture() -> CbCopybook {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/customer.cpy");
    CbCopybookParser::new().parse_file(&path).unwrap().copybook
}

fn free_format(text: &str) -> CbCopybook {
    CbCopybookParser::new()
        .with_config(CbParserConfig {
            sequence_area: 0,
            ..CbParserConfig::default()
        })
        .parse(text)
        .copybook
}

#[test]
fn integer_boundaries() {
    let cb = free_format(
        "01 REC.\n\
         05 SMALL PIC 9(9).\n\
         05 LARGE PIC 9(18).\n\
         05 HUGE PIC 9(19).\n\
         05 LONG-TEXT PIC X(300).",
    );
    let types: Vec<_> = CbSqlGenerator::new()
        .columns(&cb)
        .into_iter()
        .map(|c| (c.name, c.column_type))
        .collect();

    assert_eq!(
        types,
        vec![
            ("SMALL".to_string(), CbColumnType::Int),
            ("LARGE".to_string(), CbColumnType::BigInt),
            ("HUGE".to_string(), CbColumnType::Decimal { precision: 19, scale: 0 }),
            ("LONG_TEXT".to_string(), CbColumnType::Text),
        ]
    );
}

#[test]
fn fixture_schema_text() {
    let sql = generate_schema("staging_customer", &fixture());
    let expected = "\
CREATE TABLE IF NOT EXISTS `staging_customer` (
  `Id` BIGINT NOT NULL AUTO_INCREMENT,
  `CUST_ID` INT,
  `CUST_NAME` VARCHAR(20),
  `BIRTH_YYYYMMDD` INT,
  `BALANCE` DECIMAL(10,2),
  `PHONE` VARCHAR(10),
  `STATUS` VARCHAR(1),
  `ImportFileName` VARCHAR(255) NULL,
  PRIMARY KEY (`Id`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_0900_ai_ci;
";
    assert_eq!(sql, expected);
}

#[test]
fn schema_does_not_need_layout() {
    let cb = free_format("01 REC.\n05 CODE PIC X(4).");
    assert!(cb.node(cb.find("CODE").unwrap()).offset.is_none());
    assert!(generate_schema("t", &cb).contains("`CODE` VARCHAR(4),"));
}

#[test]
fn custom_surrounding_columns() {
    let cb = free_format("01 REC.\n05 CODE PIC X(4).");
    let sql = CbSqlGenerator::new()
        .with_config(CbDdlConfig {
            identity_column: "RowId".to_string(),
            file_name_column: "SourceFile".to_string(),
            ..CbDdlConfig::default()
        })
        .generate_schema("odd`name", &cb);

    assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS `odd``name` (\n  `RowId` BIGINT"));
    assert!(sql.contains("  `SourceFile` VARCHAR(255) NULL,\n  PRIMARY KEY (`RowId`)\n"));
}

#[test]
fn identifiers_and_table_names() {
    assert_eq!(quote_ident("a`b"), "`a``b`");
    assert_eq!(default_table_name(Path::new("in/Customer.DAT")), "staging_customer");
    assert_eq!(default_table_name(Path::new("orders")), "staging_orders");
}
