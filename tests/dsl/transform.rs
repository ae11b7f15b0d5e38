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

use cobo::copybook::CbCopybookParser;
use cobo::dsl::{compile, CbTransformCompiler, CbTransformParser, CbTransformProgram, CbTransformStatement};

#[test]
fn move_and_compute_build_one_view() {
    let sql = compile("staging_t", "t_view", "MOVE A -> B\nCOMPUTE C = A + 1\n");
    assert_eq!(
        sql,
        "CREATE OR REPLACE VIEW `t_view` AS\nSELECT s.`A` AS `B`, (A + 1) AS `C`\nFROM `staging_t` s;\n"
    );
}

#[test]
fn empty_script_selects_everything() {
    let sql = compile("staging_t", "t_view", "");
    assert_eq!(sql, "CREATE OR REPLACE VIEW `t_view` AS\nSELECT s.*\nFROM `staging_t` s;\n");

    let only_noise = compile("staging_t", "t_view", "-- header\n\n   \nNOT A STATEMENT\n");
    assert_eq!(only_noise, sql);
}

#[test]
fn every_statement_kind() {
    let script = "\
-- conversion rules
MOVE CUST_ID TO ID
IF STATUS = 'A' THEN ACTIVE=1 ELSE ACTIVE=0
DATE8 BIRTHDATE = BIRTH_YYYYMMDD
COMP3 BALANCE
";
    let sql = compile("stg", "v", script);
    assert_eq!(
        sql,
        "CREATE OR REPLACE VIEW `v` AS\nSELECT s.`CUST_ID` AS `ID`, \
         (CASE WHEN STATUS = 'A' THEN 1 ELSE 0 END) AS `ACTIVE`, \
         STR_TO_DATE(s.`BIRTH_YYYYMMDD`, '%Y%m%d') AS `BIRTHDATE`, \
         s.`BALANCE` AS `BALANCE_DEC`\nFROM `stg` s;\n"
    );
}

#[test]
fn keywords_and_line_endings() {
    let parsed = CbTransformParser::new().parse("move a -> b\r\ncompute c = a * 2\r\nif x > 1 then y=2 else 3\r\n");
    assert!(parsed.skipped.is_empty());
    assert_eq!(
        parsed.program.statements,
        vec![
            CbTransformStatement::Move { source: "a".into(), target: "b".into() },
            CbTransformStatement::Compute { target: "c".into(), expression: "a * 2".into() },
            CbTransformStatement::Conditional {
                condition: "x > 1".into(),
                target: "y".into(),
                then_value: "2".into(),
                else_value: "3".into(),
            },
        ]
    );
}

#[test]
fn unrecognised_lines_are_reported_with_numbers() {
    let parsed = CbTransformParser::new().parse("MOVE A -> B\nDROP TABLE x\nIF a THEN 1 ELSE 2\n");
    assert_eq!(parsed.program.statements.len(), 1);
    let lines: Vec<_> = parsed.skipped.iter().map(|s| s.line_number).collect();
    assert_eq!(lines, vec![2, 3]);
}

#[test]
fn identity_program_for_fixture() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/customer.cpy");
    let cb = CbCopybookParser::new().parse_file(&path).unwrap().copybook;
    let program = CbTransformProgram::identity_for(&cb);

    assert_eq!(
        program.to_script(),
        "MOVE CUST_ID -> CUST_ID\n\
         MOVE CUST_NAME -> CUST_NAME\n\
         MOVE BIRTH_YYYYMMDD -> BIRTH_YYYYMMDD\n\
         MOVE BALANCE -> BALANCE\n\
         MOVE PHONE -> PHONE\n\
         MOVE STATUS -> STATUS\n\
         DATE8 BIRTHDATE = BIRTH_YYYYMMDD\n"
    );

    let reparsed = CbTransformParser::new().parse(&program.to_script()).program;
    assert_eq!(reparsed, program);
}

#[test]
fn programs_survive_json() {
    let program = CbTransformProgram::new()
        .add_statement(CbTransformStatement::Comp3 { field: "AMT".into() })
        .add_statement(CbTransformStatement::Date8 {
            target: "D".into(),
            source: "RAW".into(),
        });
    let json = program.to_json().unwrap();
    assert!(json.contains("\"kind\": \"comp3\""));
    assert_eq!(CbTransformProgram::from_json(&json).unwrap(), program);
    assert!(CbTransformProgram::from_json("{\"statements\": 3}").is_err());
}

#[test]
fn known_columns_replace_the_star() {
    let sql = CbTransformCompiler::new()
        .with_source_columns(vec!["ID".into(), "NAME".into()])
        .compile("stg", "v", &CbTransformProgram::new());
    assert_eq!(sql, "CREATE OR REPLACE VIEW `v` AS\nSELECT s.`ID`, s.`NAME`\nFROM `stg` s;\n");
}
