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

use std::path::PathBuf;

use cobo::copybook::{
    parse, CbCopybookParser, CbNodeId, CbParserConfig, CbSignPosition, CbSkipReason, CbUsage,
};
use proptest::prelude::*;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn free_format() -> CbCopybookParser {
    CbCopybookParser::new().with_config(CbParserConfig {
        sequence_area: 0,
        ..CbParserConfig::default()
    })
}

#[test]
fn simple_record_builds_one_group_with_two_leaves() {
    let result = free_format().parse("01 REC.\n05 ID PIC 9(3).\n05 NAME PIC X(5).");
    let cb = &result.copybook;

    let top = cb.children(CbNodeId::ROOT);
    assert_eq!(top.len(), 1);
    assert_eq!(cb.children(top[0]).len(), 2);
    assert!(cb.node(top[0]).is_group());
    assert_eq!(result.record_length, 8);
    assert!(result.skipped.is_empty());
}

#[test]
fn fixture_copybook_is_parsed_with_sequence_area() {
    let result = CbCopybookParser::new()
        .parse_file(&fixture("customer.cpy"))
        .unwrap();
    let cb = &result.copybook;

    assert_eq!(result.record_length, 67);
    assert_eq!(
        cb.column_names(),
        vec!["CUST_ID", "CUST_NAME", "BIRTH_YYYYMMDD", "BALANCE", "PHONE", "STATUS"]
    );

    let balance = cb.node(cb.find("BALANCE").unwrap());
    assert_eq!(balance.sign, Some(CbSignPosition::Trailing));
    assert!(balance.is_signed());

    let phones = cb.node(cb.find("PHONES").unwrap());
    assert!(phones.is_group());
    assert_eq!(phones.occurs, Some(2));

    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].reason, CbSkipReason::ConditionName);
    assert_eq!(result.skipped[0].line_number, 11);
}

#[test]
fn line_endings_are_normalised() {
    let crlf = free_format().parse("01 A.\r\n05 B PIC X.\r05 C PIC X.\r\n");
    assert_eq!(crlf.copybook.column_names(), vec!["B", "C"]);
}

#[test]
fn keywords_are_case_insensitive() {
    let result = free_format().parse("01 rec.\n   05 amt pic s9(4) usage comp-3 sign leading.");
    let cb = &result.copybook;
    let amt = cb.node(cb.find("AMT").unwrap());
    assert_eq!(amt.picture.as_ref().unwrap().as_str(), "S9(4)");
    assert_eq!(amt.usage, CbUsage::Comp3);
    assert_eq!(amt.sign, Some(CbSignPosition::Leading));
}

#[test]
fn lower_levels_pop_back_to_ancestors() {
    let result = free_format().parse(
        "01 A.\n05 B.\n10 C PIC X.\n05 D PIC X.\n01 E.\n03 F PIC X.\n02 G PIC X.",
    );
    let cb = &result.copybook;

    let a = cb.find("A").unwrap();
    let e = cb.find("E").unwrap();
    assert_eq!(cb.children(CbNodeId::ROOT), &[a, e]);
    assert_eq!(cb.node(cb.find("C").unwrap()).parent(), cb.find("B"));
    assert_eq!(cb.node(cb.find("D").unwrap()).parent(), Some(a));
    // 02 after 03 pops F and lands under E.
    assert_eq!(cb.node(cb.find("G").unwrap()).parent(), Some(e));
}

#[test]
fn unmatched_lines_never_fail() {
    let result = free_format().parse("garbage\n5 SHORT PIC X.\n00 ZERO PIC X.\n01 OK PIC X.");
    assert_eq!(result.copybook.len(), 1);
    let reasons: Vec<_> = result.skipped.iter().map(|s| s.reason).collect();
    assert_eq!(
        reasons,
        vec![CbSkipReason::NoMatch, CbSkipReason::NoMatch, CbSkipReason::InvalidLevel]
    );
}

#[test]
fn oversized_repeat_counts_do_not_overflow() {
    for pic in [
        "9(18446744073709551615)V9",
        "9(18446744073709551615) SIGN TRAILING",
        "X(18446744073709551615)X",
    ] {
        let result = free_format().parse(&format!("01 REC.\n05 A PIC {}.\n05 B PIC X(2).", pic));
        assert_eq!(result.copybook.len(), 3);
        assert!(result.skipped.is_empty());
        assert_eq!(result.record_length, usize::MAX);
    }
}

#[test]
fn default_parse_uses_sequence_area() {
    let result = parse("      01 REC.\n      05 F PIC X(4).");
    assert_eq!(result.record_length, 4);
}

const LEVELS: [u32; 4] = [1, 5, 10, 15];

proptest! {
    #[test]
    fn top_level_count_matches_minimum_level_lines(
        picks in prop::collection::vec((0usize..4, any::<bool>()), 1..40)
    ) {
        let mut text = String::new();
        for (idx, (level_idx, leaf)) in picks.iter().enumerate() {
            let level = if idx == 0 { LEVELS[0] } else { LEVELS[*level_idx] };
            let pic = if *leaf { " PIC X(2)" } else { "" };
            text.push_str(&format!("{:02} F{}{}.\n", level, idx, pic));
        }

        let expected = picks
            .iter()
            .enumerate()
            .filter(|(idx, (level_idx, _))| *idx == 0 || *level_idx == 0)
            .count();
        let result = free_format().parse(&text);
        prop_assert_eq!(result.copybook.children(CbNodeId::ROOT).len(), expected);
    }
}
