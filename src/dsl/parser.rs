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

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dsl::ir::{CbTransformProgram, CbTransformStatement};

/// Marker that opens a comment line.
pub const COMMENT_MARKER: &str = "--";

struct CbStatementPatterns {
    moves: Regex,
    compute: Regex,
    conditional: Regex,
    date8: Regex,
    comp3: Regex,
}

fn patterns() -> &'static CbStatementPatterns {
    static PATTERNS: OnceLock<CbStatementPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| CbStatementPatterns {
        moves: Regex::new(r"(?i)^MOVE\s+(?P<src>.+?)\s*(?:->|\s+TO\s+)\s*(?P<dst>.+)$")
            .expect("move pattern is valid"),
        compute: Regex::new(r"(?i)^COMPUTE\s+(?P<dst>[^=]+?)\s*=\s*(?P<expr>.+)$")
            .expect("compute pattern is valid"),
        conditional: Regex::new(r"(?i)^IF\s+(?P<cond>.+?)\s+THEN\s+(?P<then>.+?)\s+ELSE\s+(?P<else>.+)$")
            .expect("conditional pattern is valid"),
        date8: Regex::new(r"(?i)^DATE8\s+(?P<dst>[^=]+?)\s*=\s*(?P<src>.+)$")
            .expect("date8 pattern is valid"),
        comp3: Regex::new(r"(?i)^COMP3\s+(?P<name>.+)$").expect("comp3 pattern is valid"),
    })
}

/// A script line that was neither blank, a comment, nor a known statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbSkippedStatement {
    pub line_number: usize,
    pub text: String,
}

#[derive(Clone, Debug, Default)]
pub struct CbTransformParseResult {
    pub program: CbTransformProgram,
    pub skipped: Vec<CbSkippedStatement>,
}

/// Line-by-line reader of transformation scripts.
#[derive(Clone, Debug, Default)]
pub struct CbTransformParser;

impl CbTransformParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, script: &str) -> CbTransformParseResult {
        let mut result = CbTransformParseResult::default();

        for (idx, raw) in script.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(COMMENT_MARKER) {
                continue;
            }
            match parse_statement(line) {
                Some(statement) => result.program.statements.push(statement),
                None => {
                    log::debug!("unrecognised transform line {}: {}", idx + 1, line);
                    result.skipped.push(CbSkippedStatement {
                        line_number: idx + 1,
                        text: line.to_string(),
                    });
                }
            }
        }

        result
    }
}

/// Classifies one trimmed, non-comment line.
pub fn parse_statement(line: &str) -> Option<CbTransformStatement> {
    let p = patterns();

    if let Some(caps) = p.moves.captures(line) {
        let source = caps["src"].trim();
        let target = caps["dst"].trim();
        if source.is_empty() || target.is_empty() {
            return None;
        }
        return Some(CbTransformStatement::Move {
            source: source.to_string(),
            target: target.to_string(),
        });
    }

    if let Some(caps) = p.compute.captures(line) {
        return Some(CbTransformStatement::Compute {
            target: caps["dst"].trim().to_string(),
            expression: caps["expr"].trim().to_string(),
        });
    }

    if let Some(caps) = p.conditional.captures(line) {
        let (then_target, then_value) = split_assignment(&caps["then"]);
        let (else_target, else_value) = split_assignment(&caps["else"]);
        let target = then_target.or(else_target)?;
        return Some(CbTransformStatement::Conditional {
            condition: caps["cond"].trim().to_string(),
            target: target.to_string(),
            then_value: then_value.to_string(),
            else_value: else_value.to_string(),
        });
    }

    if let Some(caps) = p.date8.captures(line) {
        return Some(CbTransformStatement::Date8 {
            target: caps["dst"].trim().to_string(),
            source: caps["src"].trim().to_string(),
        });
    }

    if let Some(caps) = p.comp3.captures(line) {
        return Some(CbTransformStatement::Comp3 {
            field: caps["name"].trim().to_string(),
        });
    }

    None
}

/// `dst = value` into its parts; a bare value has no target.
fn split_assignment(text: &str) -> (Option<&str>, &str) {
    match text.split_once('=') {
        Some((target, value)) if !target.trim().is_empty() => {
            (Some(target.trim()), value.trim())
        }
        _ => (None, text.trim()),
    }
}
