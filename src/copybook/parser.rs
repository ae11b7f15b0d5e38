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
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::copybook::node::{CbCopybook, CbNode, CbNodeId};
use crate::copybook::picture::{CbPicture, CbSignPosition, CbUsage};
use crate::errors::Result;
use crate::layout::{CbLayoutCalculator, CbLayoutConfig};

const FIELD_PATTERN: &str = concat!(
    r"(?i)^(?P<level>\d{2})\s+(?P<name>[A-Z0-9][A-Z0-9-]*)",
    r"(?:\s+REDEFINES\s+(?P<redefines>[A-Z0-9][A-Z0-9-]*))?",
    r"(?:\s+OCCURS\s+(?P<occurs>\d+)(?:\s+TIMES)?)?",
    r"(?:\s+PIC(?:TURE)?(?:\s+IS)?\s+(?P<pic>\S+))?",
    r"(?:\s+(?:USAGE\s+)?(?:IS\s+)?(?P<usage>COMPUTATIONAL-3|COMPUTATIONAL|COMP-3|COMP|PACKED-DECIMAL|BINARY|DISPLAY)\b)?",
    r"(?:\s+SIGN\s+(?:IS\s+)?(?P<sign>LEADING|TRAILING)\b)?",
    r"(?:\s+OCCURS\s+(?P<trailing_occurs>\d+)(?:\s+TIMES)?)?",
);

fn field_regex() -> &'static Regex {
    static FIELD: OnceLock<Regex> = OnceLock::new();
    FIELD.get_or_init(|| Regex::new(FIELD_PATTERN).expect("field pattern is valid"))
}

/// Parser settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CbParserConfig {
    /// Leading columns discarded from every line longer than this width.
    /// Zero treats the text as free format.
    pub sequence_area: usize,
    /// Marker that starts a comment when it opens the line or follows
    /// whitespace outside a quoted literal.
    pub comment_marker: char,
}

impl Default for CbParserConfig {
    fn default() -> Self {
        Self {
            sequence_area: 6,
            comment_marker: '*',
        }
    }
}

/// Why a line did not produce a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CbSkipReason {
    /// Text does not have the shape of a field definition.
    NoMatch,
    /// Level `00`, which would collide with the synthetic root.
    InvalidLevel,
    /// Level `88` condition name.
    ConditionName,
    /// Level `66` RENAMES entry.
    Renames,
    /// The nearest ancestor is an elementary item.
    NestedUnderElementary,
}

/// A non-blank line that was ignored while building the tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbSkippedLine {
    /// One-based physical line number.
    pub line_number: usize,
    pub text: String,
    pub reason: CbSkipReason,
}

#[derive(Clone, Debug)]
pub struct CbParseResult {
    pub copybook: CbCopybook,
    /// Total record length, computed without touching node offsets.
    pub record_length: usize,
    pub skipped: Vec<CbSkippedLine>,
}

/// Line-oriented copybook grammar parser.
///
/// Parsing never fails: lines that do not fit the grammar are dropped and
/// reported in [`CbParseResult::skipped`].
#[derive(Clone, Debug, Default)]
pub struct CbCopybookParser {
    config: CbParserConfig,
    layout: CbLayoutConfig,
}

impl CbCopybookParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: CbParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Layout settings used for the reported record length.
    pub fn with_layout_config(mut self, layout: CbLayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn config(&self) -> &CbParserConfig {
        &self.config
    }

    pub fn parse(&self, text: &str) -> CbParseResult {
        let mut copybook = CbCopybook::new();
        let mut stack: Vec<(CbNodeId, u32)> = vec![(CbNodeId::ROOT, 0)];
        let mut skipped = Vec::new();

        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        for (idx, raw) in normalized.split('\n').enumerate() {
            let line = self.strip_line(raw);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut skip = |reason: CbSkipReason| {
                log::debug!("skipping copybook line {}: {:?}", idx + 1, reason);
                skipped.push(CbSkippedLine {
                    line_number: idx + 1,
                    text: line.to_string(),
                    reason,
                });
            };

            let Some(caps) = field_regex().captures(line) else {
                skip(CbSkipReason::NoMatch);
                continue;
            };

            let node = build_node(&caps);
            match node.level {
                0 => {
                    skip(CbSkipReason::InvalidLevel);
                    continue;
                }
                66 => {
                    skip(CbSkipReason::Renames);
                    continue;
                }
                88 => {
                    skip(CbSkipReason::ConditionName);
                    continue;
                }
                _ => {}
            }

            while stack.last().is_some_and(|(_, level)| *level >= node.level) {
                stack.pop();
            }
            let parent = stack.last().map(|(id, _)| *id).unwrap_or(CbNodeId::ROOT);
            if !copybook.node(parent).is_group() {
                skip(CbSkipReason::NestedUnderElementary);
                continue;
            }

            let level = node.level;
            match copybook.push(parent, node) {
                Ok(id) => stack.push((id, level)),
                Err(err) => {
                    log::warn!("could not attach copybook line {}: {}", idx + 1, err);
                }
            }
        }

        let record_length = CbLayoutCalculator::new()
            .with_config(self.layout.clone())
            .total_length(&copybook);
        log::info!(
            "parsed copybook: {} nodes, record length {}, {} lines skipped",
            copybook.len(),
            record_length,
            skipped.len()
        );

        CbParseResult {
            copybook,
            record_length,
            skipped,
        }
    }

    /// Reads and parses a copybook file.
    pub fn parse_file(&self, path: &Path) -> Result<CbParseResult> {
        let bytes = std::fs::read(path)?;
        let text = crate::ingest::reader::decode_latin1(&bytes);
        Ok(self.parse(&text))
    }

    /// Drops the sequence area and any trailing comment.
    fn strip_line<'a>(&self, raw: &'a str) -> &'a str {
        let area = self.config.sequence_area;
        let mut line = raw;
        if area > 0 && line.chars().count() > area {
            let cut = line.char_indices().nth(area).map(|(i, _)| i).unwrap_or(line.len());
            line = &line[cut..];
        }

        let marker = self.config.comment_marker;
        let mut quote: Option<char> = None;
        let mut prev_ws = true;
        for (i, ch) in line.char_indices() {
            match quote {
                Some(q) if ch == q => quote = None,
                Some(_) => {}
                None if ch == '\'' || ch == '"' => quote = Some(ch),
                None if ch == marker && prev_ws => return &line[..i],
                None => {}
            }
            prev_ws = ch.is_whitespace();
        }
        line
    }
}

/// Parses `text` with default settings.
pub fn parse(text: &str) -> CbParseResult {
    CbCopybookParser::new().parse(text)
}

fn build_node(caps: &Captures<'_>) -> CbNode {
    let level = caps
        .name("level")
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(0);
    let name = caps.name("name").map(|m| m.as_str()).unwrap_or_default();

    let mut node = match caps.name("pic") {
        Some(pic) => {
            let mut leaf = CbNode::group(name, level);
            leaf.picture = Some(CbPicture::parse(pic.as_str()));
            leaf
        }
        None => CbNode::group(name, level),
    };

    node.redefines = caps.name("redefines").map(|m| m.as_str().to_string());
    node.occurs = caps
        .name("occurs")
        .or_else(|| caps.name("trailing_occurs"))
        .and_then(|m| m.as_str().parse::<u32>().ok());
    node.usage = caps
        .name("usage")
        .map(|m| CbUsage::from_keyword(m.as_str()))
        .unwrap_or_default();
    node.sign = caps
        .name("sign")
        .and_then(|m| CbSignPosition::from_keyword(m.as_str()));
    node
}
