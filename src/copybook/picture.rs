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

use std::fmt;

use serde::{Deserialize, Serialize};

/// Compact storage notation of an elementary item (`X(10)`, `9(5)V99`, ...).
///
/// The text is kept upper-cased with any trailing period removed. Nothing is
/// rejected here: notation that cannot be classified simply has the
/// [`CbPictureShape::Unknown`] shape and a zero width.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CbPicture(String);

/// Classification of a picture string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CbPictureShape {
    /// `X`/`A` run of the given width.
    Alphanumeric { width: usize },
    /// Pure digit run.
    Numeric { digits: usize },
    /// Digit run split by the implied decimal marker `V`.
    Decimal { integer: usize, fraction: usize },
    /// Nothing recognisable.
    Unknown,
}

impl CbPicture {
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim().trim_end_matches('.').to_ascii_uppercase();
        CbPicture(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the notation contains a digit marker.
    pub fn is_numeric(&self) -> bool {
        self.0.contains('9')
    }

    /// True when the notation carries an operational sign (`S9(5)`).
    pub fn has_sign_symbol(&self) -> bool {
        self.0.starts_with('S')
    }

    pub fn shape(&self) -> CbPictureShape {
        let pic = self.0.as_str();

        let width = symbol_width(pic, 'X').saturating_add(symbol_width(pic, 'A'));
        if width > 0 {
            return CbPictureShape::Alphanumeric { width };
        }

        if let Some((left, right)) = pic.split_once('V') {
            let integer = symbol_width(left, '9');
            let fraction = symbol_width(right, '9');
            if integer > 0 || fraction > 0 {
                return CbPictureShape::Decimal { integer, fraction };
            }
            return CbPictureShape::Unknown;
        }

        match symbol_width(pic, '9') {
            0 => CbPictureShape::Unknown,
            digits => CbPictureShape::Numeric { digits },
        }
    }

    /// Byte length of one occurrence under a display (text digit) encoding.
    pub fn display_length(&self, signed: bool) -> usize {
        self.storage_length(CbUsage::Display, signed)
    }

    /// Byte length of one occurrence for the given usage.
    pub fn storage_length(&self, usage: CbUsage, signed: bool) -> usize {
        match self.shape() {
            CbPictureShape::Alphanumeric { width } => width,
            CbPictureShape::Numeric { digits } => usage.storage_bytes(digits, signed),
            CbPictureShape::Decimal { integer, fraction } => {
                usage.storage_bytes(integer.saturating_add(fraction), signed)
            }
            CbPictureShape::Unknown => 0,
        }
    }
}

impl fmt::Display for CbPicture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Total width contributed by `symbol` in `pic`.
///
/// Each occurrence counts as one position unless it is immediately followed
/// by a parenthesised repeat count, so `X(3)XX` is five wide. A repeat count
/// that does not parse falls back to a single position.
pub fn symbol_width(pic: &str, symbol: char) -> usize {
    let chars: Vec<char> = pic.chars().collect();
    let mut width = 0usize;
    let mut idx = 0usize;

    while idx < chars.len() {
        if chars[idx] != symbol {
            idx += 1;
            continue;
        }

        if chars.get(idx + 1) == Some(&'(') {
            let close = chars[idx + 2..].iter().position(|c| *c == ')');
            if let Some(rel) = close {
                let count: String = chars[idx + 2..idx + 2 + rel].iter().collect();
                if let Ok(n) = count.trim().parse::<usize>() {
                    width = width.saturating_add(n);
                    idx += rel + 3;
                    continue;
                }
            }
        }

        width = width.saturating_add(1);
        idx += 1;
    }

    width
}

/// Physical encoding family of a field.
///
/// Only [`CbUsage::Display`] is used for length estimation by default; the
/// other widths are reachable through `CbSizingMode::Usage`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CbUsage {
    #[default]
    Display,
    Comp,
    Comp3,
    Binary,
}

impl CbUsage {
    /// Maps a usage keyword to its variant; anything unknown is display.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim().to_ascii_uppercase().as_str() {
            "COMP" | "COMPUTATIONAL" => CbUsage::Comp,
            "COMP-3" | "COMPUTATIONAL-3" | "PACKED-DECIMAL" => CbUsage::Comp3,
            "BINARY" => CbUsage::Binary,
            _ => CbUsage::Display,
        }
    }

    /// Bytes needed to store `digits` digits in this encoding.
    pub fn storage_bytes(self, digits: usize, signed: bool) -> usize {
        match self {
            CbUsage::Display => digits.saturating_add(usize::from(signed)),
            CbUsage::Comp3 => digits / 2 + 1,
            CbUsage::Comp | CbUsage::Binary => match digits {
                0 => 0,
                1..=4 => 2,
                5..=9 => 4,
                _ => 8,
            },
        }
    }
}

/// Position of a separate sign byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CbSignPosition {
    Leading,
    Trailing,
}

impl CbSignPosition {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_uppercase().as_str() {
            "LEADING" => Some(CbSignPosition::Leading),
            "TRAILING" => Some(CbSignPosition::Trailing),
            _ => None,
        }
    }
}
