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

//! # Layout Module
//!
//! Assigns byte offsets and storage lengths to every node of a copybook.
//!
//! The walk is pre-order with a running cursor that starts at zero on the
//! first top-level item:
//!
//! - a group's length is the span its children consumed, times its repeat
//!   count
//! - a leaf's length is the estimate for its notation, times its repeat count
//!
//! REDEFINES items are laid out sequentially like any other sibling. The
//! aliasing relation is reported separately through [`CbRedefinesGroup`] and
//! [`CbCopybook::aliases`], so a union-aware layout can be added later
//! without changing the tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::copybook::{CbCopybook, CbNode, CbNodeId};

/// How elementary lengths are estimated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CbSizingMode {
    /// Every number is assumed to be stored as display digits.
    #[default]
    Display,
    /// Use the byte width of the declared usage (packed, binary, ...).
    Usage,
}

/// Strategy for repeated items when they are staged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CbOccursMode {
    /// Repetitions stay inline in the parent row.
    #[default]
    Flatten,
    /// Repetitions belong in a child table.
    Normalize,
}

/// Strategy for alias groups when they are staged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum CbRedefinesMode {
    /// Every variant is stored.
    #[default]
    StoreAll,
    /// A rule picks the active variant.
    Discriminator { rule: String },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CbLayoutConfig {
    pub sizing: CbSizingMode,
    pub occurs_mode: CbOccursMode,
    pub redefines_mode: CbRedefinesMode,
}

/// A repeated item and the strategy configured for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbOccursDefinition {
    pub field_name: String,
    pub count: u32,
    pub mode: CbOccursMode,
}

/// An item together with every sibling that redefines it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbRedefinesGroup {
    pub base_field: String,
    pub variants: Vec<String>,
    pub mode: CbRedefinesMode,
    pub discriminator_rule: Option<String>,
}

/// Placement of one node after a layout pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbFieldLayout {
    pub name: String,
    pub level: u32,
    pub depth: usize,
    pub offset: usize,
    pub length: usize,
    pub is_group: bool,
    pub picture: Option<String>,
    pub occurs: Option<u32>,
    pub redefines: Option<String>,
}

/// Everything a layout pass learns about a copybook.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CbLayoutReport {
    pub record_length: usize,
    pub fields: Vec<CbFieldLayout>,
    pub occurs: Vec<CbOccursDefinition>,
    pub redefines: Vec<CbRedefinesGroup>,
}

#[derive(Clone, Debug, Default)]
pub struct CbLayoutCalculator {
    config: CbLayoutConfig,
}

impl CbLayoutCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: CbLayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CbLayoutConfig {
        &self.config
    }

    /// Writes offset and length into every node, root included, and returns
    /// the record length. Running it again yields the same values.
    pub fn compute_offsets(&self, copybook: &mut CbCopybook) -> usize {
        let mut placements = Vec::with_capacity(copybook.len() + 1);
        let total = self.walk_children(copybook, CbNodeId::ROOT, 0, &mut |id, offset, length| {
            placements.push((id, offset, length));
        });

        for (id, offset, length) in placements {
            let node = copybook.node_mut(id);
            node.offset = Some(offset);
            node.storage_length = Some(length);
        }
        let root = copybook.node_mut(CbNodeId::ROOT);
        root.offset = Some(0);
        root.storage_length = Some(total);

        log::debug!("computed offsets for {} nodes, record length {}", copybook.len(), total);
        total
    }

    /// Same walk as [`Self::compute_offsets`] without touching the tree.
    pub fn total_length(&self, copybook: &CbCopybook) -> usize {
        self.walk_children(copybook, CbNodeId::ROOT, 0, &mut |_, _, _| {})
    }

    /// Length of one occurrence of an elementary item.
    pub fn element_length(&self, node: &CbNode) -> usize {
        let Some(picture) = node.picture.as_ref() else {
            return 0;
        };
        match self.config.sizing {
            CbSizingMode::Display => picture.display_length(node.is_signed()),
            CbSizingMode::Usage => picture.storage_length(node.usage, node.is_signed()),
        }
    }

    /// Repeated items in traversal order.
    pub fn occurs_definitions(&self, copybook: &CbCopybook) -> Vec<CbOccursDefinition> {
        copybook
            .preorder()
            .into_iter()
            .filter_map(|id| {
                let node = copybook.node(id);
                node.occurs.map(|count| CbOccursDefinition {
                    field_name: node.name.clone(),
                    count,
                    mode: self.config.occurs_mode,
                })
            })
            .collect()
    }

    /// Alias groups keyed by their base item, in base declaration order.
    pub fn redefines_groups(&self, copybook: &CbCopybook) -> Vec<CbRedefinesGroup> {
        let mut by_base: BTreeMap<CbNodeId, Vec<CbNodeId>> = BTreeMap::new();
        for (alias, base) in copybook.aliases() {
            by_base.entry(base).or_default().push(alias);
        }

        let rule = match &self.config.redefines_mode {
            CbRedefinesMode::Discriminator { rule } => Some(rule.clone()),
            CbRedefinesMode::StoreAll => None,
        };

        by_base
            .into_iter()
            .map(|(base, variants)| CbRedefinesGroup {
                base_field: copybook.node(base).name.clone(),
                variants: variants
                    .into_iter()
                    .map(|id| copybook.node(id).name.clone())
                    .collect(),
                mode: self.config.redefines_mode.clone(),
                discriminator_rule: rule.clone(),
            })
            .collect()
    }

    /// Runs a layout pass and collects the per-field placements.
    pub fn report(&self, copybook: &mut CbCopybook) -> CbLayoutReport {
        let record_length = self.compute_offsets(copybook);
        let fields = copybook
            .preorder()
            .into_iter()
            .map(|id| {
                let node = copybook.node(id);
                CbFieldLayout {
                    name: node.name.clone(),
                    level: node.level,
                    depth: copybook.depth(id),
                    offset: node.offset.unwrap_or_default(),
                    length: node.storage_length.unwrap_or_default(),
                    is_group: node.is_group(),
                    picture: node.picture.as_ref().map(|p| p.to_string()),
                    occurs: node.occurs,
                    redefines: node.redefines.clone(),
                }
            })
            .collect();

        CbLayoutReport {
            record_length,
            fields,
            occurs: self.occurs_definitions(copybook),
            redefines: self.redefines_groups(copybook),
        }
    }

    fn walk_children<F>(&self, copybook: &CbCopybook, parent: CbNodeId, start: usize, visit: &mut F) -> usize
    where
        F: FnMut(CbNodeId, usize, usize),
    {
        let mut cursor = start;
        for child in copybook.children(parent) {
            cursor = self.walk(copybook, *child, cursor, visit);
        }
        cursor
    }

    fn walk<F>(&self, copybook: &CbCopybook, id: CbNodeId, offset: usize, visit: &mut F) -> usize
    where
        F: FnMut(CbNodeId, usize, usize),
    {
        let node = copybook.node(id);
        let span = if node.is_group() {
            self.walk_children(copybook, id, offset, visit) - offset
        } else {
            self.element_length(node)
        };
        let length = span.saturating_mul(node.repeat_count());
        visit(id, offset, length);
        offset.saturating_add(length)
    }
}

/// Default-configured [`CbLayoutCalculator::compute_offsets`].
pub fn compute_offsets(copybook: &mut CbCopybook) -> usize {
    CbLayoutCalculator::new().compute_offsets(copybook)
}

/// Default-configured [`CbLayoutCalculator::total_length`].
pub fn total_length(copybook: &CbCopybook) -> usize {
    CbLayoutCalculator::new().total_length(copybook)
}
