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

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::copybook::picture::{CbPicture, CbSignPosition, CbUsage};
use crate::errors::{CbError, Result};

/// Index of a node inside a [`CbCopybook`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CbNodeId(usize);

impl CbNodeId {
    /// The synthetic level-0 root of every copybook.
    pub const ROOT: CbNodeId = CbNodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// One entry of the field tree.
///
/// A node is a group exactly when it has no storage notation. Offsets and
/// lengths stay `None` until a layout pass has run over the tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CbNode {
    pub name: String,
    pub level: u32,
    pub picture: Option<CbPicture>,
    pub usage: CbUsage,
    pub sign: Option<CbSignPosition>,
    pub occurs: Option<u32>,
    pub redefines: Option<String>,
    pub offset: Option<usize>,
    pub storage_length: Option<usize>,
    children: Vec<CbNodeId>,
    parent: Option<CbNodeId>,
}

impl CbNode {
    /// A group item: no notation, size derived from its children.
    pub fn group(name: impl Into<String>, level: u32) -> Self {
        CbNode {
            name: name.into(),
            level,
            picture: None,
            usage: CbUsage::Display,
            sign: None,
            occurs: None,
            redefines: None,
            offset: None,
            storage_length: None,
            children: Vec::new(),
            parent: None,
        }
    }

    /// An elementary item with the given storage notation.
    pub fn field(name: impl Into<String>, level: u32, picture: &str) -> Self {
        let mut node = CbNode::group(name, level);
        node.picture = Some(CbPicture::parse(picture));
        node
    }

    pub fn with_occurs(mut self, count: u32) -> Self {
        self.occurs = Some(count);
        self
    }

    pub fn with_usage(mut self, usage: CbUsage) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_sign(mut self, position: CbSignPosition) -> Self {
        self.sign = Some(position);
        self
    }

    pub fn with_redefines(mut self, target: impl Into<String>) -> Self {
        self.redefines = Some(target.into());
        self
    }

    pub fn is_group(&self) -> bool {
        self.picture.is_none()
    }

    /// A sign byte is reserved only when a SIGN clause was declared.
    pub fn is_signed(&self) -> bool {
        self.sign.is_some()
    }

    pub fn is_filler(&self) -> bool {
        self.name.eq_ignore_ascii_case("FILLER")
    }

    /// Whether the decoder should try to read this field as a number.
    pub fn is_numeric(&self) -> bool {
        self.picture.as_ref().is_some_and(CbPicture::is_numeric)
    }

    /// `max(occurs, 1)`.
    pub fn repeat_count(&self) -> usize {
        self.occurs.map(|n| n.max(1) as usize).unwrap_or(1)
    }

    /// Name used for generated columns and decoded row keys.
    pub fn column_name(&self) -> String {
        self.name.replace('-', "_")
    }

    pub fn children(&self) -> &[CbNodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<CbNodeId> {
        self.parent
    }
}

/// Field tree stored as an arena; parent links are plain indices.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CbCopybook {
    nodes: Vec<CbNode>,
}

impl Default for CbCopybook {
    fn default() -> Self {
        Self::new()
    }
}

impl CbCopybook {
    /// Creates a tree holding only the synthetic root.
    pub fn new() -> Self {
        CbCopybook {
            nodes: vec![CbNode::group("ROOT", 0)],
        }
    }

    pub fn root(&self) -> CbNodeId {
        CbNodeId::ROOT
    }

    /// Number of declared nodes, excluding the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: CbNodeId) -> Option<&CbNode> {
        self.nodes.get(id.0)
    }

    /// Node lookup for ids handed out by this tree.
    ///
    /// # Panics
    ///
    /// Panics when `id` belongs to another tree and is out of range.
    pub fn node(&self, id: CbNodeId) -> &CbNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: CbNodeId) -> &mut CbNode {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: CbNodeId) -> &[CbNodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Appends `node` as the last child of `parent`.
    ///
    /// Fails when the parent is unknown or is an elementary item.
    pub fn push(&mut self, parent: CbNodeId, mut node: CbNode) -> Result<CbNodeId> {
        let parent_node = self
            .get(parent)
            .ok_or_else(|| CbError::validation(format!("unknown parent node {}", parent.0)))?;
        if !parent_node.is_group() {
            return Err(CbError::schema(format!(
                "elementary item '{}' cannot have children",
                parent_node.name
            )));
        }

        let id = CbNodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// All nodes below the root in declaration (pre-order) order.
    pub fn preorder(&self) -> Vec<CbNodeId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<CbNodeId> = self.children(self.root()).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Elementary items in traversal order, FILLER included.
    pub fn leaves(&self) -> Vec<CbNodeId> {
        self.preorder()
            .into_iter()
            .filter(|id| !self.node(*id).is_group())
            .collect()
    }

    /// Elementary items that produce columns and decoded values.
    pub fn data_fields(&self) -> Vec<CbNodeId> {
        self.leaves()
            .into_iter()
            .filter(|id| !self.node(*id).is_filler())
            .collect()
    }

    /// Column names of [`Self::data_fields`].
    pub fn column_names(&self) -> Vec<String> {
        self.data_fields()
            .into_iter()
            .map(|id| self.node(id).column_name())
            .collect()
    }

    /// First node named `name`, compared case-insensitively.
    pub fn find(&self, name: &str) -> Option<CbNodeId> {
        self.preorder()
            .into_iter()
            .find(|id| self.node(*id).name.eq_ignore_ascii_case(name))
    }

    /// Distance from the root; top-level nodes have depth 1.
    pub fn depth(&self, id: CbNodeId) -> usize {
        let mut depth = 0;
        let mut cursor = self.get(id).and_then(CbNode::parent);
        while let Some(parent) = cursor {
            depth += 1;
            cursor = self.node(parent).parent;
        }
        depth
    }

    /// Dotted path from the top-level record down to `id`.
    pub fn qualified_name(&self, id: CbNodeId) -> String {
        let mut parts = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == CbNodeId::ROOT {
                break;
            }
            let node = self.node(current);
            parts.push(node.name.as_str());
            cursor = node.parent;
        }
        parts.reverse();
        parts.join(".")
    }

    /// Maps each redefining node to the earlier sibling it aliases.
    ///
    /// Targets that cannot be found among the preceding siblings are left
    /// out of the map.
    pub fn aliases(&self) -> BTreeMap<CbNodeId, CbNodeId> {
        let mut map = BTreeMap::new();
        for id in self.preorder() {
            let node = self.node(id);
            let Some(target) = node.redefines.as_deref() else {
                continue;
            };
            let Some(parent) = node.parent else {
                continue;
            };
            let siblings = self.children(parent);
            let position = siblings.iter().position(|s| *s == id).unwrap_or(0);
            let found = siblings[..position]
                .iter()
                .rev()
                .find(|s| self.node(**s).name.eq_ignore_ascii_case(target));
            match found {
                Some(base) => {
                    map.insert(id, *base);
                }
                None => log::debug!(
                    "REDEFINES target '{}' of '{}' not found among preceding siblings",
                    target,
                    node.name
                ),
            }
        }
        map
    }
}
