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

//! # Copybook Module
//!
//! Field-tree model and grammar parser for copybook schema text.
//!
//! ## Components
//!
//! - **Node** ([node.rs](node/index.html)): arena-backed field tree. Nodes hold
//!   indices to their children and parent, the synthetic level-0 root is
//!   always node 0.
//! - **Picture** ([picture.rs](picture/index.html)): storage notation, usage and
//!   sign vocabulary, width extraction.
//! - **Parser** ([parser.rs](parser/index.html)): line grammar, sequence-area and
//!   comment stripping, level-based nesting.
//!
//! ## Example
//!
//! ```text
//!        01 CUSTOMER-REC.
//!           05 CUST-ID      PIC 9(6).
//!           05 CUST-NAME    PIC X(30).
//!           05 BALANCE      PIC S9(7)V99 SIGN TRAILING.
//! ```

pub mod node;
pub mod parser;
pub mod picture;

pub use node::{CbCopybook, CbNode, CbNodeId};
pub use parser::{
    parse, CbCopybookParser, CbParseResult, CbParserConfig, CbSkipReason, CbSkippedLine,
};
pub use picture::{symbol_width, CbPicture, CbPictureShape, CbSignPosition, CbUsage};
