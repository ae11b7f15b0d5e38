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

//! # Transformation DSL Module
//!
//! A line-oriented mini-language describing derived columns, compiled into a
//! view over the staging table. Translation is pattern substitution per line;
//! expressions and conditions are copied into the output as written.
//!
//! ## Architecture
//!
//! - **Parser** ([parser.rs](parser/index.html)): classifies each line by its
//!   leading keyword into a statement; other lines are reported as skipped
//! - **IR** ([ir.rs](ir/index.html)): statements and programs, rendering to
//!   projections and back to script text
//! - **Compiler** ([compiler.rs](compiler/index.html)): assembles the
//!   `CREATE OR REPLACE VIEW` statement
//!
//! ## Statements
//!
//! ```text
//! -- comments start with two dashes
//! MOVE CUST_ID -> CUSTOMER_ID
//! MOVE CUST_NAME TO NAME
//! COMPUTE TOTAL = PRICE * QTY
//! IF STATUS = 'A' THEN ACTIVE=1 ELSE ACTIVE=0
//! DATE8 BIRTHDATE = BIRTH_YYYYMMDD
//! COMP3 BALANCE
//! ```

pub mod compiler;
pub mod ir;
pub mod parser;

pub use compiler::{compile, CbTransformCompiler};
pub use ir::{CbTransformProgram, CbTransformStatement};
pub use parser::{parse_statement, CbSkippedStatement, CbTransformParseResult, CbTransformParser};
