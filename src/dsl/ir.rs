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

use serde::{Deserialize, Serialize};

use crate::copybook::{CbCopybook, CbPictureShape};
use crate::ddl::quote_ident;
use crate::errors::{CbError, Result};

/// Alias of the source relation inside generated views.
pub const SOURCE_ALIAS: &str = "s";

/// Suffix given to COMP3 passthrough columns.
pub const COMP3_SUFFIX: &str = "_DEC";

/// One recognised line of a transformation script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CbTransformStatement {
    /// `MOVE src -> dst` or `MOVE src TO dst`.
    Move { source: String, target: String },
    /// `COMPUTE dst = expr`; the expression is passed through verbatim.
    Compute { target: String, expression: String },
    /// `IF cond THEN dst=v1 ELSE dst=v2`.
    Conditional {
        condition: String,
        target: String,
        then_value: String,
        else_value: String,
    },
    /// `DATE8 dst = src`, an eight-digit year-month-day text.
    Date8 { target: String, source: String },
    /// `COMP3 name`, a passthrough under a suffixed alias.
    Comp3 { field: String },
}

impl CbTransformStatement {
    /// Projection expression with its alias.
    pub fn projection(&self) -> String {
        match self {
            CbTransformStatement::Move { source, target } => {
                format!("{}.{} AS {}", SOURCE_ALIAS, quote_ident(source), quote_ident(target))
            }
            CbTransformStatement::Compute { target, expression } => {
                format!("({}) AS {}", expression, quote_ident(target))
            }
            CbTransformStatement::Conditional {
                condition,
                target,
                then_value,
                else_value,
            } => format!(
                "(CASE WHEN {} THEN {} ELSE {} END) AS {}",
                condition,
                then_value,
                else_value,
                quote_ident(target)
            ),
            CbTransformStatement::Date8 { target, source } => format!(
                "STR_TO_DATE({}.{}, '%Y%m%d') AS {}",
                SOURCE_ALIAS,
                quote_ident(source),
                quote_ident(target)
            ),
            CbTransformStatement::Comp3 { field } => format!(
                "{}.{} AS {}",
                SOURCE_ALIAS,
                quote_ident(field),
                quote_ident(&format!("{field}{COMP3_SUFFIX}"))
            ),
        }
    }

    /// Script line that parses back to this statement.
    pub fn to_script_line(&self) -> String {
        match self {
            CbTransformStatement::Move { source, target } => format!("MOVE {source} -> {target}"),
            CbTransformStatement::Compute { target, expression } => {
                format!("COMPUTE {target} = {expression}")
            }
            CbTransformStatement::Conditional {
                condition,
                target,
                then_value,
                else_value,
            } => format!("IF {condition} THEN {target}={then_value} ELSE {target}={else_value}"),
            CbTransformStatement::Date8 { target, source } => format!("DATE8 {target} = {source}"),
            CbTransformStatement::Comp3 { field } => format!("COMP3 {field}"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbTransformProgram {
    pub statements: Vec<CbTransformStatement>,
}

impl CbTransformProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_statement(mut self, statement: CbTransformStatement) -> Self {
        self.statements.push(statement);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Default script for a copybook: every data column moved to itself,
    /// plus a date column `<X>DATE` for each eight-digit `<X>-YYYYMMDD` field.
    pub fn identity_for(copybook: &CbCopybook) -> Self {
        let mut program = CbTransformProgram::new();
        let mut dates = Vec::new();

        for id in copybook.data_fields() {
            let node = copybook.node(id);
            let column = node.column_name();
            program.statements.push(CbTransformStatement::Move {
                source: column.clone(),
                target: column.clone(),
            });

            let eight_digits = node
                .picture
                .as_ref()
                .is_some_and(|p| p.shape() == CbPictureShape::Numeric { digits: 8 });
            let upper = column.to_ascii_uppercase();
            if let Some(prefix) = upper.strip_suffix("_YYYYMMDD") {
                if eight_digits && !prefix.is_empty() {
                    dates.push(CbTransformStatement::Date8 {
                        target: format!("{}DATE", &column[..prefix.len()]),
                        source: column,
                    });
                }
            }
        }

        program.statements.extend(dates);
        program
    }

    /// Renders the program back to script text, one statement per line.
    pub fn to_script(&self) -> String {
        let mut script = String::new();
        for statement in &self.statements {
            script.push_str(&statement.to_script_line());
            script.push('\n');
        }
        script
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CbError::internal(format!("Failed to serialize program: {}", e)))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CbError::validation(format!("Invalid program JSON: {}", e)))
    }
}
