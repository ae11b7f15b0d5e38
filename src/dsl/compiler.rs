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

use crate::ddl::quote_ident;
use crate::dsl::ir::{CbTransformProgram, SOURCE_ALIAS};
use crate::dsl::parser::CbTransformParser;

/// Turns transformation programs into view definitions.
///
/// The output is always one statement of the form
///
/// ```text
/// CREATE OR REPLACE VIEW `target` AS
/// SELECT <projections>
/// FROM `source` s;
/// ```
///
/// An empty program selects every source column unchanged, either as `s.*`
/// or, when the source columns are known, as an explicit list.
#[derive(Clone, Debug, Default)]
pub struct CbTransformCompiler {
    source_columns: Option<Vec<String>>,
}

impl CbTransformCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the passthrough columns used when nothing else was projected.
    pub fn with_source_columns(mut self, columns: Vec<String>) -> Self {
        self.source_columns = Some(columns);
        self
    }

    pub fn compile(&self, source: &str, target: &str, program: &CbTransformProgram) -> String {
        let projections: Vec<String> = if program.is_empty() {
            self.passthrough()
        } else {
            program.statements.iter().map(|s| s.projection()).collect()
        };

        format!(
            "CREATE OR REPLACE VIEW {} AS\nSELECT {}\nFROM {} {};\n",
            quote_ident(target),
            projections.join(", "),
            quote_ident(source),
            SOURCE_ALIAS
        )
    }

    /// Parses `script` and compiles whatever it recognised.
    pub fn compile_script(&self, source: &str, target: &str, script: &str) -> String {
        let parsed = CbTransformParser::new().parse(script);
        if !parsed.skipped.is_empty() {
            log::debug!("{} transform lines were not recognised", parsed.skipped.len());
        }
        self.compile(source, target, &parsed.program)
    }

    fn passthrough(&self) -> Vec<String> {
        match &self.source_columns {
            Some(columns) if !columns.is_empty() => columns
                .iter()
                .map(|c| format!("{}.{}", SOURCE_ALIAS, quote_ident(c)))
                .collect(),
            _ => vec![format!("{}.*", SOURCE_ALIAS)],
        }
    }
}

/// Default-configured [`CbTransformCompiler::compile_script`].
pub fn compile(source: &str, target: &str, script: &str) -> String {
    CbTransformCompiler::new().compile_script(source, target, script)
}
