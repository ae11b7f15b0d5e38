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

//! Cobo command-line front-end.
//!
//! Subcommands:
//! - `layout`: print field offsets and lengths for a copybook
//! - `ddl`: print the staging table definition
//! - `transform`: compile a transformation script into a view definition
//! - `decode`: decode a data file into JSON lines on standard output
//! - `stage`: dry-run a full import against the in-memory executor

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use cobo::ingest::{CbLineReader, CbLineSource, CbRecordDecoder};
use cobo::{
    default_table_name, CbConfig, CbCopybookParser, CbImportService, CbLayoutCalculator,
    CbLogger, CbMemoryStorage, CbParseResult, CbSqlGenerator, CbTransformCompiler,
    CbTransformParser, CbTransformProgram,
};

#[derive(Parser, Debug)]
#[command(name = "cobo")]
#[command(about = "Copybook-driven staging of fixed-width records")]
#[command(version)]
struct Cli {
    /// Configuration file (.json, .yaml or .yml)
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level override (DEBUG, INFO, WARNING, ERROR, OFF)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print offsets and lengths of every field
    Layout {
        copybook: PathBuf,
        /// Emit the full layout report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the staging table definition
    Ddl {
        copybook: PathBuf,
        /// Table name (defaults to staging_<copybook stem>)
        #[arg(long, short = 't')]
        table: Option<String>,
    },
    /// Compile a transformation script into a view definition
    Transform {
        /// Source table
        #[arg(long)]
        source: String,
        /// View name
        #[arg(long)]
        target: String,
        /// Script file; without it the identity script of --copybook is used
        #[arg(long)]
        script: Option<PathBuf>,
        /// Copybook naming the source columns
        #[arg(long)]
        copybook: Option<PathBuf>,
    },
    /// Decode a data file into JSON lines
    Decode {
        copybook: PathBuf,
        data: PathBuf,
        /// Stop after this many records
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Run schema, import and transform against the in-memory executor
    Stage {
        copybook: PathBuf,
        data: PathBuf,
        /// Table name (defaults to staging_<data file stem>)
        #[arg(long, short = 't')]
        table: Option<String>,
        /// Transformation script applied after the import
        #[arg(long)]
        script: Option<PathBuf>,
    },
}

fn load_config(cli: &Cli) -> Result<CbConfig> {
    let mut config = match &cli.config {
        Some(path) => CbConfig::from_path(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => CbConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    Ok(config)
}

fn parse_copybook(config: &CbConfig, path: &Path) -> Result<CbParseResult> {
    CbCopybookParser::new()
        .with_config(config.parser.clone())
        .with_layout_config(config.layout.clone())
        .parse_file(path)
        .with_context(|| format!("reading copybook {}", path.display()))
}

fn read_script(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    CbLogger::init(config.logging.clone());

    let calculator = CbLayoutCalculator::new().with_config(config.layout.clone());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Layout { copybook, json } => {
            let mut parsed = parse_copybook(&config, copybook)?;
            let report = calculator.report(&mut parsed.copybook);
            if *json {
                serde_json::to_writer_pretty(&mut out, &report)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{:<40} {:>8} {:>8}  PICTURE", "FIELD", "OFFSET", "LENGTH")?;
                for field in &report.fields {
                    let indent = "  ".repeat(field.depth.saturating_sub(1));
                    writeln!(
                        out,
                        "{:<40} {:>8} {:>8}  {}",
                        format!("{}{}", indent, field.name),
                        field.offset,
                        field.length,
                        field.picture.as_deref().unwrap_or("")
                    )?;
                }
                writeln!(out, "record length: {}", report.record_length)?;
            }
        }
        Command::Ddl { copybook, table } => {
            let parsed = parse_copybook(&config, copybook)?;
            let table = table.clone().unwrap_or_else(|| default_table_name(copybook));
            let sql = CbSqlGenerator::new()
                .with_config(config.ddl.clone())
                .generate_schema(&table, &parsed.copybook);
            write!(out, "{}", sql)?;
        }
        Command::Transform {
            source,
            target,
            script,
            copybook,
        } => {
            let parsed = match copybook {
                Some(path) => Some(parse_copybook(&config, path)?),
                None => None,
            };
            let mut compiler = CbTransformCompiler::new();
            if let Some(parsed) = &parsed {
                compiler = compiler.with_source_columns(parsed.copybook.column_names());
            }
            let program = match (script, &parsed) {
                (Some(path), _) => CbTransformParser::new().parse(&read_script(path)?).program,
                (None, Some(parsed)) => CbTransformProgram::identity_for(&parsed.copybook),
                (None, None) => CbTransformProgram::new(),
            };
            write!(out, "{}", compiler.compile(source, target, &program))?;
        }
        Command::Decode {
            copybook,
            data,
            limit,
        } => {
            let mut parsed = parse_copybook(&config, copybook)?;
            calculator.compute_offsets(&mut parsed.copybook);
            let decoder = CbRecordDecoder::new(&parsed.copybook)?;
            let mut reader = CbLineReader::open(data)
                .await
                .with_context(|| format!("opening data file {}", data.display()))?;

            let mut emitted = 0u64;
            while let Some(line) = reader.next_line().await? {
                if limit.is_some_and(|max| emitted >= max) {
                    break;
                }
                if line.is_empty() {
                    continue;
                }
                writeln!(out, "{}", decoder.decode(&line).to_json())?;
                emitted += 1;
            }
            log::info!("decoded {} records from {}", emitted, reader.name());
        }
        Command::Stage {
            copybook,
            data,
            table,
            script,
        } => {
            let mut parsed = parse_copybook(&config, copybook)?;
            calculator.compute_offsets(&mut parsed.copybook);
            let table = table.clone().unwrap_or_else(|| default_table_name(data));

            let storage = Arc::new(CbMemoryStorage::new());
            let service = CbImportService::new(storage.clone())
                .with_config(config.import.clone())
                .with_ddl_config(config.ddl.clone());

            service.apply_schema(&table, &parsed.copybook).await?;
            let summary = service.import_records(data, &table, &parsed.copybook).await?;
            if let Some(path) = script {
                let view = CbTransformCompiler::new()
                    .with_source_columns(parsed.copybook.column_names())
                    .compile_script(&table, &format!("{table}_v"), &read_script(path)?);
                service.apply_transform(&view).await?;
            }

            serde_json::to_writer_pretty(&mut out, &summary)?;
            writeln!(out)?;
            for statement in storage.statements() {
                if !statement.starts_with("INSERT") {
                    writeln!(out, "{}", statement)?;
                }
            }
        }
    }

    Ok(())
}
