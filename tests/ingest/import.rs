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

use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cobo::copybook::{CbCopybook, CbCopybookParser, CbParserConfig};
use cobo::errors::CbError;
use cobo::import::{CbImportConfig, CbImportService};
use cobo::ingest::CbLineReader;
use cobo::layout::compute_offsets;
use cobo::record::CbValue;
use cobo::storage::CbMemoryStorage;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn fixture_copybook() -> CbCopybook {
    let mut cb = CbCopybookParser::new()
        .parse_file(&fixture_path("customer.cpy"))
        .unwrap()
        .copybook;
    compute_offsets(&mut cb);
    cb
}

fn free_format(text: &str) -> CbCopybook {
    let mut cb = CbCopybookParser::new()
        .with_config(CbParserConfig {
            sequence_area: 0,
            ..CbParserConfig::default()
        })
        .parse(text)
        .copybook;
    compute_offsets(&mut cb);
    cb
}

fn numbered_lines(count: usize) -> String {
    (0..count).map(|i| format!("{:06}ROW\n", i)).collect()
}

fn numbered_copybook() -> CbCopybook {
    free_format("01 REC.\n05 SEQ PIC 9(6).\n05 TAG PIC X(3).")
}

fn decimal(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap()
}

#[tokio::test]
async fn fixture_file_is_staged() {
    let storage = Arc::new(CbMemoryStorage::new());
    let service = CbImportService::new(storage.clone());

    let summary = service
        .import_records(&fixture_path("customer.dat"), "staging_customer", &fixture_copybook())
        .await
        .unwrap();
    assert_eq!(summary.source_name, "customer.dat");
    assert_eq!(summary.lines_read, 4);
    assert_eq!(summary.empty_lines, 1);
    assert_eq!(summary.rows_written, 3);
    assert_eq!(summary.batches, 1);

    let rows = storage.rows("staging_customer");
    assert_eq!(rows.len(), 3);

    let alice = &rows[0];
    assert_eq!(
        alice.columns().collect::<Vec<_>>(),
        vec!["CUST_ID", "CUST_NAME", "BIRTH_YYYYMMDD", "BALANCE", "PHONE", "STATUS", "ImportFileName"]
    );
    assert_eq!(alice.get("CUST_ID").and_then(CbValue::as_decimal), Some(Decimal::from(1)));
    assert_eq!(alice.get("CUST_NAME"), Some(&CbValue::from("ALICE SMITH")));
    assert_eq!(alice.get("BALANCE").and_then(CbValue::as_decimal), Some(decimal("123.45")));
    assert_eq!(alice.get("PHONE"), Some(&CbValue::from("5550001111")));
    assert_eq!(alice.get("STATUS"), Some(&CbValue::from("A")));
    assert_eq!(alice.get("ImportFileName"), Some(&CbValue::from("customer.dat")));

    let bob = &rows[1];
    assert_eq!(bob.get("BALANCE").and_then(CbValue::as_decimal), Some(decimal("-10.00")));

    let carol = &rows[2];
    assert_eq!(carol.get("CUST_NAME"), Some(&CbValue::from("CAROL")));
    assert_eq!(carol.get("BIRTH_YYYYMMDD"), Some(&CbValue::Null));
    assert_eq!(carol.get("BALANCE"), Some(&CbValue::Null));
    assert_eq!(carol.get("STATUS"), Some(&CbValue::Null));
}

#[tokio::test]
async fn large_input_is_split_into_batches_and_sub_batches() {
    let storage = Arc::new(CbMemoryStorage::new());
    let service = CbImportService::new(storage.clone());
    let text = numbered_lines(2500);
    let mut source = CbLineReader::new("gen.dat", text.as_bytes());

    let summary = service
        .import_from_source(&mut source, "t", &numbered_copybook())
        .await
        .unwrap();
    assert_eq!(summary.rows_written, 2500);
    assert_eq!(summary.batches, 3);
    assert_eq!(storage.sub_batches(), 5);
    assert_eq!(storage.row_count("t"), 2500);

    let rows = storage.rows("t");
    assert_eq!(rows[2499].get("SEQ").and_then(CbValue::as_decimal), Some(Decimal::from(2499)));
}

#[tokio::test]
async fn failed_sub_batch_aborts_and_keeps_committed_rows() {
    let storage = Arc::new(CbMemoryStorage::new().fail_on_sub_batch(2));
    let service = CbImportService::new(storage.clone());
    let text = numbered_lines(2500);
    let mut source = CbLineReader::new("gen.dat", text.as_bytes());

    let err = service
        .import_from_source(&mut source, "t", &numbered_copybook())
        .await
        .unwrap_err();
    assert!(matches!(err, CbError::Storage { ref target, .. } if target == "t"));
    assert_eq!(storage.row_count("t"), 1000);
    assert_eq!(storage.sub_batches(), 3);
}

#[tokio::test]
async fn cancelled_before_start_writes_nothing() {
    let storage = Arc::new(CbMemoryStorage::new());
    let token = CancellationToken::new();
    token.cancel();
    let service = CbImportService::new(storage.clone()).with_cancellation(token);
    let text = numbered_lines(10);
    let mut source = CbLineReader::new("gen.dat", text.as_bytes());

    let err = service
        .import_from_source(&mut source, "t", &numbered_copybook())
        .await
        .unwrap_err();
    assert!(matches!(err, CbError::Cancelled { rows_written: 0 }));
    assert_eq!(storage.row_count("t"), 0);
}

#[tokio::test]
async fn cancellation_from_progress_drops_pending_rows() {
    let storage = Arc::new(CbMemoryStorage::new());
    let token = CancellationToken::new();
    let trigger = token.clone();
    let calls = Arc::new(AtomicU64::new(0));
    let seen = calls.clone();

    let service = CbImportService::new(storage.clone())
        .with_config(CbImportConfig {
            progress_interval: 1500,
            ..CbImportConfig::default()
        })
        .with_cancellation(token)
        .with_progress(Box::new(move |info| {
            seen.fetch_add(1, Ordering::SeqCst);
            if info.lines_read == 1500 {
                assert_eq!(info.rows_written, 1000);
                assert_eq!(info.current_file, "gen.dat");
                trigger.cancel();
            }
        }));
    let text = numbered_lines(2500);
    let mut source = CbLineReader::new("gen.dat", text.as_bytes());

    let err = service
        .import_from_source(&mut source, "t", &numbered_copybook())
        .await
        .unwrap_err();
    assert!(matches!(err, CbError::Cancelled { rows_written: 1000 }));
    assert_eq!(storage.row_count("t"), 1000);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn progress_reports_a_final_snapshot() {
    let storage = Arc::new(CbMemoryStorage::new());
    let last = Arc::new(AtomicU64::new(0));
    let seen = last.clone();
    let service = CbImportService::new(storage)
        .with_config(CbImportConfig {
            batch_size: 4,
            progress_interval: 0,
            ..CbImportConfig::default()
        })
        .with_progress(Box::new(move |info| {
            seen.store(info.rows_written, Ordering::SeqCst);
        }));
    let text = numbered_lines(10);
    let mut source = CbLineReader::new("gen.dat", text.as_bytes());

    let summary = service
        .import_from_source(&mut source, "t", &numbered_copybook())
        .await
        .unwrap();
    assert_eq!(summary.batches, 3);
    assert_eq!(last.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn short_lines_and_bad_numbers() {
    let storage = Arc::new(CbMemoryStorage::new());
    let service = CbImportService::new(storage.clone());
    let mut source = CbLineReader::new("mixed.dat", &b"12A\r\n7\r\n   \r\n"[..]);
    let cb = free_format("01 REC.\n05 NUM PIC 9(3).\n05 CODE PIC X(2).");

    let summary = service.import_from_source(&mut source, "t", &cb).await.unwrap();
    assert_eq!(summary.rows_written, 3);

    let rows = storage.rows("t");
    assert_eq!(rows[0].get("NUM"), Some(&CbValue::from("12A")));
    assert_eq!(rows[0].get("CODE"), Some(&CbValue::Null));
    assert_eq!(rows[1].get("NUM").and_then(CbValue::as_decimal), Some(Decimal::from(7)));
    assert_eq!(rows[2].get("NUM"), Some(&CbValue::Null));
}

#[tokio::test]
async fn latin1_bytes_are_preserved() {
    let mut file = tempfile::Builder::new().suffix(".dat").tempfile().unwrap();
    file.write_all(b"caf\xe9 \xa3\n").unwrap();
    file.flush().unwrap();

    let storage = Arc::new(CbMemoryStorage::new());
    let service = CbImportService::new(storage.clone());
    let cb = free_format("01 REC.\n05 WORD PIC X(4).\n05 FILLER PIC X.\n05 CUR PIC X.");

    service.import_records(file.path(), "t", &cb).await.unwrap();
    let rows = storage.rows("t");
    assert_eq!(rows[0].get("WORD"), Some(&CbValue::from("café")));
    assert_eq!(rows[0].get("CUR"), Some(&CbValue::from("£")));
}

#[tokio::test]
async fn schema_and_transform_go_through_storage() {
    let storage = Arc::new(CbMemoryStorage::new());
    let service = CbImportService::new(storage.clone());

    let ddl = service.apply_schema("staging_customer", &fixture_copybook()).await.unwrap();
    service.apply_transform("SELECT 1;").await.unwrap();

    assert_eq!(storage.statements(), vec![ddl, "SELECT 1;".to_string()]);
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_line_becomes_one_row(
        records in prop::collection::vec((0u32..1_000_000, "[A-Z]{1,8}"), 1..60),
        batch_size in 1usize..25,
    ) {
        let text: String = records
            .iter()
            .map(|(id, name)| format!("{:06}{:<8}\n", id, name))
            .collect();
        let cb = free_format("01 REC.\n05 ID PIC 9(6).\n05 NAME PIC X(8).");
        let storage = Arc::new(CbMemoryStorage::new());
        let service = CbImportService::new(storage.clone()).with_config(CbImportConfig {
            batch_size,
            ..CbImportConfig::default()
        });

        let summary = block_on(async {
            let mut source = CbLineReader::new("prop.dat", text.as_bytes());
            service.import_from_source(&mut source, "t", &cb).await
        })
        .unwrap();

        prop_assert_eq!(summary.rows_written as usize, records.len());
        prop_assert_eq!(summary.batches as usize, records.len().div_ceil(batch_size));
        let rows = storage.rows("t");
        for ((id, name), row) in records.iter().zip(rows.iter()) {
            prop_assert_eq!(row.get("ID").and_then(CbValue::as_decimal), Some(Decimal::from(*id)));
            prop_assert_eq!(row.get("NAME"), Some(&CbValue::from(name.as_str())));
        }
    }
}
