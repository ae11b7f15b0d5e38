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

use std::collections::VecDeque;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::errors::Result;

/// Line-delimited text input consumed by the loader.
#[async_trait]
pub trait CbLineSource: Send {
    /// Display name of the input, usually the file name.
    fn name(&self) -> &str;

    /// Next line without its terminator, or `None` at end of input.
    async fn next_line(&mut self) -> Result<Option<String>>;

    /// Raw bytes consumed so far.
    fn bytes_read(&self) -> u64 {
        0
    }
}

/// Decodes ISO-8859-1 bytes; every byte maps to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|b| char::from(*b)).collect()
}

/// [`CbLineSource`] over any buffered async reader.
pub struct CbLineReader<R> {
    name: String,
    reader: R,
    buf: Vec<u8>,
    pending: VecDeque<String>,
    bytes_read: u64,
}

impl CbLineReader<BufReader<File>> {
    /// Opens `path`; the source is named after the file name component.
    pub async fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, BufReader::new(file)))
    }
}

impl<R> CbLineReader<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
            buf: Vec::with_capacity(256),
            pending: VecDeque::new(),
            bytes_read: 0,
        }
    }
}

#[async_trait]
impl<R> CbLineSource for CbLineReader<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.pending.pop_front() {
            return Ok(Some(line));
        }

        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf).await?;
        if read == 0 {
            return Ok(None);
        }
        self.bytes_read += read as u64;

        let mut chunk = self.buf.as_slice();
        if let Some(rest) = chunk.strip_suffix(b"\n") {
            chunk = rest;
        }
        if let Some(rest) = chunk.strip_suffix(b"\r") {
            chunk = rest;
        }

        // Bare carriage returns also end a line.
        let mut parts = chunk.split(|b| *b == b'\r').map(decode_latin1);
        let first = parts.next().unwrap_or_default();
        self.pending.extend(parts);
        Ok(Some(first))
    }

    fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}
