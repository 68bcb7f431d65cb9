// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `index.docs`: the DocId → (url, title) table.
//!
//! ```text
//! magic   : "DOCS"
//! version : u16
//! count N : u32
//! offsets : N x u64   absolute file offsets of each record
//! records : N x DocInfo
//! DocInfo := u16 url_len, url_len bytes, u16 title_len, title_len bytes
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::{read_header, write_header, DOCS_MAGIC, HEADER_SIZE, MAX_FIELD_LEN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocInfo {
    pub url: String,
    pub title: String,
}

/// Accumulates `DocInfo` records during a build and writes them as one
/// `index.docs` file with an absolute-offset table, matching the layout a
/// reader can load in a single pass.
pub struct DocsWriter {
    docs: Vec<DocInfo>,
}

impl DocsWriter {
    pub fn new() -> Self {
        Self { docs: Vec::new() }
    }

    pub fn push(&mut self, url: String, title: String) {
        let url = truncate_field(url);
        let title = truncate_field(title);
        self.docs.push(DocInfo { url, title });
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn write(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);

        write_header(&mut w, DOCS_MAGIC)?;
        w.write_all(&(self.docs.len() as u32).to_le_bytes())?;

        // Absolute offsets start right after the N-entry offset table.
        let base_offset = HEADER_SIZE + 4 + self.docs.len() * 8;
        let mut offset = base_offset as u64;
        let mut offsets = Vec::with_capacity(self.docs.len());
        for doc in &self.docs {
            offsets.push(offset);
            offset += 2 + doc.url.len() as u64 + 2 + doc.title.len() as u64;
        }
        for off in &offsets {
            w.write_all(&off.to_le_bytes())?;
        }
        for doc in &self.docs {
            w.write_all(&(doc.url.len() as u16).to_le_bytes())?;
            w.write_all(doc.url.as_bytes())?;
            w.write_all(&(doc.title.len() as u16).to_le_bytes())?;
            w.write_all(doc.title.as_bytes())?;
        }
        w.flush()
    }
}

impl Default for DocsWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_field(mut s: String) -> String {
    if s.len() > MAX_FIELD_LEN {
        let mut end = MAX_FIELD_LEN;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}

/// Loads the full DOCS file into memory, indexed by DocId.
#[derive(Debug)]
pub struct DocsReader {
    pub docs: Vec<DocInfo>,
}

impl DocsReader {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut r = BufReader::new(file);
        read_header(&mut r, DOCS_MAGIC)?;

        let mut count_bytes = [0u8; 4];
        r.read_exact(&mut count_bytes)?;
        let count = u32::from_le_bytes(count_bytes) as usize;

        // Skip the offset table; records are read sequentially in order so
        // it is not needed for a full load.
        r.seek(SeekFrom::Current(count as i64 * 8))?;

        let mut docs = Vec::with_capacity(count);
        for _ in 0..count {
            let mut len_bytes = [0u8; 2];
            r.read_exact(&mut len_bytes)?;
            let url_len = u16::from_le_bytes(len_bytes) as usize;
            let mut url_buf = vec![0u8; url_len];
            r.read_exact(&mut url_buf)?;
            let url = String::from_utf8(url_buf)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

            r.read_exact(&mut len_bytes)?;
            let title_len = u16::from_le_bytes(len_bytes) as usize;
            let mut title_buf = vec![0u8; title_len];
            r.read_exact(&mut title_buf)?;
            let title = String::from_utf8(title_buf)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

            docs.push(DocInfo { url, title });
        }

        Ok(Self { docs })
    }

    pub fn get(&self, doc_id: u32) -> Option<&DocInfo> {
        self.docs.get(doc_id as usize)
    }
}
