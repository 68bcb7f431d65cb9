// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `index.dict`: the term → (postings offset, doc count) table.
//!
//! ```text
//! magic   : "DICT"
//! version : u16
//! count T : u32
//! entries : T x { u8 term_len, term_len bytes, u64 postings_offset, u32 doc_count }
//! ```
//!
//! Entries are written in ascending term order by the builder, which makes
//! the file itself a valid (if unindexed) sorted dictionary; the reader
//! still loads it wholesale into a hash map for O(1) lookup.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::{read_header, write_header, DICT_MAGIC, MAX_TERM_LEN};

#[derive(Debug, Clone, Copy)]
pub struct DictEntry {
    pub postings_offset: u64,
    pub doc_count: u32,
}

pub struct DictWriter {
    file: BufWriter<File>,
    count: u32,
}

impl DictWriter {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);
        write_header(&mut w, DICT_MAGIC)?;
        // Placeholder count, patched in `finish`.
        w.write_all(&0u32.to_le_bytes())?;
        Ok(Self { file: w, count: 0 })
    }

    /// Terms must be appended in ascending order; the caller (the merge
    /// step) is responsible for that ordering.
    pub fn append(&mut self, term: &str, entry: DictEntry) -> io::Result<()> {
        let mut bytes = term.as_bytes();
        if bytes.len() > MAX_TERM_LEN {
            bytes = &bytes[..MAX_TERM_LEN];
        }
        self.file.write_all(&[bytes.len() as u8])?;
        self.file.write_all(bytes)?;
        self.file.write_all(&entry.postings_offset.to_le_bytes())?;
        self.file.write_all(&entry.doc_count.to_le_bytes())?;
        self.count += 1;
        Ok(())
    }

    /// Flushes the file and patches in the real term count that was
    /// written as a placeholder at open time.
    pub fn finish(mut self) -> io::Result<()> {
        use std::io::{Seek, SeekFrom};
        self.file.flush()?;
        let mut file = self.file.into_inner().map_err(|e| e.into_error())?;
        file.seek(SeekFrom::Start(super::HEADER_SIZE as u64))?;
        file.write_all(&self.count.to_le_bytes())?;
        file.flush()
    }
}

#[derive(Debug)]
pub struct DictReader {
    pub entries: HashMap<String, DictEntry>,
}

impl DictReader {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut r = BufReader::new(file);
        read_header(&mut r, DICT_MAGIC)?;

        let mut count_bytes = [0u8; 4];
        r.read_exact(&mut count_bytes)?;
        let count = u32::from_le_bytes(count_bytes) as usize;

        let mut entries = HashMap::with_capacity(count);
        for _ in 0..count {
            let mut len_byte = [0u8; 1];
            r.read_exact(&mut len_byte)?;
            let term_len = len_byte[0] as usize;
            let mut term_buf = vec![0u8; term_len];
            r.read_exact(&mut term_buf)?;
            let term = String::from_utf8(term_buf)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

            let mut offset_bytes = [0u8; 8];
            r.read_exact(&mut offset_bytes)?;
            let postings_offset = u64::from_le_bytes(offset_bytes);

            let mut doc_count_bytes = [0u8; 4];
            r.read_exact(&mut doc_count_bytes)?;
            let doc_count = u32::from_le_bytes(doc_count_bytes);

            entries.insert(
                term,
                DictEntry {
                    postings_offset,
                    doc_count,
                },
            );
        }

        Ok(Self { entries })
    }

    pub fn get(&self, term: &str) -> Option<DictEntry> {
        self.entries.get(term).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.dict");

        let mut w = DictWriter::create(&path).unwrap();
        w.append(
            "brown",
            DictEntry {
                postings_offset: 6,
                doc_count: 3,
            },
        )
        .unwrap();
        w.append(
            "fox",
            DictEntry {
                postings_offset: 40,
                doc_count: 2,
            },
        )
        .unwrap();
        w.finish().unwrap();

        let r = DictReader::open(&path).unwrap();
        assert_eq!(r.entries.len(), 2);
        assert_eq!(r.get("brown").unwrap().doc_count, 3);
        assert!(r.get("missing").is_none());
    }
}
