// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Temporary SPIMI block files.
//!
//! A block is the term-sorted dump of the in-memory index accumulated over
//! one window of documents. Each block owns a contiguous, disjoint range of
//! DocIds by construction, so merging two blocks that share a term is a
//! plain map union rather than anything doc-id-aware.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::codec::{decode_varbyte, encode_delta, encode_varbyte};
use crate::format::postings::PostingMap;

pub struct BlockWriter {
    file: BufWriter<File>,
    term_count: u32,
}

impl BlockWriter {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);
        w.write_all(&0u32.to_le_bytes())?; // placeholder term count
        Ok(Self {
            file: w,
            term_count: 0,
        })
    }

    pub fn write_term(&mut self, term: &str, postings: &PostingMap) -> io::Result<()> {
        let term_bytes = term.as_bytes();
        self.file.write_all(&(term_bytes.len() as u16).to_le_bytes())?;
        self.file.write_all(term_bytes)?;

        let mut buf = Vec::new();
        encode_varbyte(postings.len() as u64, &mut buf);
        let doc_ids: Vec<u64> = postings.keys().map(|&d| d as u64).collect();
        let deltas = encode_delta(&doc_ids);
        for (&delta, positions) in deltas.iter().zip(postings.values()) {
            encode_varbyte(delta, &mut buf);
            encode_varbyte(positions.len() as u64, &mut buf);
            let pos_u64: Vec<u64> = positions.iter().map(|&p| p as u64).collect();
            for d in encode_delta(&pos_u64) {
                encode_varbyte(d, &mut buf);
            }
        }
        self.file.write_all(&(buf.len() as u32).to_le_bytes())?;
        self.file.write_all(&buf)?;
        self.term_count += 1;
        Ok(())
    }

    pub fn finish(mut self) -> io::Result<()> {
        use std::io::{Seek, SeekFrom};
        self.file.flush()?;
        let mut file = self.file.into_inner().map_err(|e| e.into_error())?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&self.term_count.to_le_bytes())?;
        file.flush()
    }
}

/// Sequential reader over a block file; blocks are written term-sorted, so
/// this is exactly the iterator the k-way merge needs.
pub struct BlockReader {
    reader: BufReader<File>,
    remaining: u32,
}

impl BlockReader {
    pub fn open(path: &PathBuf) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut count_bytes = [0u8; 4];
        reader.read_exact(&mut count_bytes)?;
        Ok(Self {
            reader,
            remaining: u32::from_le_bytes(count_bytes),
        })
    }

    /// Reads the next `(term, postings)` entry, or `None` at end of block.
    pub fn next_entry(&mut self) -> io::Result<Option<(String, PostingMap)>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;

        let mut len_bytes = [0u8; 2];
        self.reader.read_exact(&mut len_bytes)?;
        let term_len = u16::from_le_bytes(len_bytes) as usize;
        let mut term_buf = vec![0u8; term_len];
        self.reader.read_exact(&mut term_buf)?;
        let term = String::from_utf8(term_buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut block_len_bytes = [0u8; 4];
        self.reader.read_exact(&mut block_len_bytes)?;
        let block_len = u32::from_le_bytes(block_len_bytes) as usize;
        let mut block = vec![0u8; block_len];
        self.reader.read_exact(&mut block)?;

        let postings = decode_block_postings(&block)?;
        Ok(Some((term, postings)))
    }
}

fn decode_block_postings(bytes: &[u8]) -> io::Result<PostingMap> {
    let mut pos = 0usize;
    let (doc_count, consumed) = decode_varbyte(&bytes[pos..])?;
    pos += consumed;

    let mut result = PostingMap::new();
    let mut doc_id: u64 = 0;
    for i in 0..doc_count {
        let (delta, consumed) = decode_varbyte(&bytes[pos..])?;
        pos += consumed;
        doc_id = if i == 0 { delta } else { doc_id + delta };

        let (freq, consumed) = decode_varbyte(&bytes[pos..])?;
        pos += consumed;
        let mut positions = Vec::with_capacity(freq as usize);
        let mut p: u64 = 0;
        for j in 0..freq {
            let (delta, consumed) = decode_varbyte(&bytes[pos..])?;
            pos += consumed;
            p = if j == 0 { delta } else { p + delta };
            positions.push(p as u32);
        }
        result.insert(doc_id as u32, positions);
    }
    Ok(result)
}
