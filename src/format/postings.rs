// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `index.postings`: varbyte+delta positional posting lists.
//!
//! ```text
//! magic   : "POST"
//! version : u16
//! [ per term, at the offset recorded in the dictionary:
//!     varbyte doc_count
//!     for each doc, ascending by DocId:
//!         varbyte doc_delta
//!         varbyte freq
//!         freq x varbyte pos_delta
//! ]
//! ```
//!
//! The reader never loads the whole file: it seeks to a term's offset and
//! decodes with a sliding buffer, refilling before a number could straddle
//! the edge of what's currently buffered.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::codec::{decode_varbyte, encode_delta, encode_varbyte, MAX_VARBYTE_BYTES};
use crate::config::{DOC_ENTRY_SAFETY_MARGIN, POSITION_ENTRY_SAFETY_MARGIN};

use super::{write_header, POSTINGS_MAGIC};

/// One term's positional postings: DocId -> ascending positions.
pub type PostingMap = BTreeMap<u32, Vec<u32>>;

pub struct PostingsWriter {
    file: BufWriter<File>,
    offset: u64,
}

impl PostingsWriter {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);
        write_header(&mut w, POSTINGS_MAGIC)?;
        Ok(Self {
            file: w,
            offset: super::HEADER_SIZE as u64,
        })
    }

    /// Writes one term's posting block and returns its starting offset.
    pub fn write_term(&mut self, postings: &PostingMap) -> io::Result<u64> {
        let start = self.offset;
        let mut buf = Vec::new();

        encode_varbyte(postings.len() as u64, &mut buf);

        let doc_ids: Vec<u64> = postings.keys().map(|&d| d as u64).collect();
        let doc_deltas = encode_delta(&doc_ids);

        for (&doc_delta, positions) in doc_deltas.iter().zip(postings.values()) {
            encode_varbyte(doc_delta, &mut buf);
            encode_varbyte(positions.len() as u64, &mut buf);
            let pos_u64: Vec<u64> = positions.iter().map(|&p| p as u64).collect();
            let pos_deltas = encode_delta(&pos_u64);
            for d in pos_deltas {
                encode_varbyte(d, &mut buf);
            }
        }

        self.file.write_all(&buf)?;
        self.offset += buf.len() as u64;
        Ok(start)
    }

    pub fn finish(mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Random-access reader over the POSTINGS file.
#[derive(Debug)]
pub struct PostingsReader {
    file: File,
}

impl PostingsReader {
    pub fn open(path: &Path) -> io::Result<Self> {
        let mut file = File::open(path)?;
        let mut header = [0u8; super::HEADER_SIZE];
        file.read_exact(&mut header)?;
        if header[0..4] != POSTINGS_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "bad POSTINGS magic",
            ));
        }
        let version = u16::from_le_bytes([header[4], header[5]]);
        if version != super::VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unsupported POSTINGS version {version}"),
            ));
        }
        Ok(Self { file })
    }

    /// Total size of the underlying file, in bytes.
    pub fn byte_len(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Decodes the posting block starting at `offset`, reading with a
    /// sliding buffer so a varbyte decode never needs to straddle a gap
    /// the buffer hasn't refilled yet.
    pub fn read_term(&mut self, offset: u64) -> io::Result<PostingMap> {
        self.file.seek(SeekFrom::Start(offset))?;
        let mut buf = SlidingBuffer::new(&mut self.file);

        let doc_count = buf.read_varbyte(DOC_ENTRY_SAFETY_MARGIN)? as usize;
        let mut result = PostingMap::new();
        let mut doc_id: u64 = 0;

        for i in 0..doc_count {
            let doc_delta = buf.read_varbyte(DOC_ENTRY_SAFETY_MARGIN)?;
            doc_id = if i == 0 { doc_delta } else { doc_id + doc_delta };

            let freq = buf.read_varbyte(POSITION_ENTRY_SAFETY_MARGIN)? as usize;
            let mut positions = Vec::with_capacity(freq);
            let mut pos: u64 = 0;
            for j in 0..freq {
                let pos_delta = buf.read_varbyte(POSITION_ENTRY_SAFETY_MARGIN)?;
                pos = if j == 0 { pos_delta } else { pos + pos_delta };
                positions.push(pos as u32);
            }
            result.insert(doc_id as u32, positions);
        }

        Ok(result)
    }
}

/// Reads from an underlying `Read` in chunks, refilling whenever fewer
/// than `margin` bytes remain so a single varbyte never straddles a gap.
struct SlidingBuffer<'a, R: Read> {
    inner: &'a mut R,
    buf: Vec<u8>,
    pos: usize,
    eof: bool,
}

impl<'a, R: Read> SlidingBuffer<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            pos: 0,
            eof: false,
        }
    }

    fn ensure(&mut self, margin: usize) -> io::Result<()> {
        if self.eof || self.buf.len() - self.pos >= margin {
            return Ok(());
        }
        self.buf.drain(..self.pos);
        self.pos = 0;

        let target = crate::config::read_buffer_size().max(margin + MAX_VARBYTE_BYTES);
        let mut chunk = vec![0u8; target];
        let mut total_read = 0;
        loop {
            let n = self.inner.read(&mut chunk[total_read..])?;
            if n == 0 {
                self.eof = true;
                break;
            }
            total_read += n;
            if total_read >= target || self.buf.len() + total_read >= margin + MAX_VARBYTE_BYTES {
                break;
            }
        }
        self.buf.extend_from_slice(&chunk[..total_read]);
        Ok(())
    }

    fn read_varbyte(&mut self, margin: usize) -> io::Result<u64> {
        self.ensure(margin)?;
        let (value, consumed) = decode_varbyte(&self.buf[self.pos..])?;
        self.pos += consumed;
        Ok(value)
    }
}
