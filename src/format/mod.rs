// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk file formats: DOCS, DICT, POSTINGS.
//!
//! Each file carries its own 4-byte magic and a `u16` version so a reader
//! can reject a mismatched file before trusting anything else in it.

pub mod dict;
pub mod docs;
pub mod postings;

pub use dict::{DictEntry, DictReader, DictWriter};
pub use docs::{DocInfo, DocsReader, DocsWriter};
pub use postings::{PostingsReader, PostingsWriter};

pub const VERSION: u16 = 3;

/// Bytes occupied by magic + version at the start of every file.
pub const HEADER_SIZE: usize = 6;

pub const DOCS_MAGIC: [u8; 4] = *b"DOCS";
pub const DICT_MAGIC: [u8; 4] = *b"DICT";
pub const POSTINGS_MAGIC: [u8; 4] = *b"POST";

/// Maximum size of a single term, in bytes, per the DICT layout (u8 length).
pub const MAX_TERM_LEN: usize = 255;

/// Maximum size of a url/title field, in bytes, per the DOCS layout (u16 length).
pub const MAX_FIELD_LEN: usize = 65535;

use std::io::{self, Read, Write};

/// Read and validate a 4-byte magic followed by a `u16` version.
pub fn read_header<R: Read>(r: &mut R, expected_magic: [u8; 4]) -> io::Result<()> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != expected_magic {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "bad magic: expected {:?}, got {:?}",
                String::from_utf8_lossy(&expected_magic),
                String::from_utf8_lossy(&magic)
            ),
        ));
    }
    let mut version_bytes = [0u8; 2];
    r.read_exact(&mut version_bytes)?;
    let version = u16::from_le_bytes(version_bytes);
    if version != VERSION {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unsupported format version {version}, expected {VERSION}"),
        ));
    }
    Ok(())
}

pub fn write_header<W: Write>(w: &mut W, magic: [u8; 4]) -> io::Result<()> {
    w.write_all(&magic)?;
    w.write_all(&VERSION.to_le_bytes())?;
    Ok(())
}
