// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Opens an index directory and serves positional postings by term.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Result, SearchError};
use crate::format::dict::DictReader;
use crate::format::docs::{DocInfo, DocsReader};
use crate::format::postings::{PostingMap, PostingsReader};

#[derive(Debug)]
pub struct IndexReader {
    docs: DocsReader,
    dict: DictReader,
    postings: PostingsReader,
}

impl IndexReader {
    pub fn open(index_dir: &Path) -> Result<Self> {
        let docs = DocsReader::open(&index_dir.join("index.docs")).map_err(|e| {
            SearchError::UnsupportedFormat {
                path: index_dir.join("index.docs"),
                reason: e.to_string(),
            }
        })?;
        let dict = DictReader::open(&index_dir.join("index.dict")).map_err(|e| {
            SearchError::UnsupportedFormat {
                path: index_dir.join("index.dict"),
                reason: e.to_string(),
            }
        })?;
        let postings = PostingsReader::open(&index_dir.join("index.postings")).map_err(|e| {
            SearchError::UnsupportedFormat {
                path: index_dir.join("index.postings"),
                reason: e.to_string(),
            }
        })?;

        let postings_len = postings.byte_len().map_err(SearchError::Io)?;
        if let Some((term, entry)) = dict
            .entries
            .iter()
            .find(|(_, entry)| entry.postings_offset >= postings_len)
        {
            return Err(SearchError::MalformedIndex(format!(
                "dict entry {term:?} points to offset {} past end of postings file ({postings_len} bytes)",
                entry.postings_offset
            )));
        }

        Ok(Self {
            docs,
            dict,
            postings,
        })
    }

    pub fn doc_count(&self) -> u32 {
        self.docs.docs.len() as u32
    }

    pub fn doc_info(&self, doc_id: u32) -> Option<&DocInfo> {
        self.docs.get(doc_id)
    }

    /// Positional postings for `term`, or an empty map if the term is not
    /// in the dictionary, or if the on-disk block is corrupt (logged, not
    /// propagated — see the query-time error policy).
    pub fn get_postings(&mut self, term: &str) -> PostingMap {
        let Some(entry) = self.dict.get(term) else {
            return BTreeMap::new();
        };
        match self.postings.read_term(entry.postings_offset) {
            Ok(postings) => postings,
            Err(e) => {
                tracing::warn!(term, error = %e, "truncated or malformed postings block");
                BTreeMap::new()
            }
        }
    }
}
