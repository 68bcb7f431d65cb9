// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! K-way merge across term-sorted SPIMI block files.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io;
use std::path::PathBuf;

use crate::format::postings::PostingMap;

use super::block::BlockReader;

struct HeapEntry {
    term: String,
    reader_idx: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term
    }
}
impl Eq for HeapEntry {}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.term.cmp(&other.term)
    }
}

/// Streams `(term, merged_postings)` pairs in ascending term order across
/// all block files. Matching terms across blocks are merged by key union:
/// safe because each block owns a disjoint DocId range.
pub struct MergeIterator {
    readers: Vec<BlockReader>,
    pending: Vec<Option<(String, PostingMap)>>,
    heap: BinaryHeap<Reverse<HeapEntry>>,
}

impl MergeIterator {
    pub fn new(block_paths: &[PathBuf]) -> io::Result<Self> {
        let mut readers = Vec::with_capacity(block_paths.len());
        for path in block_paths {
            readers.push(BlockReader::open(path)?);
        }

        let mut pending = Vec::with_capacity(readers.len());
        let mut heap = BinaryHeap::new();
        for (idx, reader) in readers.iter_mut().enumerate() {
            let entry = reader.next_entry()?;
            if let Some((term, _)) = &entry {
                heap.push(Reverse(HeapEntry {
                    term: term.clone(),
                    reader_idx: idx,
                }));
            }
            pending.push(entry);
        }

        Ok(Self {
            readers,
            pending,
            heap,
        })
    }

    pub fn next(&mut self) -> io::Result<Option<(String, PostingMap)>> {
        let Some(Reverse(HeapEntry { term, .. })) = self.heap.peek() else {
            return Ok(None);
        };
        let term = term.clone();

        let mut merged = PostingMap::new();
        while let Some(Reverse(top)) = self.heap.peek() {
            if top.term != term {
                break;
            }
            let Reverse(HeapEntry { reader_idx, .. }) = self.heap.pop().unwrap();

            if let Some((_, postings)) = self.pending[reader_idx].take() {
                merged.extend(postings);
            }

            let next_entry = self.readers[reader_idx].next_entry()?;
            if let Some((next_term, _)) = &next_entry {
                self.heap.push(Reverse(HeapEntry {
                    term: next_term.clone(),
                    reader_idx,
                }));
            }
            self.pending[reader_idx] = next_entry;
        }

        Ok(Some((term, merged)))
    }
}
