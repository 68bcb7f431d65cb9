// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! SPIMI-style index builder.
//!
//! Reads `url\ttitle\ttext\n` lines from a document source, accumulates a
//! term -> docId -> positions map in memory, spills it to a sorted block
//! file every [`crate::config::block_size`] documents, then k-way merges
//! the blocks into the final DICT and POSTINGS files.

mod block;
mod merge;

use std::collections::BTreeMap;
use std::fs;
use std::io::BufRead;
use std::path::Path;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{Result, SearchError};
use crate::format::dict::{DictEntry, DictWriter};
use crate::format::docs::DocsWriter;
use crate::format::postings::{PostingMap, PostingsWriter};
use crate::tokenizer::Tokenizer;

use block::BlockWriter;
use merge::MergeIterator;

type InMemoryIndex = BTreeMap<String, PostingMap>;

#[cfg(feature = "parallel")]
fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<10} {pos} docs {msg}")
        .unwrap()
        .progress_chars("oo.")
}

/// Builds a fresh index into `out_dir` from lines read off `source`,
/// tokenizing each document's text through `tokenizer`.
pub fn run_build(
    out_dir: &Path,
    tokenizer: &mut Tokenizer,
    source: impl BufRead,
) -> Result<()> {
    if out_dir.exists() {
        fs::remove_dir_all(out_dir)?;
    }
    fs::create_dir_all(out_dir)?;
    let temp_dir = out_dir.join("temp");
    fs::create_dir_all(&temp_dir)?;

    #[cfg(feature = "parallel")]
    let pb = {
        let pb = ProgressBar::new_spinner();
        pb.set_style(progress_style());
        pb.set_prefix("indexing");
        pb
    };

    let mut memory: InMemoryIndex = BTreeMap::new();
    let mut docs = DocsWriter::new();
    let mut block_paths = Vec::new();
    let mut doc_id: u32 = 0;
    let block_size = crate::config::block_size();

    for line in source.lines() {
        let line = line.map_err(|e| SearchError::Source(e.to_string()))?;
        let (url, title, text) = split_document_line(&line);

        let tokens = tokenizer.tokenize(text);
        for (position, term) in tokens.into_iter().enumerate() {
            memory
                .entry(term)
                .or_default()
                .entry(doc_id)
                .or_default()
                .push(position as u32);
        }
        docs.push(url.to_string(), title.to_string());
        doc_id += 1;

        #[cfg(feature = "parallel")]
        pb.set_position(doc_id as u64);

        if doc_id as usize % block_size == 0 {
            block_paths.push(spill_block(&temp_dir, block_paths.len(), &memory)?);
            memory.clear();
        }
    }
    if !memory.is_empty() {
        block_paths.push(spill_block(&temp_dir, block_paths.len(), &memory)?);
        memory.clear();
    }

    #[cfg(feature = "parallel")]
    pb.finish_with_message(format!("{} documents", doc_id));

    docs.write(&out_dir.join("index.docs"))?;

    let term_count = merge_blocks(out_dir, &block_paths)?;

    fs::remove_dir_all(&temp_dir)?;

    tracing::info!(documents = doc_id, terms = term_count, "build complete");
    eprintln!(
        "build complete: {doc_id} documents, {term_count} terms -> {}",
        out_dir.display()
    );

    Ok(())
}

/// A short line with missing tab fields defaults the missing parts to
/// empty rather than aborting the whole build.
fn split_document_line(line: &str) -> (&str, &str, &str) {
    let mut parts = line.splitn(3, '\t');
    let url = parts.next().unwrap_or("");
    let title = parts.next().unwrap_or("");
    let text = parts.next().unwrap_or("");
    (url, title, text)
}

fn spill_block(
    temp_dir: &Path,
    index: usize,
    memory: &InMemoryIndex,
) -> Result<std::path::PathBuf> {
    let path = temp_dir.join(format!("block_{index}.tmp"));
    let mut w = BlockWriter::create(&path)?;
    for (term, postings) in memory {
        w.write_term(term, postings)?;
    }
    w.finish()?;
    Ok(path)
}

fn merge_blocks(out_dir: &Path, block_paths: &[std::path::PathBuf]) -> Result<u32> {
    let mut dict = DictWriter::create(&out_dir.join("index.dict"))?;
    let mut postings_writer = PostingsWriter::create(&out_dir.join("index.postings"))?;

    let mut merge = MergeIterator::new(block_paths)?;
    let mut term_count = 0u32;
    while let Some((term, postings)) = merge.next()? {
        let offset = postings_writer.write_term(&postings)?;
        dict.append(
            &term,
            DictEntry {
                postings_offset: offset,
                doc_count: postings.len() as u32,
            },
        )?;
        term_count += 1;
    }

    postings_writer.finish()?;
    dict.finish()?;
    Ok(term_count)
}
