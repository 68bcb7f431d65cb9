// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI surface: `index` builds a search index, `search` opens one and
//! drives an interactive query loop over stdin/stdout.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "postex", about = "Boolean full-text search over a compressed inverted index", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the external tokenizer executable
    #[arg(long, global = true, default_value = "tokenizer")]
    pub tokenizer: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an index from `url\ttitle\ttext` lines read on stdin
    Index {
        /// Output directory for index.docs/index.dict/index.postings
        out_dir: String,
    },

    /// Open an index and answer queries read one per line from stdin
    Search {
        /// Directory containing index.docs/index.dict/index.postings
        index_dir: String,
    },
}
