//! Boolean full-text search over a compressed positional inverted index.
//!
//! The index is built offline by a SPIMI-style pipeline: documents stream
//! in from stdin, accumulate in memory until a block boundary, spill to a
//! sorted temporary block on disk, and a final k-way merge combines all
//! blocks into three on-disk artifacts sharing the `index.*` stem:
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌───────────────┐
//! │  build/mod   │────▶│ build/block  │────▶│  build/merge   │
//! │ (run_build)  │     │ (spill/read) │     │ (k-way merge)  │
//! └──────────────┘     └──────────────┘     └───────┬────────┘
//!                                                    ▼
//!                                       ┌─────────────────────────┐
//!                                       │  format::{docs,dict,     │
//!                                       │  postings}               │
//!                                       │  index.docs / .dict /    │
//!                                       │  .postings               │
//!                                       └────────────┬─────────────┘
//!                                                    ▼
//!                                       ┌─────────────────────────┐
//!                                       │        reader            │
//!                                       │    (IndexReader)          │
//!                                       └────────────┬─────────────┘
//!                                                    ▼
//!                                       ┌─────────────────────────┐
//!                                       │         query             │
//!                                       │ (lexer → parser → eval)   │
//!                                       └──────────────────────────┘
//! ```
//!
//! Postings are varbyte+delta compressed (see [`codec`]); the on-disk
//! layout for each file is documented in [`format`]. Queries go through a
//! hand-rolled lexer, implicit-AND insertion, and a shunting-yard parser
//! producing RPN ([`query::parse`]), evaluated against an [`reader::IndexReader`]
//! by [`query::evaluate`].

pub mod build;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod query;
pub mod reader;
pub mod tokenizer;

pub use error::{Result, SearchError};
pub use reader::IndexReader;
