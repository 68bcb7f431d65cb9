// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Crate-wide error type.
//!
//! Low-level codec and header routines return `std::io::Result` directly
//! (see [`crate::codec`] and [`crate::format`]); this type is what callers
//! at component boundaries (build, open, tokenizer spawn) actually see.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("failed to read document source: {0}")]
    Source(String),

    #[error("tokenizer unavailable: {path}: {source}")]
    TokenizerUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported index format in {path}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },

    #[error("malformed index: {0}")]
    MalformedIndex(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
