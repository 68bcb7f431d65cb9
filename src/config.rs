// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build- and query-time tunables, each overridable via environment
//! variable for testing without recompiling.

/// Documents buffered in memory before a block is spilled to disk.
pub fn block_size() -> usize {
    env_usize("POSTEX_BLOCK_SIZE", 5000)
}

/// Initial chunk size read from the POSTINGS file per `get_postings` call.
pub fn read_buffer_size() -> usize {
    env_usize("POSTEX_READ_BUFFER", 1024 * 1024)
}

/// Bytes that must remain in the sliding buffer before a doc-entry decode;
/// below this the buffer is refilled.
pub const DOC_ENTRY_SAFETY_MARGIN: usize = 10;

/// Bytes that must remain before a position-entry decode.
pub const POSITION_ENTRY_SAFETY_MARGIN: usize = 5;

/// Maximum results rendered per query.
pub fn result_limit() -> usize {
    env_usize("SEARCH_RESULT_LIMIT", 10)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
