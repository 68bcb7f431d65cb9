// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use postex::cli::{Cli, Commands};
use postex::config::result_limit;
use postex::error::SearchError;
use postex::query;
use postex::reader::IndexReader;
use postex::tokenizer::Tokenizer;

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Index { out_dir } => run_index(&out_dir, &cli.tokenizer),
        Commands::Search { index_dir } => run_search(&index_dir, &cli.tokenizer),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal error");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_index(out_dir: &str, tokenizer_path: &str) -> postex::error::Result<()> {
    let mut tokenizer = Tokenizer::spawn(tokenizer_path)?;
    let stdin = io::stdin();
    let result = postex::build::run_build(Path::new(out_dir), &mut tokenizer, stdin.lock());
    tokenizer.close();
    result
}

fn run_search(index_dir: &str, tokenizer_path: &str) -> postex::error::Result<()> {
    let mut reader = IndexReader::open(Path::new(index_dir))?;
    let mut tokenizer = Tokenizer::spawn(tokenizer_path).map_err(|e| {
        tracing::warn!(error = %e, "tokenizer unavailable at search startup");
        e
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Ready").map_err(SearchError::Io)?;
    out.flush().map_err(SearchError::Io)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(SearchError::Io)?;
        if line.trim() == "exit" {
            break;
        }

        let results = query::search(&line, &mut reader, &mut tokenizer);
        let limit = result_limit();

        writeln!(out, "Found {}", results.len()).map_err(SearchError::Io)?;
        for doc_id in results.into_iter().take(limit) {
            if let Some(info) = reader.doc_info(doc_id) {
                writeln!(out, "{} ({})", info.title, info.url).map_err(SearchError::Io)?;
            }
        }
        writeln!(out, "__END_QUERY__").map_err(SearchError::Io)?;
        out.flush().map_err(SearchError::Io)?;
    }

    tokenizer.close();
    Ok(())
}
