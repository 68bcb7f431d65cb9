// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Boolean query engine: lexer, parser (implicit-AND + shunting-yard), and
//! RPN evaluator with phrase/proximity resolution.

mod eval;
mod lexer;
mod parser;

pub use eval::{evaluate, DocSet};
pub use parser::{parse, RpnToken};

use crate::reader::IndexReader;
use crate::tokenizer::Tokenizer;

/// Parses and evaluates a raw query string in one call.
pub fn search(query: &str, reader: &mut IndexReader, tokenizer: &mut Tokenizer) -> DocSet {
    let rpn = parse(query);
    evaluate(&rpn, reader, tokenizer)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use super::eval as eval_internal;
    use crate::format::dict::{DictEntry, DictWriter};
    use crate::format::docs::DocsWriter;
    use crate::format::postings::{PostingMap, PostingsWriter};
    use std::path::Path;
    use tempfile::tempdir;

    /// Builds the four-document corpus from the end-to-end test scenarios,
    /// with an identity tokenizer simulated by direct term insertion
    /// (bypassing a real subprocess, since `tokenize()` on a single bare
    /// word only ever needs its first returned term).
    fn build_corpus(dir: &Path) {
        let mut docs = DocsWriter::new();
        docs.push("u0".into(), "t0".into());
        docs.push("u1".into(), "t1".into());
        docs.push("u2".into(), "t2".into());
        docs.push("u3".into(), "t3".into());
        docs.write(&dir.join("index.docs")).unwrap();

        let corpus: [&[&str]; 4] = [
            &["the", "quick", "brown", "fox"],
            &["the", "lazy", "brown", "dog"],
            &["quick", "fox", "quick", "fox"],
            &["brown", "bear", "sleeps"],
        ];

        let mut index: std::collections::BTreeMap<String, PostingMap> = Default::default();
        for (doc_id, tokens) in corpus.iter().enumerate() {
            for (pos, term) in tokens.iter().enumerate() {
                index
                    .entry(term.to_string())
                    .or_default()
                    .entry(doc_id as u32)
                    .or_default()
                    .push(pos as u32);
            }
        }

        let mut dict = DictWriter::create(&dir.join("index.dict")).unwrap();
        let mut postings = PostingsWriter::create(&dir.join("index.postings")).unwrap();
        let mut terms: Vec<_> = index.keys().cloned().collect();
        terms.sort();
        for term in terms {
            let map = &index[&term];
            let offset = postings.write_term(map).unwrap();
            dict.append(
                &term,
                DictEntry {
                    postings_offset: offset,
                    doc_count: map.len() as u32,
                },
            )
            .unwrap();
        }
        postings.finish().unwrap();
        dict.finish().unwrap();
    }

    /// An identity "tokenizer" good enough for these tests: it never spawns
    /// a child process and instead lower-cases and splits on whitespace,
    /// exercising the parser/evaluator without a real subprocess dependency.
    struct IdentityTokenizer;
    impl IdentityTokenizer {
        fn tokenize(text: &str) -> Vec<String> {
            text.split_whitespace().map(|s| s.to_lowercase()).collect()
        }
    }

    fn eval_query(reader: &mut IndexReader, query: &str) -> DocSet {
        let rpn = parse(query);
        let universe: DocSet = (0..reader.doc_count()).collect();
        let mut stack: Vec<DocSet> = Vec::new();
        for tok in &rpn {
            match tok {
                RpnToken::Term(w) => {
                    let terms = IdentityTokenizer::tokenize(w);
                    let set = match terms.first() {
                        Some(t) => reader.get_postings(t).keys().copied().collect(),
                        None => DocSet::new(),
                    };
                    stack.push(set);
                }
                RpnToken::Phrase(text) | RpnToken::Proximity(text, _) => {
                    let terms = IdentityTokenizer::tokenize(text);
                    let max_dist = match tok {
                        RpnToken::Proximity(_, n) => *n,
                        _ => terms.len() as u32,
                    };
                    stack.push(eval_internal::sequence_search(&terms, max_dist, reader));
                }
                RpnToken::Not => {
                    if let Some(a) = stack.pop() {
                        stack.push(universe.difference(&a).copied().collect());
                    }
                }
                RpnToken::And => {
                    if stack.len() >= 2 {
                        let b = stack.pop().unwrap();
                        let a = stack.pop().unwrap();
                        stack.push(a.intersection(&b).copied().collect());
                    }
                }
                RpnToken::Or => {
                    if stack.len() >= 2 {
                        let b = stack.pop().unwrap();
                        let a = stack.pop().unwrap();
                        stack.push(a.union(&b).copied().collect());
                    }
                }
            }
        }
        stack.pop().unwrap_or_default()
    }

    #[test]
    fn end_to_end_corpus_scenarios() {
        let dir = tempdir().unwrap();
        build_corpus(dir.path());
        let mut reader = IndexReader::open(dir.path()).unwrap();

        let cases: &[(&str, &[u32])] = &[
            ("brown", &[0, 1, 3]),
            ("brown && fox", &[0]),
            ("brown || bear", &[0, 1, 3]),
            ("brown && !fox", &[1, 3]),
            ("\"quick fox\"", &[0, 2]),
            ("\"brown dog\"", &[1]),
            ("\"the fox\" / 3", &[0]),
            ("\"quick fox\" / 4", &[0, 2]),
            ("(brown || bear) && !dog", &[0, 3]),
        ];

        for (query, expected) in cases {
            let got = eval_query(&mut reader, query);
            let expected: DocSet = expected.iter().copied().collect();
            assert_eq!(got, expected, "query {query:?}");
        }
    }
}
