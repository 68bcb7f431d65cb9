// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! RPN evaluation over an [`IndexReader`], with phrase/proximity resolution
//! via a depth-first walk across each term's position list.

use std::collections::BTreeSet;

use crate::reader::IndexReader;
use crate::tokenizer::Tokenizer;

use super::parser::RpnToken;

pub type DocSet = BTreeSet<u32>;

/// Evaluates an RPN token stream against `reader`, resolving bare words,
/// phrases, and proximity clauses through `tokenizer`.
///
/// Stack underflow on a binary/unary operator is a silent no-op, matching
/// the reference evaluator: a malformed query degrades gracefully rather
/// than erroring.
pub fn evaluate(rpn: &[RpnToken], reader: &mut IndexReader, tokenizer: &mut Tokenizer) -> DocSet {
    let universe: DocSet = (0..reader.doc_count()).collect();
    let mut stack: Vec<DocSet> = Vec::new();

    for tok in rpn {
        match tok {
            RpnToken::Term(word) => {
                let terms = tokenizer.tokenize(word);
                let set = match terms.first() {
                    Some(t) => reader.get_postings(t).keys().copied().collect(),
                    None => DocSet::new(),
                };
                stack.push(set);
            }
            RpnToken::Phrase(text) => {
                let terms = tokenizer.tokenize(text);
                let k = terms.len() as u32;
                stack.push(sequence_search(&terms, k, reader));
            }
            RpnToken::Proximity(text, n) => {
                let terms = tokenizer.tokenize(text);
                stack.push(sequence_search(&terms, *n, reader));
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

/// A zero-token phrase/proximity clause matches nothing, per design policy.
pub(crate) fn sequence_search(terms: &[String], max_dist: u32, reader: &mut IndexReader) -> DocSet {
    if terms.is_empty() {
        return DocSet::new();
    }

    let postings: Vec<_> = terms.iter().map(|t| reader.get_postings(t)).collect();
    if postings.iter().any(|p| p.is_empty()) {
        return DocSet::new();
    }

    let mut candidates: Option<DocSet> = None;
    for p in &postings {
        let doc_ids: DocSet = p.keys().copied().collect();
        candidates = Some(match candidates {
            None => doc_ids,
            Some(acc) => acc.intersection(&doc_ids).copied().collect(),
        });
    }
    let candidates = candidates.unwrap_or_default();

    let is_exact = max_dist == terms.len() as u32;
    let mut result = DocSet::new();
    for &doc_id in &candidates {
        let position_lists: Vec<&Vec<u32>> = postings
            .iter()
            .map(|p| p.get(&doc_id).expect("candidate doc has every term"))
            .collect();
        if find_alignment(&position_lists, max_dist, is_exact) {
            result.insert(doc_id);
        }
    }
    result
}

/// Depth-first search for a strictly ascending tuple `p0 < p1 < ... < pk-1`,
/// one position per term, satisfying adjacency (exact phrase) or span
/// (general proximity).
fn find_alignment(position_lists: &[&Vec<u32>], max_dist: u32, is_exact: bool) -> bool {
    fn recurse(
        position_lists: &[&Vec<u32>],
        depth: usize,
        prev_pos: Option<u32>,
        first_pos: u32,
        max_dist: u32,
        is_exact: bool,
    ) -> bool {
        if depth == position_lists.len() {
            return true;
        }
        for &pos in position_lists[depth].iter() {
            if let Some(prev) = prev_pos {
                if pos <= prev {
                    continue;
                }
                if is_exact && pos != prev + 1 {
                    continue;
                }
            }
            if prev_pos.is_some() && !is_exact && pos.saturating_sub(first_pos) > max_dist {
                continue;
            }
            let first = if depth == 0 { pos } else { first_pos };
            if recurse(position_lists, depth + 1, Some(pos), first, max_dist, is_exact) {
                return true;
            }
        }
        false
    }

    if position_lists.is_empty() {
        return false;
    }
    recurse(position_lists, 0, None, 0, max_dist, is_exact)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists(v: &[&[u32]]) -> Vec<Vec<u32>> {
        v.iter().map(|s| s.to_vec()).collect()
    }

    #[test]
    fn exact_adjacency_requires_consecutive_positions() {
        let owned = lists(&[&[0, 5], &[1]]);
        let refs: Vec<&Vec<u32>> = owned.iter().collect();
        assert!(find_alignment(&refs, 2, true));

        let owned = lists(&[&[0], &[5]]);
        let refs: Vec<&Vec<u32>> = owned.iter().collect();
        assert!(!find_alignment(&refs, 2, true));
    }

    #[test]
    fn span_constraint_allows_gaps_within_bound() {
        let owned = lists(&[&[0], &[3]]);
        let refs: Vec<&Vec<u32>> = owned.iter().collect();
        assert!(find_alignment(&refs, 4, false));
        assert!(!find_alignment(&refs, 2, false));
    }

    #[test]
    fn span_constraint_ignores_absolute_start_position() {
        // "g h" / 1 in "a b c d e f g h": g@6, h@7, span 1 <= 1.
        let owned = lists(&[&[6], &[7]]);
        let refs: Vec<&Vec<u32>> = owned.iter().collect();
        assert!(find_alignment(&refs, 1, false));

        // A single term whose only occurrence sits past max_dist must still
        // match: span is measured relative to its own first position, not
        // to an absolute offset.
        let owned = lists(&[&[9]]);
        let refs: Vec<&Vec<u32>> = owned.iter().collect();
        assert!(find_alignment(&refs, 5, false));
    }
}
