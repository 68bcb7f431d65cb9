// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Proximity folding, implicit-AND insertion, and shunting-yard to RPN.

use super::lexer::Token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpnToken {
    Term(String),
    Phrase(String),
    Proximity(String, u32),
    And,
    Or,
    Not,
}

/// An operand is anything that can sit on the evaluator's stack: a term,
/// phrase, or proximity clause.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Folded {
    Operand(RpnToken),
    Op(String),
}

/// Folds a trailing `/ NUM` onto the preceding term or phrase.
fn fold_proximity(tokens: Vec<Token>) -> Vec<Folded> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let content = match &tokens[i] {
            Token::Term(w) => Some(w.clone()),
            Token::Phrase(p) => Some(p.clone()),
            _ => None,
        };
        if let Some(content) = content {
            if let (Some(Token::Op(op)), Some(Token::Num(n))) = (tokens.get(i + 1), tokens.get(i + 2)) {
                if op == "/" {
                    out.push(Folded::Operand(RpnToken::Proximity(content, *n)));
                    i += 3;
                    continue;
                }
            }
            out.push(Folded::Operand(match &tokens[i] {
                Token::Term(_) => RpnToken::Term(content),
                _ => RpnToken::Phrase(content),
            }));
            i += 1;
            continue;
        }
        match &tokens[i] {
            Token::Op(op) => out.push(Folded::Op(op.clone())),
            Token::Num(n) => out.push(Folded::Operand(RpnToken::Term(n.to_string()))),
            Token::Term(_) | Token::Phrase(_) => unreachable!(),
        }
        i += 1;
    }
    out
}

fn is_operand(tok: &Folded) -> bool {
    matches!(tok, Folded::Operand(_))
}

/// Inserts an implicit `&&` between two adjacent tokens where no explicit
/// operator separates them: between two operands, between an operand and
/// `(`, between `)` and an operand or `(` or `!`, etc.
fn insert_implicit_and(tokens: Vec<Folded>) -> Vec<Folded> {
    let mut out = Vec::new();
    for (i, tok) in tokens.into_iter().enumerate() {
        if i > 0 {
            let prev = out.last().unwrap();
            let prev_closes = matches!(prev, Folded::Op(op) if op == ")") || is_operand(prev);
            let next_opens = is_operand(&tok)
                || matches!(&tok, Folded::Op(op) if op == "(" || op == "!");
            if prev_closes && next_opens {
                out.push(Folded::Op("&&".to_string()));
            }
        }
        out.push(tok);
    }
    out
}

fn precedence(op: &str) -> u8 {
    match op {
        "(" => 0,
        "||" => 1,
        "&&" => 2,
        "!" => 3,
        _ => 0,
    }
}

/// Shunting-yard: converts the infix token stream into RPN.
fn to_rpn(tokens: Vec<Folded>) -> Vec<RpnToken> {
    let mut output = Vec::new();
    let mut ops: Vec<String> = Vec::new();

    for tok in tokens {
        match tok {
            Folded::Operand(t) => output.push(t),
            Folded::Op(op) if op == "(" => ops.push(op),
            Folded::Op(op) if op == ")" => {
                while let Some(top) = ops.last() {
                    if top == "(" {
                        ops.pop();
                        break;
                    }
                    output.push(op_to_rpn(&ops.pop().unwrap()));
                }
            }
            Folded::Op(op) => {
                if op == "!" {
                    // Right-associative unary: only pop while strictly
                    // higher precedence sits on top.
                    while let Some(top) = ops.last() {
                        if top != "(" && precedence(top) > precedence(&op) {
                            output.push(op_to_rpn(&ops.pop().unwrap()));
                        } else {
                            break;
                        }
                    }
                } else {
                    while let Some(top) = ops.last() {
                        if top != "(" && precedence(top) >= precedence(&op) {
                            output.push(op_to_rpn(&ops.pop().unwrap()));
                        } else {
                            break;
                        }
                    }
                }
                ops.push(op);
            }
        }
    }
    while let Some(op) = ops.pop() {
        if op != "(" {
            output.push(op_to_rpn(&op));
        }
    }
    output
}

fn op_to_rpn(op: &str) -> RpnToken {
    match op {
        "&&" => RpnToken::And,
        "||" => RpnToken::Or,
        "!" => RpnToken::Not,
        _ => unreachable!("unexpected operator {op}"),
    }
}

/// Parses a raw query string into an RPN token stream ready for evaluation.
pub fn parse(input: &str) -> Vec<RpnToken> {
    let tokens = super::lexer::lex(input);
    let folded = fold_proximity(tokens);
    let with_and = insert_implicit_and(folded);
    to_rpn(with_and)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_and_between_bare_words() {
        let rpn = parse("brown fox");
        assert_eq!(
            rpn,
            vec![
                RpnToken::Term("brown".into()),
                RpnToken::Term("fox".into()),
                RpnToken::And,
            ]
        );
    }

    #[test]
    fn explicit_or_and_not() {
        let rpn = parse("brown || !fox");
        assert_eq!(
            rpn,
            vec![
                RpnToken::Term("brown".into()),
                RpnToken::Term("fox".into()),
                RpnToken::Not,
                RpnToken::Or,
            ]
        );
    }

    #[test]
    fn grouping_changes_precedence() {
        let rpn = parse("(brown || bear) && !dog");
        assert_eq!(
            rpn,
            vec![
                RpnToken::Term("brown".into()),
                RpnToken::Term("bear".into()),
                RpnToken::Or,
                RpnToken::Term("dog".into()),
                RpnToken::Not,
                RpnToken::And,
            ]
        );
    }

    #[test]
    fn proximity_suffix_folds_into_single_operand() {
        let rpn = parse("\"the fox\" / 3");
        assert_eq!(rpn, vec![RpnToken::Proximity("the fox".into(), 3)]);
    }
}
