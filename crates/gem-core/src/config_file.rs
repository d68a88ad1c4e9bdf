//! Parser for `gem.conf` statement files.
//!
//! A file is a sequence of statements `key value [ignored...] ;`. Tokens are
//! separated by whitespace, `;` ends a statement even when glued to a token,
//! and `\` escapes the next character. Only the first value token of each
//! statement is kept; statements without a value, and a trailing statement
//! without its `;`, are dropped.

use crate::atom::Atom;

#[derive(Debug, PartialEq)]
enum Token {
    Word(String),
    Semi,
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut chars = text.chars();

    let flush = |word: &mut String, tokens: &mut Vec<Token>| {
        if !word.is_empty() {
            tokens.push(Token::Word(std::mem::take(word)));
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    word.push(escaped);
                }
            }
            ';' => {
                flush(&mut word, &mut tokens);
                tokens.push(Token::Semi);
            }
            c if c.is_whitespace() => flush(&mut word, &mut tokens),
            c => word.push(c),
        }
    }
    flush(&mut word, &mut tokens);
    tokens
}

/// Parses statement text into `(key, value)` pairs in file order.
#[must_use]
pub fn parse(text: &str) -> Vec<(String, Atom)> {
    let mut entries = Vec::new();
    let mut key: Option<String> = None;
    let mut value: Option<Atom> = None;

    for token in tokenize(text) {
        match token {
            Token::Semi => {
                if let (Some(k), Some(v)) = (key.take(), value.take()) {
                    entries.push((k, v));
                }
                key = None;
                value = None;
            }
            Token::Word(word) => {
                if key.is_none() {
                    key = Some(word);
                } else if value.is_none() {
                    value = Some(Atom::parse(&word));
                }
            }
        }
    }
    entries
}
