// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Unicode-aware replacements for SQLite's `LIKE` and `NOCASE`, which only
//! fold ASCII letters. Dish names are mostly Cyrillic, so both are swapped
//! out on every connection the store opens.

use std::cmp::Ordering;
use std::panic::RefUnwindSafe;

/// Case-insensitive text predicate and ordering installed into the store.
pub trait TextMatcher: Send + Sync + RefUnwindSafe + 'static {
    /// SQL `LIKE`: `%` is any run of characters, `_` is exactly one.
    fn matches(&self, pattern: &str, value: &str, escape: Option<char>) -> bool;

    fn compare(&self, left: &str, right: &str) -> Ordering;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnicodeMatcher;

impl TextMatcher for UnicodeMatcher {
    fn matches(&self, pattern: &str, value: &str, escape: Option<char>) -> bool {
        like_matches_escaped(pattern, value, escape)
    }

    fn compare(&self, left: &str, right: &str) -> Ordering {
        nocase_compare(left, right)
    }
}

/// Pattern and value are both split per source character. A literal holds
/// the lowercase expansion of one character, which may be longer than one
/// `char` (`İ` folds to `i` plus a combining dot).
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    One,
    Any,
}

pub fn like_matches(pattern: &str, value: &str) -> bool {
    like_matches_escaped(pattern, value, None)
}

pub fn like_matches_escaped(pattern: &str, value: &str, escape: Option<char>) -> bool {
    let tokens = tokenize(pattern, escape);
    let value = fold(value);

    let mut token_index = 0usize;
    let mut value_index = 0usize;
    let mut star: Option<usize> = None;
    let mut star_value_index = 0usize;

    while value_index < value.len() {
        match tokens.get(token_index) {
            Some(Token::One) => {
                token_index += 1;
                value_index += 1;
                continue;
            }
            Some(Token::Literal(folded)) if *folded == value[value_index] => {
                token_index += 1;
                value_index += 1;
                continue;
            }
            Some(Token::Any) => {
                star = Some(token_index);
                star_value_index = value_index;
                token_index += 1;
                continue;
            }
            _ => {}
        }

        // Mismatch: let the last `%` swallow one more character.
        let Some(star_index) = star else {
            return false;
        };
        token_index = star_index + 1;
        star_value_index += 1;
        value_index = star_value_index;
    }

    tokens[token_index..]
        .iter()
        .all(|token| *token == Token::Any)
}

pub fn nocase_compare(left: &str, right: &str) -> Ordering {
    left.chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase))
}

fn fold(value: &str) -> Vec<String> {
    value.chars().map(fold_char).collect()
}

fn fold_char(ch: char) -> String {
    ch.to_lowercase().collect()
}

fn tokenize(pattern: &str, escape: Option<char>) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        if Some(ch) == escape {
            // A trailing escape character matches itself.
            let literal = chars.next().unwrap_or(ch);
            tokens.push(Token::Literal(fold_char(literal)));
            continue;
        }
        match ch {
            '%' => {
                if tokens.last() != Some(&Token::Any) {
                    tokens.push(Token::Any);
                }
            }
            '_' => tokens.push(Token::One),
            other => tokens.push(Token::Literal(fold_char(other))),
        }
    }
    tokens
}
