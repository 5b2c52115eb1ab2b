//! Compile abbreviated search strings into matching predicates.
//!
//! A fuzzy pattern is built token by token:
//!
//! - `Po`, `D`, `P2` - camel-case tokens (uppercase letter plus lowercase/digit run)
//! - `j`, `x` - any other ASCII letter, matched in either case
//! - `*` - wildcard, runs of stars count as one
//! - everything else - literal
//!
//! The resulting regex is anchored at both ends with an implicit trailing
//! wildcard, so `JLO` matches `java.lang.Object` and `PoiD` matches
//! `Point2D`.

use crate::catalog::Matchable;
use regex::Regex;
use std::borrow::Cow;
use tracing::warn;

/// Lowercase letters and digits allowed around the trailing part of a camel-case token
const WORD_RUN: &str = "[a-z0-9]*";

/// A reusable record filter
#[derive(Debug, Clone)]
pub enum MatchPredicate {
    Always,
    Never,
    Pattern(Regex),
}

impl MatchPredicate {
    pub fn matches<R: Matchable + ?Sized>(&self, record: &R) -> bool {
        match self {
            MatchPredicate::Always => true,
            MatchPredicate::Never => false,
            MatchPredicate::Pattern(regex) => record.matches(regex),
        }
    }

    /// Source of the compiled regex, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MatchPredicate::Pattern(regex) => Some(regex.as_str()),
            _ => None,
        }
    }

    fn compile(pattern: String) -> Self {
        match Regex::new(&pattern) {
            Ok(regex) => MatchPredicate::Pattern(regex),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "search pattern failed to compile");
                MatchPredicate::Never
            }
        }
    }
}

/// Collapse every run of two or more `*` into a single `*`.
pub fn normalize_stars(search: &str) -> Cow<'_, str> {
    if !search.contains("**") {
        return Cow::Borrowed(search);
    }

    let mut normalized = String::with_capacity(search.len());
    for c in search.chars() {
        if c == '*' && normalized.ends_with('*') {
            continue;
        }
        normalized.push(c);
    }
    Cow::Owned(normalized)
}

/// Fuzzy predicate for the name and member searches.
pub fn compile_fuzzy(search: &str) -> MatchPredicate {
    match fuzzy_pattern(search) {
        Some(pattern) => MatchPredicate::compile(pattern),
        None => MatchPredicate::Always,
    }
}

/// Regex source for a fuzzy search, `None` when every record matches.
pub fn fuzzy_pattern(search: &str) -> Option<String> {
    let search = normalize_stars(search);
    if search.is_empty() || search == "*" {
        return None;
    }

    let mut pattern = String::from("^");
    let mut rest: &str = &search;
    let mut previous: Option<&str> = None;

    while let Some(c) = rest.chars().next() {
        let token = match camel_case_token(rest) {
            Some(token) => {
                push_camel_case(&mut pattern, token, previous);
                token
            }
            None => {
                push_char(&mut pattern, c);
                &rest[..c.len_utf8()]
            }
        };
        previous = Some(token);
        rest = &rest[token.len()..];
    }

    if !pattern.ends_with(".*") {
        pattern.push_str(".*");
    }
    pattern.push('$');
    Some(pattern)
}

/// Predicate matching records whose name equals `search`, ignoring ASCII case.
pub fn compile_exact_case_insensitive(search: &str) -> MatchPredicate {
    compile_exact(search, true)
}

/// Predicate matching records whose name equals `search` exactly.
pub fn compile_exact_case_sensitive(search: &str) -> MatchPredicate {
    compile_exact(search, false)
}

fn compile_exact(search: &str, fold_case: bool) -> MatchPredicate {
    if search.is_empty() || search.contains('*') {
        return MatchPredicate::Never;
    }

    let mut pattern = String::from("^");
    for c in search.chars() {
        if fold_case && c.is_ascii_alphabetic() {
            pattern.push('[');
            pattern.push(c.to_ascii_uppercase());
            pattern.push(c.to_ascii_lowercase());
            pattern.push(']');
        } else {
            push_literal(&mut pattern, c);
        }
    }
    pattern.push('$');
    MatchPredicate::compile(pattern)
}

/// Leading camel-case token of `s`: an ASCII uppercase letter followed by
/// any run of ASCII lowercase letters and digits.
fn camel_case_token(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    if !bytes.first()?.is_ascii_uppercase() {
        return None;
    }

    let end = bytes[1..]
        .iter()
        .position(|b| !(b.is_ascii_lowercase() || b.is_ascii_digit()))
        .map_or(bytes.len(), |i| i + 1);
    Some(&s[..end])
}

fn push_camel_case(pattern: &mut String, token: &str, previous: Option<&str>) {
    // Token is pure ASCII, so slicing at 1 is safe and nothing needs escaping
    let lead = &token[..1];
    let lower_lead = lead.to_ascii_lowercase();
    let trailing = &token[1..];
    let padded = format!("{WORD_RUN}{trailing}{WORD_RUN}");

    match previous {
        None => {
            pattern.push_str(&format!("({lead}|{lower_lead}){padded}"));
        }
        Some(previous) => {
            let separator = if previous.ends_with('.') { "" } else { "\\." };
            pattern.push_str(&format!(
                "((\\.?{lead}{padded})|({separator}{lower_lead}{padded})|{})",
                token.to_ascii_lowercase()
            ));
        }
    }
}

fn push_char(pattern: &mut String, c: char) {
    if c.is_ascii_alphabetic() {
        pattern.push('(');
        pattern.push(c.to_ascii_uppercase());
        pattern.push('|');
        pattern.push(c.to_ascii_lowercase());
        pattern.push(')');
    } else if c == '*' {
        pattern.push_str(".*");
    } else {
        push_literal(pattern, c);
    }
}

fn push_literal(pattern: &mut String, c: char) {
    let mut buf = [0u8; 4];
    pattern.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}
