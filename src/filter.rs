//! Client-side repository filtering and match highlighting.
//!
//! Matching is case-insensitive and works on folded characters, so every span
//! reported by [`highlight`] lies on char boundaries of the original text.

use crate::github::types::Repository;

/// Byte range of one highlighted occurrence within the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub len: usize,
}

impl MatchSpan {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterResult {
    pub matches: Vec<Repository>,
    pub query: String,
}

/// Matches `query` as typed; only a whitespace-only query counts as empty.
pub fn filter(all: &[Repository], query: &str) -> FilterResult {
    let query = if query.trim().is_empty() { "" } else { query };
    let matches = all
        .iter()
        .filter(|repo| repo_matches(repo, query))
        .cloned()
        .collect();
    FilterResult {
        matches,
        query: query.to_string(),
    }
}

pub fn repo_matches(repo: &Repository, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    contains_folded(&repo.name, query)
        || repo
            .description
            .as_deref()
            .is_some_and(|d| contains_folded(d, query))
        || repo
            .language
            .as_deref()
            .is_some_and(|l| contains_folded(l, query))
        || repo.topics.iter().any(|t| contains_folded(t, query))
}

fn contains_folded(text: &str, query: &str) -> bool {
    !find_spans(text, query, true).is_empty()
}

/// Every non-overlapping case-insensitive occurrence of `query` in `text`.
pub fn highlight(text: &str, query: &str) -> Vec<MatchSpan> {
    find_spans(text, query, false)
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn find_spans(text: &str, query: &str, first_only: bool) -> Vec<MatchSpan> {
    let needle: Vec<char> = query.chars().map(fold).collect();
    if needle.is_empty() {
        return Vec::new();
    }
    let hay: Vec<(usize, char, usize)> = text
        .char_indices()
        .map(|(i, c)| (i, fold(c), c.len_utf8()))
        .collect();
    if hay.len() < needle.len() {
        return Vec::new();
    }

    let mut spans = Vec::new();
    let mut i = 0;
    while i + needle.len() <= hay.len() {
        let window = &hay[i..i + needle.len()];
        if window.iter().zip(&needle).all(|((_, c, _), n)| c == n) {
            let (start, _, _) = window[0];
            let (last, _, last_len) = window[window.len() - 1];
            spans.push(MatchSpan {
                start,
                len: last + last_len - start,
            });
            if first_only {
                break;
            }
            i += needle.len();
        } else {
            i += 1;
        }
    }
    spans
}

/// Splits `text` into `(segment, highlighted)` runs covering it exactly once.
pub fn segments<'a>(text: &'a str, spans: &[MatchSpan]) -> Vec<(&'a str, bool)> {
    let mut out = Vec::new();
    let mut pos = 0;
    for span in spans {
        if span.start < pos || span.end() > text.len() {
            continue;
        }
        if span.start > pos {
            out.push((&text[pos..span.start], false));
        }
        out.push((&text[span.start..span.end()], true));
        pos = span.end();
    }
    if pos < text.len() {
        out.push((&text[pos..], false));
    }
    out
}
