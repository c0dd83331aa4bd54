// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text normalization shared by the reason tagger and the scoring
//! heuristic. Spanish input is folded to lowercase ASCII-ish form
//! (NFD decomposition, combining marks dropped) before matching.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Decompose and drop combining marks: "logré" becomes "logre".
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Lowercase, strip diacritics, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    let stripped = strip_diacritics(&s.to_lowercase());
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split on terminal punctuation and newlines, dropping empty fragments.
pub fn split_sentences(s: &str) -> Vec<&str> {
    s.split(['.', '!', '?', ';', '\n', '\r'])
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .collect()
}

/// Word-ish tokens: runs of alphanumerics or underscores.
pub fn tokenize(s: &str) -> Vec<&str> {
    s.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
        .collect()
}
