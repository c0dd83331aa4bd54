// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chunking for long outbound messages.

/// Splits `text` into chunks of at most `max` characters.
///
/// Prefers friendly cut points inside the last 40% of the window: a
/// blank line first, then a newline, then a space. Falls back to a hard
/// cut when none lands late enough. Chunk edges are trimmed so no part
/// starts or ends with stray whitespace.
pub fn split_chunks(text: &str, max: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max {
        return vec![text.to_string()];
    }

    let floor = max * 6 / 10;
    let mut out = Vec::new();
    let mut rest: &[char] = &chars;

    while rest.len() > max {
        let window = &rest[..max];
        let cut = last_match(window, &['\n', '\n'])
            .filter(|&i| i >= floor)
            .or_else(|| last_match(window, &['\n']).filter(|&i| i >= floor))
            .or_else(|| last_match(window, &[' ']).filter(|&i| i >= floor))
            .filter(|&i| i > 0)
            .unwrap_or(max);

        let part: String = rest[..cut].iter().collect();
        let trimmed = part.trim_end();
        if !trimmed.is_empty() {
            out.push(trimmed.to_string());
        }
        rest = &rest[cut..];
        while rest.first().is_some_and(|c| c.is_whitespace()) {
            rest = &rest[1..];
        }
    }

    if !rest.is_empty() {
        out.push(rest.iter().collect());
    }
    out
}

fn last_match(window: &[char], pat: &[char]) -> Option<usize> {
    if pat.len() > window.len() {
        return None;
    }
    (0..=window.len() - pat.len()).rev().find(|&i| window[i..i + pat.len()] == *pat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_chunks("hola", 100), vec!["hola".to_string()]);
        assert_eq!(split_chunks("", 100), vec![String::new()]);
    }

    #[test]
    fn splits_on_blank_line_when_late_enough() {
        let text = format!("{}\n\n{}", "a".repeat(80), "b".repeat(50));
        let chunks = split_chunks(&text, 100);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "a".repeat(80));
        assert_eq!(chunks[1], "b".repeat(50));
    }

    #[test]
    fn prefers_space_over_hard_cut() {
        let text = format!("{} {}", "a".repeat(85), "b".repeat(40));
        let chunks = split_chunks(&text, 100);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "a".repeat(85));
        assert_eq!(chunks[1], "b".repeat(40));
    }

    #[test]
    fn early_whitespace_forces_hard_cut() {
        // The only space sits before the 60% floor, so the cut is hard.
        let text = format!("ab {}", "c".repeat(200));
        let chunks = split_chunks(&text, 100);
        assert_eq!(chunks[0].chars().count(), 100);
    }

    #[test]
    fn no_content_is_lost() {
        let text = "palabra ".repeat(200);
        let chunks = split_chunks(&text, 128);
        let rejoined: String = chunks.join(" ");
        assert_eq!(
            rejoined.split_whitespace().count(),
            text.split_whitespace().count()
        );
        assert!(chunks.iter().all(|c| c.chars().count() <= 128));
    }
}
