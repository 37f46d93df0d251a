//! Repair of character-fragmented text.
//!
//! Some PDFs emit every glyph as its own word ("h e l l o"). Two passes undo
//! this: [`merge_fragmented_words`] joins adjacent single-glyph words of a row
//! using their positions, and [`clean_fragmented_text`] re-accumulates single
//! characters in an already joined string.

use crate::config::RepairConfig;
use crate::types::Word;
use regex::Regex;
use std::sync::LazyLock;

/// A run of two or more whitespace characters marks a real word gap in
/// fragmented text.
static WIDE_GAP_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Single punctuation tokens counted as fragments.
const FRAGMENT_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', // Sentence punctuation
    '(', ')', '[', ']', '{', '}', // Brackets
];

/// Return the only character of a token, if it has exactly one.
fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Whether a token looks like a glyph split off a longer word.
fn is_fragment_token(token: &str) -> bool {
    single_char(token).is_some_and(|c| c.is_alphanumeric() || FRAGMENT_PUNCTUATION.contains(&c))
}

/// Whether `word` continues the single-glyph run ending in `last`.
fn continues_run(last: &Word, word: &Word, config: &RepairConfig) -> bool {
    let gap = word.x0 - (last.x0 + config.nominal_char_width);

    gap < config.max_char_gap
        && last.is_single_char()
        && word.is_single_char()
        && (word.top - last.top).abs() < config.vertical_tolerance
}

/// Move a run into `out`, collapsing it into one word when it is made of
/// several single glyphs.
fn flush_run(run: &mut Vec<Word>, out: &mut Vec<Word>) {
    if run.len() > 1 && run.iter().all(Word::is_single_char) {
        let text: String = run.iter().map(|w| w.text.trim()).collect();
        let mut merged = run[0].clone();
        merged.text = text;
        out.push(merged);
        run.clear();
    } else {
        out.append(run);
    }
}

/// Merge adjacent single-character words of one row into whole words.
///
/// Words are ordered by `x0`. A merged word keeps the position and size of
/// its first glyph. Words that are not part of a run of at least two close
/// single glyphs pass through unchanged.
pub fn merge_fragmented_words(words: &[Word], config: &RepairConfig) -> Vec<Word> {
    let mut sorted = words.to_vec();
    sorted.sort_by(|a, b| a.x0.total_cmp(&b.x0));

    let mut merged = Vec::with_capacity(sorted.len());
    let mut run: Vec<Word> = Vec::new();

    for word in sorted {
        let joins = run
            .last()
            .is_some_and(|last| continues_run(last, &word, config));
        if !joins {
            flush_run(&mut run, &mut merged);
        }
        run.push(word);
    }
    flush_run(&mut run, &mut merged);

    merged
}

/// One cleanup pass over a joined string.
fn clean_step(text: &str) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() <= 2 {
        return text.to_string();
    }

    let fragments = tokens.iter().filter(|t| is_fragment_token(t)).count();
    if fragments * 2 <= tokens.len() {
        return text.to_string();
    }

    let mut result: Vec<String> = Vec::with_capacity(tokens.len());
    for group in WIDE_GAP_REGEX.split(text.trim()) {
        let mut current = String::new();

        for token in group.split_whitespace() {
            match single_char(token) {
                Some(c) if c.is_alphanumeric() => current.push(c),
                // Punctuation and whole words both end the word being built
                _ => {
                    if !current.is_empty() {
                        result.push(std::mem::take(&mut current));
                    }
                    result.push(token.to_string());
                }
            }
        }

        if !current.is_empty() {
            result.push(current);
        }
    }

    result.join(" ")
}

/// Rejoin character-fragmented text.
///
/// When more than half of the whitespace-separated tokens are single
/// characters, consecutive single letters and digits are glued back into
/// words. Gaps of two or more spaces separate words; single punctuation is
/// kept as its own token. Text that is not fragmented comes back unchanged.
///
/// The pass is repeated until the text stops changing, so applying this
/// function to its own output is a no-op. A later pass sees the words glued
/// by the first one, so short words left standing next to each other are
/// joined too: `i l   y   a` becomes `il ya`.
///
/// ```
/// use slidetree_core::repair::clean_fragmented_text;
///
/// assert_eq!(
///     clean_fragmented_text("t h i s   i s   f r a g m e n t e d"),
///     "this is fragmented"
/// );
/// assert_eq!(clean_fragmented_text("already clean text"), "already clean text");
/// ```
pub fn clean_fragmented_text(text: &str) -> String {
    let mut current = clean_step(text);
    loop {
        let next = clean_step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}
