//! Slide titles from font size.
//!
//! The title is the text set in the largest font anywhere on the page.
//! Vertical position is ignored: decks put titles in too many places for a
//! position cutoff to hold.

use crate::repair::clean_fragmented_text;
use crate::types::Word;

/// Words whose size is this close to the maximum belong to the title.
const TITLE_SIZE_TOLERANCE: f64 = 0.5;

/// Largest font size on a page, if it has any words.
pub fn max_font_size(words: &[Word]) -> Option<f64> {
    words.iter().map(|w| w.size).reduce(f64::max)
}

/// Words set in the page's largest font, left to right.
pub fn title_words(words: &[Word]) -> Vec<&Word> {
    let Some(max_size) = max_font_size(words) else {
        return Vec::new();
    };

    let mut selected: Vec<&Word> = words
        .iter()
        .filter(|w| (w.size - max_size).abs() < TITLE_SIZE_TOLERANCE)
        .collect();
    selected.sort_by(|a, b| a.x0.total_cmp(&b.x0));
    selected
}

/// Title text before fragment cleanup.
pub fn raw_title(words: &[Word]) -> String {
    title_words(words)
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title of a slide: largest-font words joined and defragmented.
pub fn slide_title(words: &[Word]) -> String {
    clean_fragmented_text(&raw_title(words))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biggest_font_wins_regardless_of_position() {
        let words = vec![
            Word::new("Small", 50.0, 20.0, 12.0),
            Word::new("Objectifs", 80.0, 400.0, 28.0),
            Word::new("Les", 40.0, 400.0, 27.8),
        ];
        assert_eq!(slide_title(&words), "Les Objectifs");
    }

    #[test]
    fn test_empty_page_has_empty_title() {
        assert_eq!(slide_title(&[]), "");
        assert_eq!(max_font_size(&[]), None);
    }

    #[test]
    fn test_fragmented_title_cleaned() {
        let words: Vec<Word> = "P L A N"
            .split(' ')
            .enumerate()
            .map(|(i, c)| Word::new(c, 50.0 + 30.0 * i as f64, 40.0, 32.0))
            .collect();

        assert_eq!(raw_title(&words), "P L A N");
        assert_eq!(slide_title(&words), "PLAN");
    }

    #[test]
    fn test_tolerance_excludes_smaller_words() {
        let words = vec![
            Word::new("Big", 50.0, 40.0, 24.0),
            Word::new("sub", 10.0, 40.0, 23.5),
        ];
        assert_eq!(slide_title(&words), "Big");
    }
}
