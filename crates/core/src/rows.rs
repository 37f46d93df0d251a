//! Row assembly: grouping a page's words into visual lines.
//!
//! Running headers matching the banner pattern never enter a row. They are
//! tallied per page in a [`BannerTally`], and once every page has been seen
//! the texts recurring on most pages are removed from the whole deck.

use crate::config::{Patterns, RepairConfig};
use crate::repair::{clean_fragmented_text, merge_fragmented_words};
use crate::types::{PageWords, Row, Word};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Rows of one page, tagged with the source page number.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRows {
    pub number: usize,
    pub rows: Vec<Row>,
}

/// Deck-wide count of pages each banner text appears on.
///
/// Filled page by page during row assembly, then consulted once all pages
/// are known.
#[derive(Debug, Clone, Default)]
pub struct BannerTally {
    hits: HashMap<String, usize>,
}

impl BannerTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the distinct banner texts seen on one page.
    pub fn record_page<I, S>(&mut self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let distinct: BTreeSet<String> = texts.into_iter().map(Into::into).collect();
        for text in distinct {
            *self.hits.entry(text).or_insert(0) += 1;
        }
    }

    /// Number of pages a banner text was seen on.
    pub fn count(&self, text: &str) -> usize {
        self.hits.get(text).copied().unwrap_or(0)
    }

    /// Banner texts seen on at least `ratio` of `page_count` pages.
    pub fn recurring(&self, page_count: usize, ratio: f64) -> HashSet<String> {
        if page_count == 0 {
            return HashSet::new();
        }

        self.hits
            .iter()
            .filter(|(_, count)| **count as f64 / page_count as f64 >= ratio)
            .map(|(text, _)| text.clone())
            .collect()
    }
}

/// Key grouping words whose `top` agrees to one decimal place.
fn row_key(top: f64) -> i64 {
    (top * 10.0).round() as i64
}

/// Group words by rounded `top`, top to bottom, each row sorted by `x0`.
///
/// Returns the rounded vertical position alongside each row.
pub fn group_rows<'a, I>(words: I) -> Vec<(f64, Vec<Word>)>
where
    I: IntoIterator<Item = &'a Word>,
{
    let mut grouped: BTreeMap<i64, Vec<Word>> = BTreeMap::new();
    for word in words {
        grouped.entry(row_key(word.top)).or_default().push(word.clone());
    }

    grouped
        .into_iter()
        .map(|(key, mut row)| {
            row.sort_by(|a, b| a.x0.total_cmp(&b.x0));
            (key as f64 / 10.0, row)
        })
        .collect()
}

/// Remove a trailing page-number token from a row's text.
pub fn strip_page_number(text: &str, page: usize) -> String {
    let trimmed = text.trim_end();
    let number = page.to_string();
    trimmed
        .strip_suffix(number.as_str())
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Builds cleaned rows from raw page words.
#[derive(Debug, Clone)]
pub struct RowAssembler {
    patterns: Patterns,
    repair: RepairConfig,
}

impl RowAssembler {
    pub fn new(patterns: Patterns, repair: RepairConfig) -> Self {
        Self { patterns, repair }
    }

    /// Assemble the rows of one page, tallying its banner words.
    pub fn assemble_page(&self, page: &PageWords, tally: &mut BannerTally) -> PageRows {
        let (banners, content): (Vec<&Word>, Vec<&Word>) = page
            .words
            .iter()
            .partition(|w| self.patterns.is_banner(&w.text));

        tally.record_page(banners.iter().map(|w| w.text.trim()));

        let rows = group_rows(content)
            .into_iter()
            .filter_map(|(_, words)| self.build_row(&words, page.number))
            .collect();

        PageRows {
            number: page.number,
            rows,
        }
    }

    /// Merge fragments, join and clean one row. Rows left empty are dropped.
    pub fn build_row(&self, words: &[Word], page: usize) -> Option<Row> {
        let merged = merge_fragmented_words(words, &self.repair);
        let x0 = merged.first()?.x0;

        let joined = merged
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let text = strip_page_number(&clean_fragmented_text(&joined), page);

        if text.is_empty() {
            return None;
        }

        Some(Row {
            x0,
            text,
            words: merged,
        })
    }
}

/// Drop every row whose text is one of the recurring banners.
pub fn remove_banner_rows(pages: &mut [PageRows], banners: &HashSet<String>) {
    if banners.is_empty() {
        return;
    }

    for page in pages.iter_mut() {
        page.rows.retain(|row| !banners.contains(&row.text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler() -> RowAssembler {
        RowAssembler::new(Patterns::default(), RepairConfig::default())
    }

    fn word(text: &str, x0: f64, top: f64) -> Word {
        Word::new(text, x0, top, 12.0)
    }

    #[test]
    fn test_groups_by_rounded_top() {
        let page = PageWords::new(
            1,
            vec![
                word("world", 90.0, 100.04),
                word("Hello", 50.0, 100.0),
                word("Next", 50.0, 120.0),
            ],
        );
        let rows = assembler().assemble_page(&page, &mut BannerTally::new()).rows;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text, "Hello world");
        assert_eq!(rows[0].x0, 50.0);
        assert_eq!(rows[1].text, "Next");
    }

    #[test]
    fn test_banner_words_tallied_not_rowed() {
        let page = PageWords::new(
            1,
            vec![word("L3SpS:", 10.0, 10.0), word("Content", 50.0, 100.0)],
        );
        let mut tally = BannerTally::new();
        let rows = assembler().assemble_page(&page, &mut tally).rows;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "Content");
        assert_eq!(tally.count("L3SpS:"), 1);
    }

    #[test]
    fn test_banner_only_page_is_empty() {
        let page = PageWords::new(4, vec![word("L3SpS:", 10.0, 10.0)]);
        let rows = assembler().assemble_page(&page, &mut BannerTally::new()).rows;
        assert!(rows.is_empty());
    }

    #[test]
    fn test_page_number_stripped() {
        assert_eq!(strip_page_number("Conclusion 12", 12), "Conclusion");
        assert_eq!(strip_page_number("Conclusion 12 ", 12), "Conclusion");
        assert_eq!(strip_page_number("Conclusion 12", 3), "Conclusion 12");
        assert_eq!(strip_page_number("7", 7), "");
    }

    #[test]
    fn test_row_with_only_page_number_dropped() {
        let page = PageWords::new(
            7,
            vec![word("Title", 50.0, 50.0), word("7", 700.0, 580.0)],
        );
        let rows = assembler().assemble_page(&page, &mut BannerTally::new()).rows;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "Title");
    }

    #[test]
    fn test_fragmented_row_repaired() {
        let page = PageWords::new(
            1,
            vec![
                word("o", 50.0, 100.0),
                word("u", 56.0, 100.0),
                word("i", 62.0, 100.0),
            ],
        );
        let rows = assembler().assemble_page(&page, &mut BannerTally::new()).rows;

        assert_eq!(rows[0].text, "oui");
        assert_eq!(rows[0].words.len(), 1);
    }

    #[test]
    fn test_tally_counts_pages_not_occurrences() {
        let mut tally = BannerTally::new();
        tally.record_page(["L1SpS:", "L1SpS:"]);
        tally.record_page(["L1SpS:"]);
        tally.record_page(Vec::<String>::new());

        assert_eq!(tally.count("L1SpS:"), 2);
        assert!(tally.recurring(3, 0.8).is_empty());
        assert!(tally.recurring(2, 0.8).contains("L1SpS:"));
        assert!(tally.recurring(0, 0.8).is_empty());
    }

    #[test]
    fn test_remove_banner_rows() {
        let row = |text: &str| Row {
            x0: 0.0,
            text: text.to_string(),
            words: vec![],
        };
        let mut pages = vec![PageRows {
            number: 1,
            rows: vec![row("Footer"), row("Body")],
        }];
        let banners: HashSet<String> = ["Footer".to_string()].into_iter().collect();

        remove_banner_rows(&mut pages, &banners);
        assert_eq!(pages[0].rows, vec![row("Body")]);
    }
}
