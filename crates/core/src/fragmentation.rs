//! Detection of pages whose text came out as scattered glyphs.
//!
//! When most rows of a page hold one or two characters, the page's text
//! layer is unusable. Such pages are either dropped or, on request, rebuilt
//! by stringing nearby fragments together.

use crate::config::ExtractorConfig;
use crate::rows::PageRows;
use crate::types::Row;

/// Rows at most this long (in characters, trimmed) count as fragments.
const SHORT_ROW_LEN: usize = 2;

/// Rebuilt lines longer than this count as meaningful.
const MEANINGFUL_LINE_LEN: usize = 3;

/// Fewest fragments merged into one rebuilt line.
const MIN_RUN_LEN: usize = 3;

fn trimmed_len(text: &str) -> usize {
    text.trim().chars().count()
}

/// Share of rows whose trimmed text is at most two characters.
pub fn short_row_ratio(rows: &[Row]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let short = rows
        .iter()
        .filter(|r| trimmed_len(&r.text) <= SHORT_ROW_LEN)
        .count();
    short as f64 / rows.len() as f64
}

/// Whether a row is a stray glyph that may belong to a broken-up word.
fn is_fragment(row: &Row) -> bool {
    let text = row.text.trim();
    !text.is_empty()
        && text.chars().count() <= SHORT_ROW_LEN
        && text.chars().all(char::is_alphanumeric)
}

/// Join a run of fragments into one row anchored at its leftmost glyph.
fn merge_run(run: &[&Row]) -> Row {
    Row {
        x0: run[0].x0,
        text: run.iter().map(|r| r.text.trim()).collect(),
        words: run.iter().flat_map(|r| r.words.iter().cloned()).collect(),
    }
}

/// Drops or rebuilds heavily fragmented pages.
#[derive(Debug, Clone)]
pub struct FragmentationFilter {
    threshold: f64,
    delete_fragmented: bool,
    max_distance: f64,
    min_meaningful_lines: usize,
}

impl FragmentationFilter {
    pub fn new(threshold: f64, delete_fragmented: bool) -> Self {
        Self {
            threshold,
            delete_fragmented,
            max_distance: 50.0,
            min_meaningful_lines: 5,
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self {
            threshold: config.fragmentation_threshold,
            delete_fragmented: config.delete_fragmented_pages,
            max_distance: config.max_reconstruct_distance,
            min_meaningful_lines: config.min_meaningful_lines,
        }
    }

    /// Whether the share of short rows exceeds the threshold.
    pub fn is_heavily_fragmented(&self, rows: &[Row]) -> bool {
        !rows.is_empty() && short_row_ratio(rows) > self.threshold
    }

    /// Rebuild lines from scattered fragments.
    ///
    /// Fragments are sorted by `x0` and grouped while each is within the
    /// maximum distance of the previous one. Groups of three or more become
    /// a new row; smaller groups are discarded. Other rows are kept, and the
    /// result is ordered top to bottom.
    pub fn reconstruct(&self, rows: &[Row]) -> Vec<Row> {
        let (mut fragments, normal): (Vec<&Row>, Vec<&Row>) =
            rows.iter().partition(|r| is_fragment(r));

        if fragments.is_empty() {
            return rows.to_vec();
        }
        fragments.sort_by(|a, b| a.x0.total_cmp(&b.x0));

        let mut rebuilt: Vec<Row> = normal.into_iter().cloned().collect();
        let mut run: Vec<&Row> = Vec::new();

        for fragment in fragments {
            let close = run
                .last()
                .is_some_and(|last| (fragment.x0 - last.x0).abs() <= self.max_distance);
            if !close {
                if run.len() >= MIN_RUN_LEN {
                    rebuilt.push(merge_run(&run));
                }
                run.clear();
            }
            run.push(fragment);
        }
        if run.len() >= MIN_RUN_LEN {
            rebuilt.push(merge_run(&run));
        }

        rebuilt.sort_by(|a, b| a.top().total_cmp(&b.top()));
        rebuilt
    }

    /// Keep, rebuild or drop one page.
    pub fn apply_to_page(&self, mut page: PageRows) -> Option<PageRows> {
        if !self.is_heavily_fragmented(&page.rows) {
            return Some(page);
        }

        let short = page
            .rows
            .iter()
            .filter(|r| trimmed_len(&r.text) <= SHORT_ROW_LEN)
            .count();
        log::info!(
            "Page {}: heavily fragmented ({} rows, {} short)",
            page.number,
            page.rows.len(),
            short
        );

        if self.delete_fragmented {
            log::info!("Deleting fragmented page {}", page.number);
            return None;
        }

        let rebuilt = self.reconstruct(&page.rows);
        let meaningful = rebuilt
            .iter()
            .filter(|r| trimmed_len(&r.text) > MEANINGFUL_LINE_LEN)
            .count();

        if meaningful >= self.min_meaningful_lines {
            log::info!(
                "Page {}: reconstructed to {} rows ({} meaningful)",
                page.number,
                rebuilt.len(),
                meaningful
            );
            page.rows = rebuilt;
            Some(page)
        } else {
            log::info!(
                "Deleting page {}: only {} meaningful rows after reconstruction",
                page.number,
                meaningful
            );
            None
        }
    }

    /// Filter a whole deck, preserving page numbers and order.
    pub fn filter(&self, pages: Vec<PageRows>) -> Vec<PageRows> {
        let before = pages.len();
        let kept: Vec<PageRows> = pages
            .into_iter()
            .filter_map(|p| self.apply_to_page(p))
            .collect();

        log::debug!(
            "Fragmentation filter kept {} of {} pages",
            kept.len(),
            before
        );
        kept
    }
}

impl Default for FragmentationFilter {
    fn default() -> Self {
        Self::new(0.7, true)
    }
}
