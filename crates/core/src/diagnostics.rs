//! Diagnostic reports for inspecting how a deck was read.
//!
//! None of these feed the outline itself; they exist to explain why a page
//! came out fragmented, how its rows were split, or why a plan slide was
//! (not) picked.

use crate::bullets::BulletExploder;
use crate::plan::PlanDetector;
use crate::repair::clean_fragmented_text;
use crate::rows::{group_rows, BannerTally, RowAssembler};
use crate::title::{max_font_size, slide_title};
use crate::types::{Bullet, Deck, PageWords, PlanMethod, PlanSplit};
use serde::Serialize;

/// Number of sample words listed per category.
const SAMPLE_LEN: usize = 10;

/// One visual row before and after text cleanup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowDiagnostic {
    pub y_position: f64,
    pub word_count: usize,
    pub raw_text: String,
    pub cleaned_text: String,
    pub is_fragmented: bool,
}

/// Word-level fragmentation statistics of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageFragmentationStats {
    pub page: usize,
    pub total_words: usize,
    pub single_char_words: usize,
    pub multi_char_words: usize,
    pub fragmentation_ratio: f64,
    pub rows: Vec<RowDiagnostic>,
    pub sample_single_chars: Vec<String>,
    pub sample_multi_chars: Vec<String>,
}

/// Raw words of a page grouped into rows, with cleanup applied per row.
pub fn fragmentation_report(page: &PageWords) -> PageFragmentationStats {
    let single: Vec<&str> = page
        .words
        .iter()
        .filter(|w| w.is_single_char())
        .map(|w| w.text.as_str())
        .collect();
    let multi: Vec<&str> = page
        .words
        .iter()
        .filter(|w| w.text.trim().chars().count() > 1)
        .map(|w| w.text.as_str())
        .collect();

    let rows = group_rows(&page.words)
        .into_iter()
        .map(|(y, words)| {
            let raw_text = words
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let cleaned_text = clean_fragmented_text(&raw_text);
            RowDiagnostic {
                y_position: y,
                word_count: words.len(),
                is_fragmented: raw_text != cleaned_text,
                raw_text,
                cleaned_text,
            }
        })
        .collect();

    let total = page.words.len();
    PageFragmentationStats {
        page: page.number,
        total_words: total,
        single_char_words: single.len(),
        multi_char_words: multi.len(),
        fragmentation_ratio: if total == 0 {
            0.0
        } else {
            single.len() as f64 / total as f64
        },
        rows,
        sample_single_chars: single.iter().take(SAMPLE_LEN).map(|s| s.to_string()).collect(),
        sample_multi_chars: multi.iter().take(SAMPLE_LEN).map(|s| s.to_string()).collect(),
    }
}

/// The bullets one row was split into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowBullets {
    pub x0: f64,
    pub text: String,
    pub bullets: Vec<Bullet>,
}

/// Row-by-row trace of bullet explosion on one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulletTrace {
    pub page: usize,
    pub rows: Vec<RowBullets>,
    pub total_bullets: usize,
    /// Bullets of a single character, usually a sign of unrepaired fragments.
    pub single_char_bullets: usize,
}

/// Assemble one page on its own and record every row's bullets.
pub fn bullet_report(
    page: &PageWords,
    assembler: &RowAssembler,
    exploder: &BulletExploder,
) -> BulletTrace {
    let page_rows = assembler.assemble_page(page, &mut BannerTally::new());

    let rows: Vec<RowBullets> = page_rows
        .rows
        .iter()
        .map(|row| RowBullets {
            x0: row.x0,
            text: row.text.clone(),
            bullets: exploder.explode_row(row),
        })
        .collect();

    let bullets: Vec<&Bullet> = rows.iter().flat_map(|r| r.bullets.iter()).collect();
    let total_bullets = bullets.len();
    let single_char_bullets = bullets
        .iter()
        .filter(|b| b.text.trim().chars().count() == 1)
        .count();

    BulletTrace {
        page: page.number,
        rows,
        total_bullets,
        single_char_bullets,
    }
}

/// Title analysis of one page during plan detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanCandidate {
    pub page: usize,
    pub has_words: bool,
    pub title_text: String,
    pub max_font_size: f64,
    pub found_keywords: Vec<String>,
    /// Whether the page lies within the scanned range.
    pub within_scan: bool,
}

/// Plan detection details for every page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanDetectionReport {
    pub keywords_searched: Vec<String>,
    pub scan_pages: usize,
    pub pages: Vec<PlanCandidate>,
}

pub fn plan_report(pages: &[PageWords], detector: &PlanDetector) -> PlanDetectionReport {
    let scan_pages = detector.scan_pages();
    let candidates = pages
        .iter()
        .map(|p| {
            let title_text = slide_title(&p.words);
            PlanCandidate {
                page: p.number,
                has_words: !p.words.is_empty(),
                found_keywords: detector.matched_keywords(&title_text),
                title_text,
                max_font_size: max_font_size(&p.words).unwrap_or(0.0),
                within_scan: p.number <= scan_pages,
            }
        })
        .collect();

    PlanDetectionReport {
        keywords_searched: detector.keywords().to_vec(),
        scan_pages,
        pages: candidates,
    }
}

/// Short description of one retained slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideOverview {
    pub page: usize,
    pub title: String,
    pub top_level_items: usize,
    pub node_count: usize,
    pub depth: usize,
}

/// How plan-like a slide looks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanScore {
    pub page: usize,
    pub title: String,
    pub has_plan_keyword: bool,
    pub has_multiple_items: bool,
    pub score: usize,
}

/// Structure of a deck and the outcome of plan detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckAnalysis {
    pub total_slides: usize,
    pub plan_page: Option<usize>,
    pub plan_title: String,
    pub content_slides: usize,
    pub method: PlanMethod,
    /// Slides ranked by plan score, best first.
    pub candidates: Vec<PlanScore>,
    pub slides: Vec<SlideOverview>,
}

/// Summarize a deck and its plan split.
pub fn analyze(deck: &Deck, split: &PlanSplit, detector: &PlanDetector) -> DeckAnalysis {
    let mut candidates: Vec<PlanScore> = deck
        .slides
        .iter()
        .map(|s| {
            let has_plan_keyword = !detector.matched_keywords(&s.title).is_empty();
            let has_multiple_items = s.tree.len() >= 3;
            PlanScore {
                page: s.page,
                title: s.title.clone(),
                has_plan_keyword,
                has_multiple_items,
                score: usize::from(has_plan_keyword) + usize::from(has_multiple_items),
            }
        })
        .collect();
    candidates.sort_by(|a, b| b.score.cmp(&a.score));

    DeckAnalysis {
        total_slides: deck.len(),
        plan_page: split.plan.as_ref().map(|s| s.page),
        plan_title: split
            .plan
            .as_ref()
            .map(|s| s.title.clone())
            .unwrap_or_default(),
        content_slides: split.content.len(),
        method: split.method,
        candidates,
        slides: deck
            .slides
            .iter()
            .map(|s| SlideOverview {
                page: s.page,
                title: s.title.clone(),
                top_level_items: s.tree.len(),
                node_count: s.node_count(),
                depth: s.depth(),
            })
            .collect(),
    }
}
