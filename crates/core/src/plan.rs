//! Locating the plan (table of contents) slide of a deck.
//!
//! Only titles set in the page's biggest font are considered, and only on
//! the first few pages. A caller who knows better can name the page instead.

use crate::config::{ExtractorConfig, DEFAULT_PLAN_KEYWORDS};
use crate::title::slide_title;
use crate::types::{Deck, PageWords, PlanMethod, PlanSplit, SlideTree};

/// Finds the plan slide by keyword.
#[derive(Debug, Clone)]
pub struct PlanDetector {
    /// Lowercased keywords.
    keywords: Vec<String>,
    scan_pages: usize,
}

impl PlanDetector {
    pub fn new<I, S>(keywords: I, scan_pages: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            scan_pages,
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(&config.plan_keywords, config.plan_scan_pages)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn scan_pages(&self) -> usize {
        self.scan_pages
    }

    /// Keywords contained in a title, ignoring case.
    pub fn matched_keywords(&self, title: &str) -> Vec<String> {
        let title = title.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| title.contains(k.as_str()))
            .cloned()
            .collect()
    }

    /// Page number of the first early page whose big-font title names a plan
    /// and which survived into the deck.
    pub fn detect(&self, pages: &[PageWords], deck: &Deck) -> Option<usize> {
        pages
            .iter()
            .filter(|p| p.number <= self.scan_pages && !p.words.is_empty())
            .find(|p| {
                let title = slide_title(&p.words);
                !self.matched_keywords(&title).is_empty() && deck.slide(p.number).is_some()
            })
            .map(|p| p.number)
    }

    /// Separate the plan slide from the content slides.
    ///
    /// `requested` bypasses keyword search; it must name a retained page.
    pub fn split(&self, deck: &Deck, pages: &[PageWords], requested: Option<usize>) -> PlanSplit {
        let (plan, method) = match requested {
            Some(page) => match deck.slide(page) {
                Some(slide) => (Some(slide.clone()), PlanMethod::UserSpecified),
                None => {
                    log::warn!(
                        "Requested plan slide {} is not among the {} retained slides",
                        page,
                        deck.len()
                    );
                    (None, PlanMethod::UserSpecifiedNotFound)
                }
            },
            None => match self.detect(pages, deck).and_then(|page| deck.slide(page)) {
                Some(slide) => (Some(slide.clone()), PlanMethod::Keywords),
                None => (None, PlanMethod::NoneFound),
            },
        };

        if let Some(slide) = &plan {
            log::info!("Using slide {} as plan: '{}'", slide.page, slide.title);
        }

        let plan_page = plan.as_ref().map(|s| s.page);
        let content = deck
            .slides
            .iter()
            .filter(|s| Some(s.page) != plan_page)
            .cloned()
            .collect();

        PlanSplit {
            plan,
            content,
            method,
        }
    }
}

impl Default for PlanDetector {
    fn default() -> Self {
        Self::new(DEFAULT_PLAN_KEYWORDS, 10)
    }
}

/// Treat a whole deck as one plan document.
///
/// A single slide is returned as is; several slides are concatenated under
/// the first slide's title, reported as page 1.
pub fn combine_as_plan(deck: &Deck) -> SlideTree {
    match deck.slides.as_slice() {
        [] => SlideTree::new(1, "", Vec::new()),
        [only] => only.clone(),
        [first, ..] => SlideTree::new(
            1,
            first.title.clone(),
            deck.slides
                .iter()
                .flat_map(|s| s.tree.iter().cloned())
                .collect(),
        ),
    }
}
