//! The extraction pipeline: from positioned words to slide outlines.

use crate::bullets::BulletExploder;
use crate::config::{ExtractorConfig, Patterns};
use crate::diagnostics::{
    self, BulletTrace, DeckAnalysis, PageFragmentationStats, PlanDetectionReport,
};
use crate::error::{Error, Result};
use crate::fragmentation::FragmentationFilter;
use crate::plan::{combine_as_plan, PlanDetector};
use crate::rows::{remove_banner_rows, BannerTally, RowAssembler};
use crate::title::slide_title;
use crate::tree::bullet_tree;
use crate::types::{Deck, PageWords, PlanSplit, SlideTree};
use std::collections::HashMap;
use std::path::Path;

/// A backend that reads the positioned words of every page of a document.
pub trait WordSource {
    /// Load all pages, numbered from 1 in document order.
    fn load(&self, path: &Path) -> Result<Vec<PageWords>>;

    /// Short name of the backend, for logs.
    fn backend_name(&self) -> &str;
}

/// Turns slide-deck pages into outlines.
#[derive(Debug, Clone)]
pub struct SlideTreeExtractor {
    config: ExtractorConfig,
    assembler: RowAssembler,
    exploder: BulletExploder,
    fragmentation: FragmentationFilter,
    plan: PlanDetector,
}

impl SlideTreeExtractor {
    /// Validate a configuration and compile its patterns.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        let patterns = Patterns::from_config(&config)?;

        Ok(Self {
            assembler: RowAssembler::new(patterns.clone(), config.repair),
            exploder: BulletExploder::new(patterns),
            fragmentation: FragmentationFilter::from_config(&config),
            plan: PlanDetector::from_config(&config),
            config,
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Read the pages of a file, failing early if it does not exist.
    pub fn load_pages(&self, source: &dyn WordSource, path: &Path) -> Result<Vec<PageWords>> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        log::debug!("Reading {} with {}", path.display(), source.backend_name());
        let pages = source.load(path)?;
        if pages.is_empty() {
            log::warn!("{} has no pages", path.display());
        }
        Ok(pages)
    }

    /// Extract the outline of every retained page of a file.
    pub fn extract_path(&self, source: &dyn WordSource, path: &Path) -> Result<Deck> {
        let pages = self.load_pages(source, path)?;
        Ok(self.extract_pages(&file_name(path), &pages))
    }

    /// Run the pipeline over pages that are already loaded.
    pub fn extract_pages(&self, filename: &str, pages: &[PageWords]) -> Deck {
        let page_count = pages
            .iter()
            .map(|p| p.number)
            .max()
            .unwrap_or(0)
            .max(pages.len());
        let mut deck = Deck::new(filename, page_count);

        let mut tally = BannerTally::new();
        let mut titles: HashMap<usize, String> = HashMap::new();
        let mut assembled = Vec::with_capacity(pages.len());

        for page in pages {
            if self.config.skip_pages.contains(&page.number) {
                log::info!("Skipping page {}", page.number);
                continue;
            }
            log::debug!("Page {}: {} words", page.number, page.words.len());

            titles.insert(page.number, slide_title(&page.words));
            assembled.push(self.assembler.assemble_page(page, &mut tally));
        }

        let banners = tally.recurring(assembled.len(), self.config.banner_ratio);
        if !banners.is_empty() {
            log::debug!("Removing {} recurring banner(s): {:?}", banners.len(), banners);
        }
        remove_banner_rows(&mut assembled, &banners);

        let assembled = if self.config.filter_fragmented_pages {
            self.fragmentation.filter(assembled)
        } else {
            assembled
        };

        for page in assembled {
            let bullets = self.exploder.explode_rows(&page.rows);
            let tree = bullet_tree(
                &bullets,
                self.config.indent_tolerance,
                self.config.max_tree_depth,
            );
            let title = titles.remove(&page.number).unwrap_or_default();
            deck.add_slide(SlideTree::new(page.number, title, tree));
        }

        log::debug!(
            "{}: {} of {} pages retained",
            filename,
            deck.len(),
            page_count
        );
        deck
    }

    /// Separate the plan slide of an extracted deck from its content.
    pub fn split_plan(
        &self,
        deck: &Deck,
        pages: &[PageWords],
        plan_page: Option<usize>,
    ) -> PlanSplit {
        self.plan.split(deck, pages, plan_page)
    }

    /// Extract a file and split it into plan and content slides.
    pub fn process_path(
        &self,
        source: &dyn WordSource,
        path: &Path,
        plan_page: Option<usize>,
    ) -> Result<PlanSplit> {
        let pages = self.load_pages(source, path)?;
        let deck = self.extract_pages(&file_name(path), &pages);
        Ok(self.split_plan(&deck, &pages, plan_page))
    }

    /// Extract a file holding only a plan, merged into one outline.
    pub fn extract_plan_path(&self, source: &dyn WordSource, path: &Path) -> Result<SlideTree> {
        let deck = self.extract_path(source, path)?;
        Ok(combine_as_plan(&deck))
    }

    pub fn fragmentation_report(&self, page: &PageWords) -> PageFragmentationStats {
        diagnostics::fragmentation_report(page)
    }

    pub fn bullet_report(&self, page: &PageWords) -> BulletTrace {
        diagnostics::bullet_report(page, &self.assembler, &self.exploder)
    }

    pub fn plan_report(&self, pages: &[PageWords]) -> PlanDetectionReport {
        diagnostics::plan_report(pages, &self.plan)
    }

    /// Extract, split and summarize already loaded pages.
    pub fn analyze(
        &self,
        filename: &str,
        pages: &[PageWords],
        plan_page: Option<usize>,
    ) -> DeckAnalysis {
        let deck = self.extract_pages(filename, pages);
        let split = self.split_plan(&deck, pages, plan_page);
        diagnostics::analyze(&deck, &split, &self.plan)
    }
}

/// Final component of a path, or an empty string.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
