//! Extraction settings and the compiled pattern sets derived from them.

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Default bullet glyphs recognised inside a row.
pub const DEFAULT_BULLET_GLYPHS: &str = "•◦‣▪–";

/// Default glyphs a row is split on. Dashes and hollow markers are left out
/// so that ranges such as `1939–1945` stay whole.
pub const DEFAULT_SPLIT_GLYPHS: &str = "•";

/// Default running-header pattern (course codes such as `L3SpS:`).
pub const DEFAULT_BANNER_PATTERN: &str = r"^L\d?SpS:";

static DEFAULT_BANNER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_BANNER_PATTERN).unwrap());

/// Default keywords searched in big-font titles to locate the plan slide.
pub const DEFAULT_PLAN_KEYWORDS: &[&str] = &[
    "plan",
    "agenda",
    "outline",
    "sommaire",
    "table",
    "contenu",
    "table des matières",
];

/// Thresholds for merging character-fragmented words within a row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Largest horizontal gap between two glyphs of the same word.
    pub max_char_gap: f64,

    /// Width assumed for a single glyph when measuring the gap.
    pub nominal_char_width: f64,

    /// Largest vertical offset between two glyphs of the same word.
    pub vertical_tolerance: f64,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            max_char_gap: 8.0,
            nominal_char_width: 10.0,
            vertical_tolerance: 2.0,
        }
    }
}

/// Settings for a [`SlideTreeExtractor`](crate::SlideTreeExtractor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Largest gap between indents that still share a depth.
    pub indent_tolerance: f64,

    /// Number of nesting levels kept in a slide outline.
    pub max_tree_depth: usize,

    /// Share of short rows above which a page counts as fragmented.
    pub fragmentation_threshold: f64,

    /// 1-based pages excluded before any processing.
    pub skip_pages: Vec<usize>,

    /// Drop fragmented pages instead of trying to rebuild them.
    pub delete_fragmented_pages: bool,

    /// Run the fragmented page filter at all.
    pub filter_fragmented_pages: bool,

    /// Characters marking a bullet word; the first one sets the children's indent.
    pub bullet_glyphs: String,

    /// Characters a row is split on.
    pub split_glyphs: String,

    /// Regex matched against each word to spot running headers.
    pub banner_pattern: String,

    /// Share of pages a banner must appear on to be removed deck-wide.
    pub banner_ratio: f64,

    /// Keywords that mark a title as the plan slide.
    pub plan_keywords: Vec<String>,

    /// Only pages up to this number are searched for a plan slide.
    pub plan_scan_pages: usize,

    /// Row-level fragment merge thresholds.
    pub repair: RepairConfig,

    /// Largest horizontal distance between fragments rebuilt into one line.
    pub max_reconstruct_distance: f64,

    /// Meaningful lines a rebuilt page needs to be kept.
    pub min_meaningful_lines: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            indent_tolerance: 5.0,
            max_tree_depth: 3,
            fragmentation_threshold: 0.7,
            skip_pages: Vec::new(),
            delete_fragmented_pages: true,
            filter_fragmented_pages: true,
            bullet_glyphs: DEFAULT_BULLET_GLYPHS.to_string(),
            split_glyphs: DEFAULT_SPLIT_GLYPHS.to_string(),
            banner_pattern: DEFAULT_BANNER_PATTERN.to_string(),
            banner_ratio: 0.8,
            plan_keywords: DEFAULT_PLAN_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            plan_scan_pages: 10,
            repair: RepairConfig::default(),
            max_reconstruct_distance: 50.0,
            min_meaningful_lines: 5,
        }
    }
}

impl ExtractorConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent_tolerance(mut self, tolerance: f64) -> Self {
        self.indent_tolerance = tolerance;
        self
    }

    pub fn with_max_tree_depth(mut self, depth: usize) -> Self {
        self.max_tree_depth = depth;
        self
    }

    pub fn with_fragmentation_threshold(mut self, threshold: f64) -> Self {
        self.fragmentation_threshold = threshold;
        self
    }

    pub fn with_skip_pages(mut self, pages: Vec<usize>) -> Self {
        self.skip_pages = pages;
        self
    }

    /// Set whether fragmented pages are deleted (true) or rebuilt (false).
    pub fn with_delete_fragmented_pages(mut self, delete: bool) -> Self {
        self.delete_fragmented_pages = delete;
        self
    }

    pub fn with_fragmentation_filter(mut self, enabled: bool) -> Self {
        self.filter_fragmented_pages = enabled;
        self
    }

    pub fn with_bullet_glyphs(mut self, glyphs: impl Into<String>) -> Self {
        self.bullet_glyphs = glyphs.into();
        self
    }

    pub fn with_split_glyphs(mut self, glyphs: impl Into<String>) -> Self {
        self.split_glyphs = glyphs.into();
        self
    }

    pub fn with_banner_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.banner_pattern = pattern.into();
        self
    }

    pub fn with_plan_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plan_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_plan_scan_pages(mut self, pages: usize) -> Self {
        self.plan_scan_pages = pages;
        self
    }

    /// Check every numeric setting is in range.
    pub fn validate(&self) -> Result<()> {
        if self.max_tree_depth < 1 {
            return Err(Error::InvalidConfig(
                "max_tree_depth must be at least 1".to_string(),
            ));
        }
        if !(self.indent_tolerance >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "indent_tolerance must be non-negative, got {}",
                self.indent_tolerance
            )));
        }
        if !(0.0..=1.0).contains(&self.fragmentation_threshold) {
            return Err(Error::InvalidConfig(format!(
                "fragmentation_threshold must be within 0..=1, got {}",
                self.fragmentation_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.banner_ratio) {
            return Err(Error::InvalidConfig(format!(
                "banner_ratio must be within 0..=1, got {}",
                self.banner_ratio
            )));
        }
        if self.bullet_glyphs.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "bullet_glyphs must name at least one character".to_string(),
            ));
        }
        if self.split_glyphs.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "split_glyphs must name at least one character".to_string(),
            ));
        }
        Ok(())
    }
}

/// Compiled bullet glyph sets and banner regex.
#[derive(Debug, Clone)]
pub struct Patterns {
    bullet_glyphs: Vec<char>,
    split_glyphs: Vec<char>,
    banner: Regex,
}

fn glyph_set(glyphs: &str) -> Vec<char> {
    glyphs.chars().filter(|c| !c.is_whitespace()).collect()
}

impl Patterns {
    /// Compile the patterns named by a configuration.
    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self::new(&config.bullet_glyphs, &config.banner_pattern)?
            .with_split_glyphs(&config.split_glyphs))
    }

    /// Compile a glyph set and banner pattern. Rows split on `•` only until
    /// [`with_split_glyphs`](Self::with_split_glyphs) says otherwise.
    pub fn new(bullet_glyphs: &str, banner_pattern: &str) -> Result<Self> {
        Ok(Self {
            bullet_glyphs: glyph_set(bullet_glyphs),
            split_glyphs: glyph_set(DEFAULT_SPLIT_GLYPHS),
            banner: Regex::new(banner_pattern)?,
        })
    }

    pub fn with_split_glyphs(mut self, glyphs: &str) -> Self {
        self.split_glyphs = glyph_set(glyphs);
        self
    }

    /// Whether a word's trimmed text is a running header.
    pub fn is_banner(&self, text: &str) -> bool {
        self.banner.is_match(text.trim())
    }

    pub fn is_bullet(&self, c: char) -> bool {
        self.bullet_glyphs.contains(&c)
    }

    pub fn contains_bullet(&self, text: &str) -> bool {
        text.chars().any(|c| self.is_bullet(c))
    }

    /// Whether a row is split at this character.
    pub fn is_split(&self, c: char) -> bool {
        self.split_glyphs.contains(&c)
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self {
            bullet_glyphs: glyph_set(DEFAULT_BULLET_GLYPHS),
            split_glyphs: glyph_set(DEFAULT_SPLIT_GLYPHS),
            banner: DEFAULT_BANNER_REGEX.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ExtractorConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_tree_depth, 3);
        assert_eq!(config.indent_tolerance, 5.0);
        assert!(config.delete_fragmented_pages);
        assert!(config.skip_pages.is_empty());
    }

    #[test]
    fn test_zero_depth_rejected() {
        let err = ExtractorConfig::new().with_max_tree_depth(0).validate();
        assert!(matches!(err, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let err = ExtractorConfig::new()
            .with_fragmentation_threshold(1.5)
            .validate();
        assert!(matches!(err, Err(Error::InvalidConfig(_))));

        let err = ExtractorConfig::new().with_indent_tolerance(-1.0).validate();
        assert!(matches!(err, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ExtractorConfig =
            serde_json::from_str(r#"{"max_tree_depth": 2, "skip_pages": [4]}"#).unwrap();
        assert_eq!(config.max_tree_depth, 2);
        assert_eq!(config.skip_pages, vec![4]);
        assert_eq!(config.fragmentation_threshold, 0.7);
        assert_eq!(config.repair, RepairConfig::default());
    }

    #[test]
    fn test_banner_pattern() {
        let patterns = Patterns::default();
        assert!(patterns.is_banner("L3SpS: Physiologie"));
        assert!(patterns.is_banner(" LSpS:"));
        assert!(!patterns.is_banner("Introduction"));
    }

    #[test]
    fn test_invalid_banner_pattern() {
        let result = Patterns::new("•", "(unclosed");
        assert!(matches!(result, Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_custom_bullet_glyphs() {
        let patterns = Patterns::new("* >", DEFAULT_BANNER_PATTERN).unwrap();
        assert!(patterns.contains_bullet("a * b"));
        assert!(patterns.contains_bullet("> b"));
        assert!(!patterns.contains_bullet("a • b"));
        assert!(!patterns.is_bullet(' '));
    }

    #[test]
    fn test_dash_marks_bullets_but_does_not_split() {
        let patterns = Patterns::default();
        assert!(patterns.is_bullet('–'));
        assert!(!patterns.is_split('–'));
        assert!(patterns.is_split('•'));

        let config = ExtractorConfig::new().with_split_glyphs("•▪");
        assert!(Patterns::from_config(&config).unwrap().is_split('▪'));
    }

    #[test]
    fn test_empty_split_glyphs_rejected() {
        let err = ExtractorConfig::new().with_split_glyphs(" ").validate();
        assert!(matches!(err, Err(Error::InvalidConfig(_))));
    }
}
