//! Core engine for turning slide-deck PDFs into nested outlines.
//!
//! Pages arrive as flat lists of positioned words from a [`WordSource`].
//! Words are grouped into rows, repaired when the PDF split them into single
//! glyphs, split on inline bullet glyphs, and nested by indentation into one
//! [`SlideTree`] per retained page.

pub mod bullets;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod extractor;
pub mod fragmentation;
pub mod outline;
pub mod plan;
pub mod repair;
pub mod rows;
pub mod title;
pub mod tree;
pub mod types;

pub use config::{ExtractorConfig, Patterns, RepairConfig};
pub use error::{Error, Result};
pub use extractor::{SlideTreeExtractor, WordSource};
pub use outline::OutlineFormatter;
pub use plan::{combine_as_plan, PlanDetector};
pub use types::{Bullet, Deck, PageWords, PlanMethod, PlanSplit, Row, SlideTree, TreeNode, Word};
