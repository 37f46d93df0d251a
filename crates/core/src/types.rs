//! Domain types for representing extracted slide content.

use serde::{Deserialize, Serialize};

/// A word as positioned on the page by the PDF layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Word text as extracted.
    pub text: String,

    /// Left edge of the word.
    pub x0: f64,

    /// Top edge of the word (grows downwards).
    pub top: f64,

    /// Font size of the word.
    pub size: f64,
}

impl Word {
    /// Create a new word.
    pub fn new(text: impl Into<String>, x0: f64, top: f64, size: f64) -> Self {
        Self {
            text: text.into(),
            x0,
            top,
            size,
        }
    }

    /// Whether the word is a lone character once surrounding whitespace is removed.
    pub fn is_single_char(&self) -> bool {
        self.text.trim().chars().count() == 1
    }
}

/// All words of one PDF page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageWords {
    /// 1-based page number in the source PDF.
    pub number: usize,

    /// Words in extraction order.
    pub words: Vec<Word>,
}

impl PageWords {
    /// Create a page from its words.
    pub fn new(number: usize, words: Vec<Word>) -> Self {
        Self { number, words }
    }
}

/// Words sharing one visual line, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// X position of the leftmost word.
    pub x0: f64,

    /// Cleaned row text.
    pub text: String,

    /// Words of the row after fragment merging.
    pub words: Vec<Word>,
}

impl Row {
    /// Vertical position of the row, taken from its first word.
    pub fn top(&self) -> f64 {
        self.words.first().map(|w| w.top).unwrap_or(0.0)
    }
}

/// A flattened content unit with its horizontal indent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub indent: f64,
    pub text: String,
}

impl Bullet {
    pub fn new(indent: f64, text: impl Into<String>) -> Self {
        Self {
            indent,
            text: text.into(),
        }
    }
}

/// One node of a slide outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub text: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a leaf node.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Create a node with the given children.
    pub fn with_children(text: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            text: text.into(),
            children,
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Number of levels in this subtree; a leaf has height 1.
    pub fn height(&self) -> usize {
        1 + self.children.iter().map(TreeNode::height).max().unwrap_or(0)
    }
}

/// The outline of one retained page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideTree {
    /// 1-based page number in the source PDF.
    pub page: usize,

    /// Largest-font text of the page.
    pub title: String,

    /// Top-level outline nodes in reading order.
    pub tree: Vec<TreeNode>,
}

impl SlideTree {
    pub fn new(page: usize, title: impl Into<String>, tree: Vec<TreeNode>) -> Self {
        Self {
            page,
            title: title.into(),
            tree,
        }
    }

    /// Total number of nodes in the outline.
    pub fn node_count(&self) -> usize {
        self.tree.iter().map(TreeNode::node_count).sum()
    }

    /// Number of nesting levels in the outline (0 for an empty slide).
    pub fn depth(&self) -> usize {
        self.tree.iter().map(TreeNode::height).max().unwrap_or(0)
    }
}

/// Every retained slide of one PDF, in page order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    /// Original filename (without path).
    pub filename: String,

    /// Number of pages in the source PDF.
    pub page_count: usize,

    /// Retained slides in page order.
    pub slides: Vec<SlideTree>,
}

impl Deck {
    /// Create an empty deck for the given source.
    pub fn new(filename: impl Into<String>, page_count: usize) -> Self {
        Self {
            filename: filename.into(),
            page_count,
            slides: Vec::new(),
        }
    }

    /// Add a slide to the deck.
    pub fn add_slide(&mut self, slide: SlideTree) {
        self.slides.push(slide);
    }

    /// Page numbers of the retained slides.
    pub fn pages(&self) -> Vec<usize> {
        self.slides.iter().map(|s| s.page).collect()
    }

    /// Find a retained slide by its source page number.
    pub fn slide(&self, page: usize) -> Option<&SlideTree> {
        self.slides.iter().find(|s| s.page == page)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// How the plan slide of a deck was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMethod {
    /// The caller named the page and it was retained.
    UserSpecified,
    /// The caller named a page that is not among the retained slides.
    UserSpecifiedNotFound,
    /// A big-font title in the first pages contained a plan keyword.
    Keywords,
    /// No page qualified.
    NoneFound,
}

/// A deck separated into its plan slide and content slides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSplit {
    pub plan: Option<SlideTree>,
    pub content: Vec<SlideTree>,
    pub method: PlanMethod,
}
