//! Plain-text outline output.
//!
//! Each slide is printed as its title followed by its nodes, one per line,
//! indented by depth. Slides are separated by a blank line.

use crate::types::{Deck, SlideTree, TreeNode};

/// Formatter for indented text outlines.
#[derive(Debug, Clone)]
pub struct OutlineFormatter {
    /// Spaces per nesting level.
    indent_width: usize,
    /// Prefix written before each node's text.
    marker: String,
}

impl Default for OutlineFormatter {
    fn default() -> Self {
        Self {
            indent_width: 2,
            marker: "- ".to_string(),
        }
    }
}

impl OutlineFormatter {
    /// Create a formatter with two-space indents and `- ` markers.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    fn write_nodes(&self, nodes: &[TreeNode], depth: usize, out: &mut Vec<String>) {
        for node in nodes {
            out.push(format!(
                "{}{}{}",
                " ".repeat(depth * self.indent_width),
                self.marker,
                node.text
            ));
            self.write_nodes(&node.children, depth + 1, out);
        }
    }

    /// Format one slide.
    ///
    /// # Example output
    /// ```text
    /// [3] Introduction
    /// - Le génome
    ///   - ADN
    /// - Conclusion
    /// ```
    pub fn format_slide(&self, slide: &SlideTree) -> String {
        let mut lines = vec![format!("[{}] {}", slide.page, slide.title)];
        self.write_nodes(&slide.tree, 0, &mut lines);
        lines.join("\n")
    }

    /// Format several slides, separated by blank lines.
    pub fn format_slides<'a, I>(&self, slides: I) -> String
    where
        I: IntoIterator<Item = &'a SlideTree>,
    {
        slides
            .into_iter()
            .map(|s| self.format_slide(s))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Format a whole deck with a trailing newline.
    pub fn format_deck(&self, deck: &Deck) -> String {
        let formatted = self.format_slides(&deck.slides);
        if formatted.is_empty() {
            formatted
        } else {
            format!("{}\n", formatted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide() -> SlideTree {
        SlideTree::new(
            3,
            "Introduction",
            vec![
                TreeNode::with_children("Le génome", vec![TreeNode::new("ADN")]),
                TreeNode::new("Conclusion"),
            ],
        )
    }

    #[test]
    fn test_format_slide() {
        let text = OutlineFormatter::new().format_slide(&slide());
        assert_eq!(
            text,
            "[3] Introduction\n- Le génome\n  - ADN\n- Conclusion"
        );
    }

    #[test]
    fn test_custom_indent_and_marker() {
        let text = OutlineFormatter::new()
            .with_indent_width(4)
            .with_marker("* ")
            .format_slide(&slide());
        assert!(text.contains("\n    * ADN"));
    }

    #[test]
    fn test_empty_slide_is_title_only() {
        let text = OutlineFormatter::new().format_slide(&SlideTree::new(1, "", vec![]));
        assert_eq!(text, "[1] ");
    }

    #[test]
    fn test_format_deck() {
        let mut deck = Deck::new("cours.pdf", 4);
        deck.add_slide(SlideTree::new(1, "Plan", vec![TreeNode::new("a")]));
        deck.add_slide(SlideTree::new(4, "Fin", vec![]));

        let text = OutlineFormatter::new().format_deck(&deck);
        assert_eq!(text, "[1] Plan\n- a\n\n[4] Fin\n");
        assert_eq!(OutlineFormatter::new().format_deck(&Deck::new("x.pdf", 0)), "");
    }
}
