//! Indent clustering and outline construction.

use crate::types::{Bullet, TreeNode};

/// Ordered depth buckets built from the distinct indents of one slide.
///
/// Bucket `i` holds the indents at depth `i`. There are never more buckets
/// than the depth limit: indents past the limit share the deepest bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndentLevels {
    clusters: Vec<Vec<f64>>,
}

impl IndentLevels {
    /// Cluster indents greedily, left to right.
    ///
    /// A new bucket starts whenever an indent is more than `tolerance` to the
    /// right of the previous one.
    pub fn cluster<I>(indents: I, tolerance: f64, max_depth: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values: Vec<f64> = indents.into_iter().collect();
        values.sort_by(f64::total_cmp);
        values.dedup();

        let mut clusters: Vec<Vec<f64>> = Vec::new();
        for x in values {
            let extends = clusters
                .last()
                .and_then(|current| current.last())
                .is_some_and(|&last| x - last <= tolerance);

            match clusters.last_mut() {
                Some(current) if extends => current.push(x),
                _ => clusters.push(vec![x]),
            }
        }

        let max_depth = max_depth.max(1);
        if clusters.len() > max_depth {
            let overflow: Vec<f64> = clusters.drain(max_depth..).flatten().collect();
            clusters[max_depth - 1].extend(overflow);
        }

        Self { clusters }
    }

    /// Cluster the indents of a bullet list.
    pub fn from_bullets(bullets: &[Bullet], tolerance: f64, max_depth: usize) -> Self {
        Self::cluster(bullets.iter().map(|b| b.indent), tolerance, max_depth)
    }

    /// Depth of an indent: the index of the first bucket reaching it.
    pub fn depth_of(&self, indent: f64) -> usize {
        self.clusters
            .iter()
            .position(|c| c.last().is_some_and(|&max| indent <= max))
            .unwrap_or_else(|| self.clusters.len().saturating_sub(1))
    }

    /// Number of depth buckets.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn clusters(&self) -> &[Vec<f64>] {
        &self.clusters
    }
}

/// The sibling list reached by following `path` from the roots.
fn children_at<'a>(roots: &'a mut Vec<TreeNode>, path: &[usize]) -> &'a mut Vec<TreeNode> {
    let mut level = roots;
    for &index in path {
        level = &mut level[index].children;
    }
    level
}

/// Nest bullets by depth.
///
/// Walks bullets in order with a stack of open nodes: the stack is cut down
/// to the bullet's depth, the new node is attached under the top of the stack
/// (or as a root), then becomes the top. A bullet jumping several levels
/// deeper hangs directly under the current node; missing levels are not
/// invented.
pub fn build_tree(bullets: &[Bullet], levels: &IndentLevels) -> Vec<TreeNode> {
    let mut roots = Vec::new();
    // Index of each open node within its parent's children
    let mut stack: Vec<usize> = Vec::new();

    for bullet in bullets {
        let depth = levels.depth_of(bullet.indent);
        stack.truncate(depth);

        let siblings = children_at(&mut roots, &stack);
        siblings.push(TreeNode::new(bullet.text.clone()));
        stack.push(siblings.len() - 1);
    }

    roots
}

/// Cluster a slide's indents and nest its bullets in one step.
pub fn bullet_tree(bullets: &[Bullet], tolerance: f64, max_depth: usize) -> Vec<TreeNode> {
    if bullets.is_empty() {
        return Vec::new();
    }
    let levels = IndentLevels::from_bullets(bullets, tolerance, max_depth);
    build_tree(bullets, &levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn b(indent: f64, text: &str) -> Bullet {
        Bullet::new(indent, text)
    }

    #[test]
    fn test_cluster_within_tolerance() {
        let levels = IndentLevels::cluster([50.0, 52.0, 54.5, 70.0, 71.0], 5.0, 3);

        assert_eq!(levels.clusters(), &[vec![50.0, 52.0, 54.5], vec![70.0, 71.0]]);
        assert_eq!(levels.depth_of(54.5), 0);
        assert_eq!(levels.depth_of(70.0), 1);
    }

    #[test]
    fn test_chained_indents_join_one_cluster() {
        // Each step is within tolerance even though the ends are 12 apart
        let levels = IndentLevels::cluster([50.0, 54.0, 58.0, 62.0], 5.0, 3);
        assert_eq!(levels.len(), 1);
    }

    #[test]
    fn test_single_indent_is_depth_zero() {
        let levels = IndentLevels::cluster([33.0, 33.0], 5.0, 3);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels.depth_of(33.0), 0);
    }

    #[test]
    fn test_overflow_folds_into_last_allowed_level() {
        let levels = IndentLevels::cluster([10.0, 30.0, 50.0, 70.0], 5.0, 3);

        assert_eq!(levels.clusters(), &[vec![10.0], vec![30.0], vec![50.0, 70.0]]);
        assert_eq!(levels.depth_of(50.0), 2);
        assert_eq!(levels.depth_of(70.0), 2);

        let tree = bullet_tree(
            &[b(10.0, "a"), b(30.0, "b"), b(50.0, "c"), b(70.0, "d")],
            5.0,
            3,
        );
        assert_eq!(
            tree,
            vec![TreeNode::with_children(
                "a",
                vec![TreeNode::with_children(
                    "b",
                    vec![TreeNode::new("c"), TreeNode::new("d")]
                )]
            )]
        );
    }

    #[test]
    fn test_depth_one_flattens_everything() {
        let tree = bullet_tree(&[b(10.0, "a"), b(40.0, "b"), b(80.0, "c")], 5.0, 1);
        assert_eq!(
            tree,
            vec![TreeNode::new("a"), TreeNode::new("b"), TreeNode::new("c")]
        );
    }

    #[test]
    fn test_inline_children_share_parent() {
        // Rows (x0=50, "Intro") and (x0=70, "• first • second")
        let tree = bullet_tree(
            &[b(50.0, "Intro"), b(70.0, "first"), b(70.0, "second")],
            5.0,
            3,
        );
        assert_eq!(
            tree,
            vec![TreeNode::with_children(
                "Intro",
                vec![TreeNode::new("first"), TreeNode::new("second")]
            )]
        );
    }

    #[test]
    fn test_parent_row_with_inline_child() {
        // Rows (x0=50, "Intro") and (x0=50, "first • second"), glyph at x=70
        let tree = bullet_tree(
            &[b(50.0, "Intro"), b(50.0, "first"), b(70.0, "second")],
            5.0,
            3,
        );
        assert_eq!(
            tree,
            vec![
                TreeNode::new("Intro"),
                TreeNode::with_children("first", vec![TreeNode::new("second")]),
            ]
        );
    }

    #[test]
    fn test_skipped_level_is_not_synthesized() {
        // A slide whose shallowest bullet sits at depth 2
        let levels = IndentLevels::cluster([10.0, 30.0, 50.0], 5.0, 3);
        let tree = build_tree(&[b(50.0, "deep"), b(10.0, "top"), b(50.0, "child")], &levels);

        assert_eq!(
            tree,
            vec![
                TreeNode::new("deep"),
                TreeNode::with_children("top", vec![TreeNode::new("child")]),
            ]
        );
    }

    #[test]
    fn test_empty_bullets_empty_tree() {
        assert!(bullet_tree(&[], 5.0, 3).is_empty());
        assert_eq!(IndentLevels::default().depth_of(12.0), 0);
    }

    proptest! {
        #[test]
        fn prop_depth_cap_and_conservation(
            indents in prop::collection::vec(0u16..300, 0..40),
            max_depth in 1usize..6,
        ) {
            let bullets: Vec<Bullet> = indents
                .iter()
                .enumerate()
                .map(|(i, &x)| Bullet::new(f64::from(x), format!("b{i}")))
                .collect();
            let tree = bullet_tree(&bullets, 5.0, max_depth);

            let height = tree.iter().map(TreeNode::height).max().unwrap_or(0);
            prop_assert!(height <= max_depth);

            let nodes: usize = tree.iter().map(TreeNode::node_count).sum();
            prop_assert_eq!(nodes, bullets.len());

            let levels = IndentLevels::from_bullets(&bullets, 5.0, max_depth);
            prop_assert!(levels.len() <= max_depth);
        }
    }
}
