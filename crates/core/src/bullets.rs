//! Splitting rows that carry inline bullet glyphs.
//!
//! A row like `Parent • first • second` yields a parent bullet at the row's
//! left edge and one child per fragment. Rows are only split on the split
//! glyphs (`•` by default); dashes inside text such as `1939–1945` are left
//! alone. Every child of the row is indented at the x position of the first
//! word holding any bullet glyph, so siblings never drift apart by a few units
//! of glyph jitter.

use crate::config::Patterns;
use crate::types::{Bullet, Row, Word};

/// Splits rows into bullets.
#[derive(Debug, Clone)]
pub struct BulletExploder {
    patterns: Patterns,
}

impl BulletExploder {
    pub fn new(patterns: Patterns) -> Self {
        Self { patterns }
    }

    /// X position of the first word in the row that holds a bullet glyph.
    pub fn first_bullet_x(&self, words: &[Word]) -> Option<f64> {
        words
            .iter()
            .find(|w| self.patterns.contains_bullet(&w.text))
            .map(|w| w.x0)
    }

    /// Turn one row into its bullets.
    pub fn explode_row(&self, row: &Row) -> Vec<Bullet> {
        let Some(split_at) = row.text.find(|c: char| self.patterns.is_split(c)) else {
            return vec![Bullet::new(row.x0, row.text.clone())];
        };

        let head = row.text[..split_at].trim();
        let glyph_len = row.text[split_at..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(0);
        let tail = &row.text[split_at + glyph_len..];

        let mut out = Vec::new();
        if !head.is_empty() {
            out.push(Bullet::new(row.x0, head));
        }

        let child_indent = self.first_bullet_x(&row.words).unwrap_or(row.x0);
        out.extend(
            tail.split(|c: char| self.patterns.is_split(c))
                .map(str::trim)
                .filter(|fragment| !fragment.is_empty())
                .map(|fragment| Bullet::new(child_indent, fragment)),
        );

        out
    }

    /// Bullets of every row, in reading order.
    pub fn explode_rows(&self, rows: &[Row]) -> Vec<Bullet> {
        rows.iter().flat_map(|row| self.explode_row(row)).collect()
    }
}

impl Default for BulletExploder {
    fn default() -> Self {
        Self::new(Patterns::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(x0: f64, words: &[(&str, f64)]) -> Row {
        let words: Vec<Word> = words
            .iter()
            .map(|(text, x)| Word::new(*text, *x, 100.0, 14.0))
            .collect();
        Row {
            x0,
            text: words
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            words,
        }
    }

    #[test]
    fn test_plain_row_is_one_bullet() {
        let bullets = BulletExploder::default().explode_row(&row(50.0, &[("Intro", 50.0)]));
        assert_eq!(bullets, vec![Bullet::new(50.0, "Intro")]);
    }

    #[test]
    fn test_parent_and_children() {
        let r = row(
            50.0,
            &[
                ("INTRO", 50.0),
                ("•", 120.0),
                ("Le", 130.0),
                ("génome", 145.0),
                ("•", 220.0),
                ("humain", 230.0),
            ],
        );
        let bullets = BulletExploder::default().explode_row(&r);

        assert_eq!(
            bullets,
            vec![
                Bullet::new(50.0, "INTRO"),
                Bullet::new(120.0, "Le génome"),
                Bullet::new(120.0, "humain"),
            ]
        );
    }

    #[test]
    fn test_leading_bullet_has_no_parent() {
        let r = row(70.0, &[("•", 70.0), ("first", 80.0), ("•", 140.0), ("second", 150.0)]);
        let bullets = BulletExploder::default().explode_row(&r);

        assert_eq!(
            bullets,
            vec![Bullet::new(70.0, "first"), Bullet::new(70.0, "second")]
        );
    }

    #[test]
    fn test_glyph_attached_to_word() {
        let r = row(60.0, &[("Items", 60.0), ("•one", 110.0), ("•two", 160.0)]);
        let bullets = BulletExploder::default().explode_row(&r);

        assert_eq!(
            bullets,
            vec![
                Bullet::new(60.0, "Items"),
                Bullet::new(110.0, "one"),
                Bullet::new(110.0, "two"),
            ]
        );
    }

    #[test]
    fn test_en_dash_does_not_split() {
        let r = row(50.0, &[("Période", 50.0), ("1939–1945", 110.0)]);
        assert_eq!(
            BulletExploder::default().explode_row(&r),
            vec![Bullet::new(50.0, "Période 1939–1945")]
        );

        let r = row(50.0, &[("Intro", 50.0), ("–", 100.0), ("suite", 110.0)]);
        assert_eq!(
            BulletExploder::default().explode_row(&r),
            vec![Bullet::new(50.0, "Intro – suite")]
        );
    }

    #[test]
    fn test_dash_word_sets_child_indent() {
        let r = row(
            50.0,
            &[("Cours", 50.0), ("–", 90.0), ("bilan", 100.0), ("•", 160.0), ("fin", 170.0)],
        );
        assert_eq!(
            BulletExploder::default().explode_row(&r),
            vec![Bullet::new(50.0, "Cours – bilan"), Bullet::new(90.0, "fin")]
        );
    }

    #[test]
    fn test_custom_split_glyphs() {
        let patterns = Patterns::default().with_split_glyphs("•▪");
        let r = row(60.0, &[("Items", 60.0), ("•one", 110.0), ("▪two", 160.0)]);

        assert_eq!(
            BulletExploder::new(patterns).explode_row(&r),
            vec![
                Bullet::new(60.0, "Items"),
                Bullet::new(110.0, "one"),
                Bullet::new(110.0, "two"),
            ]
        );
    }

    #[test]
    fn test_empty_fragments_skipped() {
        let r = row(50.0, &[("•", 50.0), ("•", 60.0), ("only", 70.0), ("•", 120.0)]);
        let bullets = BulletExploder::default().explode_row(&r);
        assert_eq!(bullets, vec![Bullet::new(50.0, "only")]);
    }

    #[test]
    fn test_row_of_only_glyphs_yields_nothing() {
        let r = row(50.0, &[("•", 50.0)]);
        assert!(BulletExploder::default().explode_row(&r).is_empty());
    }

    #[test]
    fn test_missing_glyph_word_falls_back_to_row_x() {
        let r = Row {
            x0: 42.0,
            text: "a • b".to_string(),
            words: vec![],
        };
        let bullets = BulletExploder::default().explode_row(&r);
        assert_eq!(bullets, vec![Bullet::new(42.0, "a"), Bullet::new(42.0, "b")]);
    }
}
