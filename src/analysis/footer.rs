//! Footer detection.

use std::collections::BTreeSet;

use super::tagger::{SizeTag, SizeTagMap};
use crate::model::Block;

/// Block indices (within one page) flagged as footer candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FooterIndexSet {
    indices: BTreeSet<usize>,
}

impl FooterIndexSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a block index is a footer candidate.
    pub fn contains(&self, block_index: usize) -> bool {
        self.indices.contains(&block_index)
    }

    /// Number of footer blocks.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if the page has no footer blocks.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over the flagged indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    fn insert(&mut self, block_index: usize) {
        self.indices.insert(block_index);
    }
}

impl FromIterator<usize> for FooterIndexSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

/// Flags the trailing run of small-print blocks on a page.
#[derive(Debug, Clone, Copy)]
pub struct FooterDetector<'a> {
    tags: &'a SizeTagMap,
}

impl<'a> FooterDetector<'a> {
    /// Create a detector over a document's tag map.
    pub fn new(tags: &'a SizeTagMap) -> Self {
        Self { tags }
    }

    /// Scan a page's blocks from the last one backward.
    ///
    /// Each text block is judged by its first non-blank span. Blocks whose
    /// span is tagged as small print are flagged; the first block that is
    /// not (including one holding only blank spans) ends the scan.
    /// Non-text blocks and text blocks without spans are stepped over.
    pub fn detect(&self, blocks: &[Block]) -> FooterIndexSet {
        let mut footers = FooterIndexSet::new();

        for (index, block) in blocks.iter().enumerate().rev() {
            if !block.is_text() {
                continue;
            }

            let mut spans = block.spans().peekable();
            if spans.peek().is_none() {
                continue;
            }

            let lead = spans.find(|s| !s.is_blank());
            match lead.and_then(|s| self.tags.get(s.size)) {
                Some(SizeTag::Small) => footers.insert(index),
                _ => break,
            }
        }

        if !footers.is_empty() {
            log::debug!("Footer blocks: {:?}", footers.indices);
        }

        footers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FontSize, Span};

    fn size(points: f32) -> FontSize {
        FontSize::new(points).unwrap()
    }

    fn tags() -> SizeTagMap {
        // 20 → header/title, 12 → para, 3 → s
        let sizes: Vec<FontSize> = [20.0, 12.0, 3.0].iter().map(|v| size(*v)).collect();
        SizeTagMap::from_sizes(&sizes, size(12.0))
    }

    fn text(t: &str, points: f32) -> Block {
        Block::single_line(vec![Span::new(t, size(points))])
    }

    #[test]
    fn test_trailing_small_blocks() {
        let tags = tags();
        let blocks = vec![
            text("Title", 20.0),
            text("Body text", 12.0),
            text("Footnote one", 3.0),
            text("Footnote two", 3.0),
            text("Page 1", 3.0),
        ];

        let footers = FooterDetector::new(&tags).detect(&blocks);
        assert_eq!(footers.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_run_stops_at_first_non_small() {
        let tags = tags();
        let blocks = vec![
            text("tiny", 3.0),
            text("Body", 12.0),
            text("tiny", 3.0),
        ];

        let footers = FooterDetector::new(&tags).detect(&blocks);
        assert_eq!(footers.iter().collect::<Vec<_>>(), vec![2]);
        assert!(!footers.contains(0));
    }

    #[test]
    fn test_skips_non_text_and_leading_blank_spans() {
        let tags = tags();
        let blocks = vec![
            text("Body", 12.0),
            Block::single_line(vec![Span::new("  ", size(12.0)), Span::new("note", size(3.0))]),
            Block::Other,
            Block::text(Vec::new()),
            text("1", 3.0),
        ];

        let footers = FooterDetector::new(&tags).detect(&blocks);
        assert_eq!(footers.iter().collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn test_blank_block_stops_scan() {
        let tags = tags();
        let blocks = vec![text("note", 3.0), text("   ", 3.0), text("note", 3.0)];

        let footers = FooterDetector::new(&tags).detect(&blocks);
        assert_eq!(footers.iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_no_footer() {
        let tags = tags();
        let blocks = vec![text("Body", 12.0), text("Title", 20.0)];
        assert!(FooterDetector::new(&tags).detect(&blocks).is_empty());
        assert!(FooterDetector::new(&tags).detect(&[]).is_empty());
    }

    #[test]
    fn test_footer_run_is_contiguous_suffix() {
        let tags = tags();
        let blocks = vec![
            text("note", 3.0),
            text("Body", 12.0),
            text("note", 3.0),
            text("Title", 20.0),
            text("note", 3.0),
            text("note", 3.0),
        ];

        let footers = FooterDetector::new(&tags).detect(&blocks);
        let indices: Vec<usize> = footers.iter().collect();
        assert_eq!(indices, vec![4, 5]);
        assert_eq!(*indices.last().unwrap(), blocks.len() - 1);
        assert!(indices.windows(2).all(|w| w[1] == w[0] + 1));
    }
}
