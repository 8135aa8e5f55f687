//! # Highlight/Scroll Synchronizer
//!
//! Maps between verse numbers and line offsets in the rendered chapter.
//! Both directions walk the same per-verse block heights that
//! [`crate::core::layout::render_chapter`] produces, so a map is only valid
//! for the verse list and width it was built from. Rebuild after either changes.

use crate::bible::Verse;
use crate::core::layout::{block_height, text_width};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    verse: u32,
    start: usize,
    height: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerseMap {
    blocks: Vec<Block>,
    total: usize,
}

impl VerseMap {
    pub fn build(verses: &[Verse], viewport_width: u16) -> Self {
        let width = text_width(viewport_width);
        Self::from_heights(
            verses
                .iter()
                .map(|v| (v.number, block_height(&v.text, width))),
        )
    }

    /// Builds a map from `(verse, block height)` pairs in display order.
    pub fn from_heights(heights: impl IntoIterator<Item = (u32, usize)>) -> Self {
        let mut blocks = Vec::new();
        let mut total = 0;
        for (verse, height) in heights {
            blocks.push(Block {
                verse,
                start: total,
                height,
            });
            total += height;
        }
        Self { blocks, total }
    }

    pub fn total_lines(&self) -> usize {
        self.total
    }

    pub fn max_offset(&self, viewport_height: usize) -> usize {
        self.total.saturating_sub(viewport_height)
    }

    /// The verse whose block contains line `offset`; the last verse when
    /// `offset` is past the end. `None` only for an empty chapter.
    pub fn verse_at_offset(&self, offset: usize) -> Option<u32> {
        self.blocks
            .iter()
            .find(|b| b.start + b.height > offset)
            .or(self.blocks.last())
            .map(|b| b.verse)
    }

    /// First line of `verse`'s block, clamped to `[0, total - viewport_height]`.
    /// Unknown verses resolve to the first block at or after them.
    pub fn offset_for_verse(&self, verse: u32, viewport_height: usize) -> usize {
        let start = self
            .blocks
            .iter()
            .find(|b| b.verse >= verse)
            .map(|b| b.start)
            .unwrap_or(self.total);
        start.min(self.max_offset(viewport_height))
    }
}
