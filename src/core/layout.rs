//! # Chapter Layout
//!
//! Pure rendering of verses into tagged display lines. The TUI only styles
//! what comes out of here, so the line counts below are exactly what lands on
//! screen and what [`crate::core::scroll::VerseMap`] measures.
//!
//! ```text
//!    16                                   ← verse-number line
//!       For God so loved the world, that  ← body, 6-column gutter
//!         he gave his only Son...         ← hanging indent of 2
//!                                         ← separator
//! ```

use crate::bible::{ParallelChapter, Verse};
use crate::core::state::Highlight;
use crate::core::text::{strip_markup, wrap_with_indent};

pub const GUTTER: usize = 6;
pub const HANGING_INDENT: usize = 2;
const RIGHT_MARGIN: usize = 2;
const MIN_TEXT_WIDTH: usize = 20;
const MAX_RULE_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    VerseNumber { verse: u32, highlighted: bool },
    Body { verse: u32, highlighted: bool },
    Separator,
    /// Comparison view: "Verse N".
    Heading,
    Rule,
    /// Comparison view: first line of a translation, starting with `[TR]`.
    Labeled { label_len: usize },
    Continuation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub kind: LineKind,
    pub text: String,
}

impl RenderedLine {
    fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Wrap width for verse bodies in a viewport `viewport_width` columns wide.
/// Zero (no wrapping) when the viewport is narrower than the gutter.
pub fn text_width(viewport_width: u16) -> usize {
    let width = viewport_width as usize;
    if width <= GUTTER {
        return 0;
    }
    width
        .saturating_sub(GUTTER + RIGHT_MARGIN)
        .max(MIN_TEXT_WIDTH)
        .min(width - GUTTER)
}

/// Wrapped body of one verse, without the gutter.
pub fn body_lines(raw: &str, text_width: usize) -> Vec<String> {
    wrap_with_indent(&strip_markup(raw), text_width, HANGING_INDENT)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Lines one verse occupies: number line, body, separator.
pub fn block_height(raw: &str, text_width: usize) -> usize {
    body_lines(raw, text_width).len() + 2
}

pub fn render_chapter(verses: &[Verse], viewport_width: u16, highlight: Highlight) -> Vec<RenderedLine> {
    let width = text_width(viewport_width);
    let gutter = " ".repeat(GUTTER);
    let mut lines = Vec::new();
    for verse in verses {
        let highlighted = highlight.contains(verse.number);
        lines.push(RenderedLine::new(
            LineKind::VerseNumber {
                verse: verse.number,
                highlighted,
            },
            format!("{:>4}", verse.number),
        ));
        for body in body_lines(&verse.text, width) {
            lines.push(RenderedLine::new(
                LineKind::Body {
                    verse: verse.number,
                    highlighted,
                },
                format!("{gutter}{body}"),
            ));
        }
        lines.push(RenderedLine::new(LineKind::Separator, ""));
    }
    lines
}

/// Side-by-side translations, one "Verse N" section per verse number.
pub fn render_parallel(chapter: &ParallelChapter, viewport_width: u16) -> Vec<RenderedLine> {
    let width = (viewport_width as usize).min(MAX_RULE_WIDTH);
    let wrap_width = width.saturating_sub(2);
    let mut lines = Vec::new();
    for number in chapter.verse_numbers() {
        lines.push(RenderedLine::new(LineKind::Heading, format!("Verse {number}")));
        lines.push(RenderedLine::new(LineKind::Rule, "─".repeat(width)));
        for (code, _) in &chapter.columns {
            let Some(verse) = chapter.verse(code, number) else {
                continue;
            };
            let label = format!("[{code}]");
            let text = format!("{label} {}", strip_markup(&verse.text));
            let wrapped = wrap_with_indent(&text, wrap_width, label.len() + 1);
            for (i, line) in wrapped.lines().enumerate() {
                let kind = if i == 0 {
                    LineKind::Labeled {
                        label_len: label.len(),
                    }
                } else {
                    LineKind::Continuation
                };
                lines.push(RenderedLine::new(kind, line));
            }
        }
        lines.push(RenderedLine::new(LineKind::Separator, ""));
    }
    lines
}
