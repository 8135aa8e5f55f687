//! # Verse Text
//!
//! Turns raw verse text from the service into display text:
//!
//! ```text
//! "Hello<br/>world &amp; friends"  ──strip_markup──▶  "Hello world & friends"
//! "Hello world & friends"          ──wrap_with_indent(w=12, indent=2)──▶
//!     "Hello world\n  & friends"
//! ```
//!
//! Both functions are pure and never fail; anything they can't interpret is
//! passed through verbatim.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("entity pattern is valid")
});

static SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("nbsp", " "),
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("ldquo", "\u{201C}"),
    ("rdquo", "\u{201D}"),
    ("lsquo", "\u{2018}"),
    ("rsquo", "\u{2019}"),
    ("mdash", "\u{2014}"),
    ("ndash", "\u{2013}"),
    ("hellip", "\u{2026}"),
];

/// Removes markup tags, decodes entities and collapses whitespace.
///
/// Tags become a single space so words on either side of `<br/>` stay apart.
pub fn strip_markup(raw: &str) -> String {
    let untagged = TAG_RE.replace_all(raw, " ");
    let decoded = ENTITY_RE.replace_all(&untagged, |caps: &Captures| {
        decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });
    SPACE_RE.replace_all(&decoded, " ").trim().to_string()
}

fn decode_entity(body: &str) -> Option<String> {
    if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        // char::from_u32 also rejects >= 0x110000 and surrogates
        return char::from_u32(code).map(String::from);
    }
    NAMED_ENTITIES
        .iter()
        .find(|(name, _)| *name == body)
        .map(|(_, value)| value.to_string())
}

/// Greedy word wrap with a hanging indent.
///
/// Every line after the first starts with `indent` spaces, and the indent counts
/// toward `width`. A word wider than `width` gets a line of its own instead of
/// being split, and hyphenated words stay whole. `width == 0` returns the
/// text unchanged.
pub fn wrap_with_indent(text: &str, width: usize, indent: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return String::new();
    }
    let normalized = words.join(" ");
    let hanging = " ".repeat(indent);
    let options = textwrap::Options::new(width)
        .subsequent_indent(&hanging)
        .break_words(false)
        .word_splitter(textwrap::WordSplitter::NoHyphenation)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit);
    textwrap::wrap(&normalized, options).join("\n")
}
