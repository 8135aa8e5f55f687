//! # Reference Parser
//!
//! Parses typed references such as `Gen 1:1-3`, `john 3:16`, `43 3:16`,
//! `1 john 2` or just `ps`.
//!
//! Two grammars are tried in order:
//!
//! 1. `<book> <chapter>:<verse>[-<verse>]`, chapter and verse required.
//! 2. `<book> [<chapter>[:<verse>[-<verse>]]]`, where a missing chapter means 1
//!    and a missing verse means "no highlight" (verse 0).
//!
//! Book tokens resolve by exact name, then the abbreviation table, then name
//! prefix. Numeric tokens are taken as book ids.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::bible::Book;

static STRUCTURED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9\s]+)\s+(\d+):(\d+)(?:-(\d+))?$").expect("reference pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub book_id: u32,
    pub chapter: u32,
    /// 0 when the reference names no verse.
    pub verse_start: u32,
    pub verse_end: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    EmptyReference,
    BookNotFound(String),
    InvalidChapter(String),
    InvalidVerse(String),
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceError::EmptyReference => write!(f, "empty reference"),
            ReferenceError::BookNotFound(book) => write!(f, "book not found: {book}"),
            ReferenceError::InvalidChapter(ch) => write!(f, "invalid chapter: {ch}"),
            ReferenceError::InvalidVerse(v) => write!(f, "invalid verse: {v}"),
        }
    }
}

impl std::error::Error for ReferenceError {}

pub fn parse_reference(input: &str, books: &[Book]) -> Result<Reference, ReferenceError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ReferenceError::EmptyReference);
    }

    if let Some(caps) = STRUCTURED_RE.captures(input) {
        let book_id = resolve_book(&caps[1], books)?;
        let chapter = parse_chapter(&caps[2])?;
        let start = parse_verse(&caps[3])?;
        let end = match caps.get(4) {
            Some(m) => parse_verse(m.as_str())?,
            None => start,
        };
        return finish(book_id, chapter, start, end, books);
    }

    // Fallback: the trailing token is the location when it starts with a digit.
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let (book_tokens, location) = match tokens.split_last() {
        Some((last, rest))
            if !rest.is_empty() && last.starts_with(|c: char| c.is_ascii_digit()) =>
        {
            (rest, Some(*last))
        }
        _ => (&tokens[..], None),
    };
    let book_id = resolve_book(&book_tokens.join(" "), books)?;

    let Some(location) = location else {
        return finish(book_id, 1, 0, 0, books);
    };
    let (chapter_part, verse_part) = match location.split_once(':') {
        Some((c, v)) => (c, Some(v)),
        None => (location, None),
    };
    let chapter = parse_chapter(chapter_part)?;
    let (start, end) = match verse_part {
        None => (0, 0),
        Some(verses) => match verses.split_once('-') {
            Some((a, b)) => (parse_verse(a)?, parse_verse(b)?),
            None => {
                let v = parse_verse(verses)?;
                (v, v)
            }
        },
    };
    finish(book_id, chapter, start, end, books)
}

fn parse_chapter(token: &str) -> Result<u32, ReferenceError> {
    match token.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ReferenceError::InvalidChapter(token.to_string())),
    }
}

fn parse_verse(token: &str) -> Result<u32, ReferenceError> {
    match token.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ReferenceError::InvalidVerse(token.to_string())),
    }
}

fn finish(
    book_id: u32,
    chapter: u32,
    start: u32,
    end: u32,
    books: &[Book],
) -> Result<Reference, ReferenceError> {
    if let Some(book) = books.iter().find(|b| b.id == book_id)
        && chapter > book.chapter_count
    {
        return Err(ReferenceError::InvalidChapter(chapter.to_string()));
    }
    Ok(Reference {
        book_id,
        chapter,
        verse_start: start.min(end),
        verse_end: start.max(end),
    })
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Resolves a book token to a book id.
pub fn resolve_book(token: &str, books: &[Book]) -> Result<u32, ReferenceError> {
    let query = normalize(token);
    let not_found = || ReferenceError::BookNotFound(token.trim().to_string());
    if query.is_empty() {
        return Err(not_found());
    }

    if let Ok(id) = query.parse::<u32>() {
        return if id > 0 && (books.is_empty() || books.iter().any(|b| b.id == id)) {
            Ok(id)
        } else {
            Err(not_found())
        };
    }

    let exact = books.iter().find(|b| normalize(&b.name) == query);
    let abbreviated = || {
        books
            .iter()
            .find(|b| abbreviations(&normalize(&b.name)).iter().any(|a| *a == query))
    };
    let prefixed = || books.iter().find(|b| normalize(&b.name).starts_with(&query));

    exact
        .or_else(abbreviated)
        .or_else(prefixed)
        .map(|b| b.id)
        .ok_or_else(not_found)
}

fn abbreviations(canonical: &str) -> &'static [&'static str] {
    ABBREVIATIONS
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, abbrevs)| *abbrevs)
        .unwrap_or(&[])
}

/// Common abbreviations keyed by lowercase canonical book name.
const ABBREVIATIONS: &[(&str, &[&str])] = &[
    ("genesis", &["gen", "ge", "gn"]),
    ("exodus", &["exo", "ex", "exod"]),
    ("leviticus", &["lev", "le", "lv"]),
    ("numbers", &["num", "nu", "nm", "nb"]),
    ("deuteronomy", &["deut", "de", "dt"]),
    ("joshua", &["josh", "jos", "jsh"]),
    ("judges", &["judg", "jdg", "jg", "jdgs"]),
    ("ruth", &["rut", "ru", "rth"]),
    ("1 samuel", &["1sam", "1sa", "1samuel", "1 sam", "1 sa", "1s"]),
    ("2 samuel", &["2sam", "2sa", "2samuel", "2 sam", "2 sa", "2s"]),
    ("1 kings", &["1king", "1kgs", "1ki", "1k", "1 kgs"]),
    ("2 kings", &["2king", "2kgs", "2ki", "2k", "2 kgs"]),
    ("1 chronicles", &["1chron", "1chr", "1ch", "1 chr"]),
    ("2 chronicles", &["2chron", "2chr", "2ch", "2 chr"]),
    ("ezra", &["ezr", "ez"]),
    ("nehemiah", &["neh", "ne"]),
    ("esther", &["est", "es"]),
    ("job", &["jb"]),
    ("psalms", &["psalm", "psa", "ps", "pss"]),
    ("proverbs", &["prov", "pro", "pr", "prv"]),
    ("ecclesiastes", &["eccl", "ecc", "ec", "qoh"]),
    ("song of solomon", &["song", "sos", "so", "canticle", "canticles", "song of songs"]),
    ("isaiah", &["isa", "is"]),
    ("jeremiah", &["jer", "je", "jr"]),
    ("lamentations", &["lam", "la"]),
    ("ezekiel", &["ezek", "eze", "ezk"]),
    ("daniel", &["dan", "da", "dn"]),
    ("hosea", &["hos", "ho"]),
    ("joel", &["joe", "jl"]),
    ("amos", &["amo", "am"]),
    ("obadiah", &["obad", "ob"]),
    ("jonah", &["jon", "jnh"]),
    ("micah", &["mic", "mi"]),
    ("nahum", &["nah", "na"]),
    ("habakkuk", &["hab", "hb"]),
    ("zephaniah", &["zeph", "zep", "zp"]),
    ("haggai", &["hag", "hg"]),
    ("zechariah", &["zech", "zec", "zc"]),
    ("malachi", &["mal", "ml"]),
    ("matthew", &["matt", "mat", "mt"]),
    ("mark", &["mar", "mrk", "mk", "mr"]),
    ("luke", &["luk", "lk"]),
    ("john", &["joh", "jhn", "jn"]),
    ("acts", &["act", "ac"]),
    ("romans", &["rom", "ro", "rm"]),
    ("1 corinthians", &["1cor", "1co", "1 cor"]),
    ("2 corinthians", &["2cor", "2co", "2 cor"]),
    ("galatians", &["gal", "ga"]),
    ("ephesians", &["eph", "ephes"]),
    ("philippians", &["phil", "php", "pp"]),
    ("colossians", &["col", "co"]),
    ("1 thessalonians", &["1thess", "1th", "1 thess"]),
    ("2 thessalonians", &["2thess", "2th", "2 thess"]),
    ("1 timothy", &["1tim", "1ti", "1 tim"]),
    ("2 timothy", &["2tim", "2ti", "2 tim"]),
    ("titus", &["tit", "ti"]),
    ("philemon", &["philem", "phm", "pm"]),
    ("hebrews", &["heb", "he"]),
    ("james", &["jam", "jas", "jm"]),
    ("1 peter", &["1pet", "1pe", "1pt", "1p", "1 pet"]),
    ("2 peter", &["2pet", "2pe", "2pt", "2p", "2 pet"]),
    ("1 john", &["1john", "1jn", "1jo", "1j"]),
    ("2 john", &["2john", "2jn", "2jo", "2j"]),
    ("3 john", &["3john", "3jn", "3jo", "3j"]),
    ("jude", &["jud", "jd"]),
    ("revelation", &["rev", "re", "rv"]),
];
