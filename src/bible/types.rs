use serde::{Deserialize, Serialize};

/// Last book id of the first division (Genesis..Malachi).
pub const LAST_OLD_TESTAMENT_BOOK: u32 = 39;

/// A translation offered by the remote service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Translation {
    pub short_name: String,
    pub full_name: String,
    /// Last update as milliseconds since the epoch, when the service reports it.
    #[serde(default)]
    pub updated: Option<i64>,
    #[serde(default)]
    pub dir: Option<String>,
}

/// One language group in the translation catalogue.
#[derive(Deserialize, Debug)]
pub struct LanguageGroup {
    pub language: String,
    #[serde(default)]
    pub translations: Vec<Translation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Division {
    Old,
    New,
}

impl Division {
    pub fn label(self) -> &'static str {
        match self {
            Division::Old => "OLD TESTAMENT",
            Division::New => "NEW TESTAMENT",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Book {
    #[serde(rename = "bookid")]
    pub id: u32,
    #[serde(default)]
    pub chronorder: u32,
    pub name: String,
    #[serde(rename = "chapters")]
    pub chapter_count: u32,
}

impl Book {
    pub fn division(&self) -> Division {
        if self.id <= LAST_OLD_TESTAMENT_BOOK {
            Division::Old
        } else {
            Division::New
        }
    }
}

/// A single verse. `text` is raw and may carry markup and HTML entities.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Verse {
    #[serde(default)]
    pub pk: u64,
    #[serde(rename = "verse", default)]
    pub number: u32,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(rename = "book", default)]
    pub book_id: u32,
    #[serde(default)]
    pub chapter: u32,
}

/// Body of the parallel-verses request.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ParallelQuery {
    pub translations: Vec<String>,
    pub verses: Vec<u32>,
    pub chapter: u32,
    pub book: u32,
}

/// Verses of one chapter in several translations, in request order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParallelChapter {
    pub columns: Vec<(String, Vec<Verse>)>,
}

impl ParallelChapter {
    /// Every verse number present in at least one translation, ascending.
    pub fn verse_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self
            .columns
            .iter()
            .flat_map(|(_, verses)| verses.iter().map(|v| v.number))
            .collect();
        numbers.sort_unstable();
        numbers.dedup();
        numbers
    }

    pub fn verse(&self, translation: &str, number: u32) -> Option<&Verse> {
        self.columns
            .iter()
            .find(|(code, _)| code == translation)
            .and_then(|(_, verses)| verses.iter().find(|v| v.number == number))
    }
}
