//! # Miller-Column Selector
//!
//! Three cascading columns: books → chapters of the selected book → verses of
//! the selected chapter. One column is active at a time.
//!
//! ```text
//! ┌ Books ──────┐┌ Chapters ┐┌ Verses ─────────────┐
//! │ Genesis     ││ 1        ││ 1  In the beginning │
//! │▶Exodus      ││▶2        ││ 2  ...              │
//! └─────────────┘└──────────┘└─────────────────────┘
//! ```
//!
//! Filter mode feeds keystrokes into `filter` instead of moving. The filter
//! targets whichever column was active when filter mode was entered, and its
//! derived list is recomputed on every edit. Indices always point into the
//! *visible* (possibly filtered) list of their column.

use crate::bible::{Book, Verse};
use crate::core::text::strip_markup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Column {
    #[default]
    Books,
    Chapters,
    Verses,
}

impl Column {
    pub fn index(self) -> usize {
        match self {
            Column::Books => 0,
            Column::Chapters => 1,
            Column::Verses => 2,
        }
    }

    fn left(self) -> Option<Column> {
        match self {
            Column::Books => None,
            Column::Chapters => Some(Column::Books),
            Column::Verses => Some(Column::Chapters),
        }
    }

    fn right(self) -> Option<Column> {
        match self {
            Column::Books => Some(Column::Chapters),
            Column::Chapters => Some(Column::Verses),
            Column::Verses => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MillerState {
    pub column: Column,
    pub book_index: usize,
    pub chapter_index: usize,
    pub verse_index: usize,
    pub filter: String,
    pub filter_column: Column,
    pub filtering: bool,
    /// Indices into the book list matching `filter`, when books are filtered.
    pub filtered_books: Option<Vec<usize>>,
    /// Indices into the verse list matching `filter`, when verses are filtered.
    pub filtered_verses: Option<Vec<usize>>,
}

impl MillerState {
    /// Opens on `book_id`/`chapter` with column 0 active and no filter.
    pub fn open(books: &[Book], book_id: u32, chapter: u32) -> Self {
        let book_index = books.iter().position(|b| b.id == book_id).unwrap_or(0);
        let chapter_count = books.get(book_index).map_or(1, |b| b.chapter_count.max(1));
        Self {
            book_index,
            chapter_index: (chapter.clamp(1, chapter_count) - 1) as usize,
            ..Self::default()
        }
    }

    // -- visible lists ---------------------------------------------------------

    pub fn visible_books<'a>(&self, books: &'a [Book]) -> Vec<&'a Book> {
        match &self.filtered_books {
            Some(indices) => indices.iter().filter_map(|&i| books.get(i)).collect(),
            None => books.iter().collect(),
        }
    }

    pub fn selected_book<'a>(&self, books: &'a [Book]) -> Option<&'a Book> {
        self.visible_books(books).get(self.book_index).copied()
    }

    /// Chapter numbers of the selected book, narrowed by the filter when it
    /// targets this column.
    pub fn visible_chapters(&self, books: &[Book]) -> Vec<u32> {
        let Some(book) = self.selected_book(books) else {
            return Vec::new();
        };
        let all = 1..=book.chapter_count;
        if self.filter_column == Column::Chapters && !self.filter.is_empty() {
            all.filter(|n| n.to_string().contains(self.filter.as_str())).collect()
        } else {
            all.collect()
        }
    }

    pub fn selected_chapter(&self, books: &[Book]) -> Option<u32> {
        self.visible_chapters(books).get(self.chapter_index).copied()
    }

    pub fn visible_verses<'a>(&self, verses: &'a [Verse]) -> Vec<&'a Verse> {
        match &self.filtered_verses {
            Some(indices) => indices.iter().filter_map(|&i| verses.get(i)).collect(),
            None => verses.iter().collect(),
        }
    }

    pub fn selected_verse(&self, verses: &[Verse]) -> Option<u32> {
        self.visible_verses(verses)
            .get(self.verse_index)
            .map(|v| v.number)
    }

    // -- navigation ------------------------------------------------------------

    pub fn move_left(&mut self) {
        if let Some(column) = self.column.left() {
            self.column = column;
        }
    }

    /// Moves right. Returns the `(book, chapter)` whose verses the verse column
    /// needs when it just became active.
    pub fn move_right(&mut self, books: &[Book]) -> Option<(u32, u32)> {
        let column = self.column.right()?;
        self.column = column;
        if column != Column::Verses {
            return None;
        }
        let book = self.selected_book(books)?;
        let chapter = self.selected_chapter(books)?;
        Some((book.id, chapter))
    }

    pub fn move_up(&mut self) {
        match self.column {
            Column::Books => {
                if self.book_index > 0 {
                    self.book_index -= 1;
                    self.chapter_index = 0;
                    self.verse_index = 0;
                }
            }
            Column::Chapters => {
                if self.chapter_index > 0 {
                    self.chapter_index -= 1;
                    self.verse_index = 0;
                }
            }
            Column::Verses => self.verse_index = self.verse_index.saturating_sub(1),
        }
    }

    /// `verses` is the verse list of the selected chapter, empty while it isn't loaded.
    pub fn move_down(&mut self, books: &[Book], verses: &[Verse]) {
        match self.column {
            Column::Books => {
                if self.book_index + 1 < self.visible_books(books).len() {
                    self.book_index += 1;
                    self.chapter_index = 0;
                    self.verse_index = 0;
                }
            }
            Column::Chapters => {
                if self.chapter_index + 1 < self.visible_chapters(books).len() {
                    self.chapter_index += 1;
                    self.verse_index = 0;
                }
            }
            Column::Verses => {
                if self.verse_index + 1 < self.visible_verses(verses).len() {
                    self.verse_index += 1;
                }
            }
        }
    }

    // -- filtering -------------------------------------------------------------

    /// Enters filter mode on the active column, or leaves it.
    ///
    /// Entering on a different column than the last filter drops that filter.
    pub fn toggle_filter(&mut self, books: &[Book], verses: &[Verse]) {
        if self.filtering {
            self.filtering = false;
            return;
        }
        if self.filter_column != self.column && !self.filter.is_empty() {
            self.drop_filter(books, verses);
        }
        self.filter_column = self.column;
        self.filtering = true;
    }

    /// Clears the filter while keeping the current selections selected.
    fn drop_filter(&mut self, books: &[Book], verses: &[Verse]) {
        let book_id = self.selected_book(books).map(|b| b.id);
        let chapter = self.selected_chapter(books);
        let verse = self.selected_verse(verses);
        self.filter.clear();
        self.filtered_books = None;
        self.filtered_verses = None;
        if let Some(id) = book_id {
            self.book_index = books.iter().position(|b| b.id == id).unwrap_or(0);
        }
        if let Some(chapter) = chapter {
            self.chapter_index = chapter.saturating_sub(1) as usize;
        }
        if let Some(number) = verse {
            self.verse_index = verses.iter().position(|v| v.number == number).unwrap_or(0);
        }
    }

    pub fn push_char(&mut self, c: char, books: &[Book], verses: &[Verse]) {
        self.filter.push(c);
        self.recompute(books, verses);
    }

    pub fn pop_char(&mut self, books: &[Book], verses: &[Verse]) {
        if self.filter.pop().is_some() {
            self.recompute(books, verses);
        }
    }

    /// Re-derives the filtered list for the filter's column and resets that
    /// column's index.
    pub fn recompute(&mut self, books: &[Book], verses: &[Verse]) {
        let needle = self.filter.to_lowercase();
        let active = !needle.is_empty();
        match self.filter_column {
            Column::Books => {
                self.filtered_books = active.then(|| {
                    books
                        .iter()
                        .enumerate()
                        .filter(|(_, b)| b.name.to_lowercase().contains(&needle))
                        .map(|(i, _)| i)
                        .collect()
                });
                self.book_index = 0;
                self.chapter_index = 0;
                self.verse_index = 0;
            }
            Column::Chapters => {
                self.chapter_index = 0;
                self.verse_index = 0;
            }
            Column::Verses => {
                self.filtered_verses = active.then(|| {
                    verses
                        .iter()
                        .enumerate()
                        .filter(|(_, v)| {
                            v.number.to_string().contains(self.filter.as_str())
                                || strip_markup(&v.text).to_lowercase().contains(&needle)
                        })
                        .map(|(i, _)| i)
                        .collect()
                });
                self.verse_index = 0;
            }
        }
    }

    /// Called when the chapter behind the verse column changes.
    pub fn on_verses_replaced(&mut self, verses: &[Verse]) {
        self.verse_index = 0;
        if self.filter_column == Column::Verses {
            let books: &[Book] = &[];
            self.recompute(books, verses);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_books, sample_verses};

    fn filter(state: &mut MillerState, text: &str, books: &[Book], verses: &[Verse]) {
        state.toggle_filter(books, verses);
        for c in text.chars() {
            state.push_char(c, books, verses);
        }
    }

    #[test]
    fn test_open_seeds_position() {
        let books = sample_books();
        let state = MillerState::open(&books, 43, 3);
        assert_eq!(state.column, Column::Books);
        assert_eq!(state.selected_book(&books).map(|b| b.id), Some(43));
        assert_eq!(state.selected_chapter(&books), Some(3));
        assert!(state.filter.is_empty() && !state.filtering);
    }

    #[test]
    fn test_open_with_unknown_book_or_no_books() {
        let state = MillerState::open(&[], 43, 3);
        assert_eq!((state.book_index, state.chapter_index), (0, 0));
        let books = sample_books();
        let state = MillerState::open(&books, 43, 99);
        assert_eq!(state.selected_chapter(&books), Some(21));
    }

    #[test]
    fn test_column_bounds() {
        let books = sample_books();
        let mut state = MillerState::open(&books, 1, 1);
        state.move_left();
        assert_eq!(state.column, Column::Books);
        state.move_right(&books);
        assert_eq!(state.move_right(&books), Some((1, 1)));
        assert_eq!(state.column, Column::Verses);
        assert_eq!(state.move_right(&books), None);
        assert_eq!(state.column, Column::Verses);
    }

    #[test]
    fn test_new_book_resets_chapter_and_verse() {
        let books = sample_books();
        let verses = sample_verses(1, 5, 10);
        let mut state = MillerState::open(&books, 1, 5);
        state.column = Column::Verses;
        state.move_down(&books, &verses);
        state.move_down(&books, &verses);
        assert_eq!(state.verse_index, 2);

        state.column = Column::Books;
        state.move_down(&books, &verses);
        assert_eq!((state.chapter_index, state.verse_index), (0, 0));
        state.chapter_index = 4;
        state.verse_index = 3;
        state.move_up();
        assert_eq!((state.chapter_index, state.verse_index), (0, 0));
    }

    #[test]
    fn test_new_chapter_resets_verse() {
        let books = sample_books();
        let mut state = MillerState::open(&books, 1, 1);
        state.column = Column::Chapters;
        state.verse_index = 7;
        state.move_down(&books, &[]);
        assert_eq!(state.chapter_index, 1);
        assert_eq!(state.verse_index, 0);
    }

    #[test]
    fn test_chapter_bounds() {
        let books = sample_books();
        let mut state = MillerState::open(&books, 65, 1); // Jude, 1 chapter
        state.column = Column::Chapters;
        state.move_down(&books, &[]);
        assert_eq!(state.chapter_index, 0);
        state.move_up();
        assert_eq!(state.chapter_index, 0);
    }

    #[test]
    fn test_verse_column_bounded_by_loaded_verses() {
        let books = sample_books();
        let mut state = MillerState::open(&books, 1, 1);
        state.column = Column::Verses;
        state.move_down(&books, &[]);
        assert_eq!(state.verse_index, 0);
        let verses = sample_verses(1, 1, 2);
        state.move_down(&books, &verses);
        state.move_down(&books, &verses);
        assert_eq!(state.verse_index, 1);
    }

    #[test]
    fn test_book_filter_substring() {
        let books = sample_books();
        let mut state = MillerState::open(&books, 43, 3);
        filter(&mut state, "JOHN", &books, &[]);
        let names: Vec<&str> = state.visible_books(&books).iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["John", "1 John"]);
        assert_eq!((state.book_index, state.chapter_index), (0, 0));
    }

    #[test]
    fn test_filter_matching_nothing_is_empty_not_none() {
        let books = sample_books();
        let mut state = MillerState::open(&books, 1, 1);
        filter(&mut state, "zzz", &books, &[]);
        assert_eq!(state.filtered_books, Some(vec![]));
        assert!(state.visible_books(&books).is_empty());
        assert!(state.selected_book(&books).is_none());
        assert!(state.visible_chapters(&books).is_empty());
        state.move_down(&books, &[]);
        state.move_up();
        assert_eq!(state.book_index, 0);
    }

    #[test]
    fn test_backspace_to_empty_clears_filter() {
        let books = sample_books();
        let mut state = MillerState::open(&books, 1, 1);
        filter(&mut state, "ex", &books, &[]);
        assert_eq!(state.visible_books(&books).len(), 1);
        state.pop_char(&books, &[]);
        state.pop_char(&books, &[]);
        assert!(state.filtered_books.is_none());
        assert_eq!(state.visible_books(&books).len(), books.len());
    }

    #[test]
    fn test_verse_filter_by_text_or_number() {
        let books = sample_books();
        let mut verses = sample_verses(1, 1, 12);
        verses[4].text = "And God called the <b>light</b> Day".to_string();
        let mut state = MillerState::open(&books, 1, 1);
        state.column = Column::Verses;

        filter(&mut state, "LIGHT", &books, &verses);
        assert_eq!(state.filtered_verses, Some(vec![4]));
        assert_eq!(state.selected_verse(&verses), Some(5));

        state.filter.clear();
        state.push_char('1', &books, &verses);
        let numbers: Vec<u32> = state.visible_verses(&verses).iter().map(|v| v.number).collect();
        // The sample text mentions "chapter 1"; only the rewritten verse 5 drops out.
        assert_eq!(numbers.len(), 11);
        assert!(!numbers.contains(&5));
    }

    #[test]
    fn test_filter_only_targets_entry_column() {
        let books = sample_books();
        let verses = sample_verses(1, 1, 3);
        let mut state = MillerState::open(&books, 1, 1);
        filter(&mut state, "gen", &books, &verses);
        state.toggle_filter(&books, &verses);
        assert!(!state.filtering);

        // Moving on keeps the book filter; verses stay unfiltered.
        state.move_right(&books);
        state.move_right(&books);
        assert!(state.filtered_books.is_some());
        assert_eq!(state.visible_verses(&verses).len(), 3);

        // Filtering the verse column replaces the book filter, keeping the book.
        filter(&mut state, "2", &books, &verses);
        assert_eq!(state.filter_column, Column::Verses);
        assert!(state.filtered_books.is_none());
        assert_eq!(state.selected_book(&books).map(|b| b.id), Some(1));
        assert_eq!(state.filtered_verses, Some(vec![1]));
    }

    #[test]
    fn test_chapter_filter() {
        let books = sample_books();
        let mut state = MillerState::open(&books, 1, 1);
        state.column = Column::Chapters;
        filter(&mut state, "5", &books, &[]);
        assert_eq!(state.visible_chapters(&books), vec![5, 15, 25, 35, 45, 50]);
        assert_eq!(state.selected_chapter(&books), Some(5));
    }

    #[test]
    fn test_verses_replaced_resets_index() {
        let books = sample_books();
        let mut state = MillerState::open(&books, 1, 1);
        state.column = Column::Verses;
        state.verse_index = 4;
        state.on_verses_replaced(&sample_verses(1, 2, 3));
        assert_eq!(state.verse_index, 0);
    }
}
