//! # Application State
//!
//! Core business state for Lectern. This module contains domain logic only,
//! no TUI-specific types.
//!
//! ```text
//! App
//! ├── screen: Screen                 // which view is up, plus its local state
//! ├── translation: String            // active translation code
//! ├── theme: ThemeId
//! ├── translations / books           // catalogues, replaced wholesale
//! ├── reading: Reading               // loaded chapter (book, chapter, verses)
//! ├── highlight: Highlight           // emphasised verse range
//! ├── viewport: Viewport             // reader size and scroll offset
//! ├── pending: Option<ChapterRequest>          // the only chapter fetch that counts
//! ├── comparison / pending_parallel            // comparison view data
//! ├── cached / cache_size / downloading        // offline cache status
//! └── error / status_message
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::bible::{Book, ParallelChapter, Translation, Verse};
use crate::core::action::{ChapterRequest, ParallelRequest};
use crate::core::config::ResolvedConfig;
use crate::core::layout::{render_parallel, RenderedLine};
use crate::core::miller::MillerState;
use crate::core::scroll::VerseMap;
use crate::core::settings::Settings;
use crate::core::theme::ThemeId;

pub const DEFAULT_TRANSLATION: &str = "NLT";

/// Top-level modes. Overlays only exist on top of the reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Reader(Overlay),
    Search { input: String },
    Comparison { offset: usize },
    TranslationSelect { selected: usize },
    ThemeSelect { selected: usize },
    CacheManager { selected: usize },
    About,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    None,
    Sidebar { selected: usize },
    Miller(MillerState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Reader,
    Search,
    Comparison,
    TranslationSelect,
    ThemeSelect,
    CacheManager,
    About,
}

impl Screen {
    pub fn mode(&self) -> ViewMode {
        match self {
            Screen::Reader(_) => ViewMode::Reader,
            Screen::Search { .. } => ViewMode::Search,
            Screen::Comparison { .. } => ViewMode::Comparison,
            Screen::TranslationSelect { .. } => ViewMode::TranslationSelect,
            Screen::ThemeSelect { .. } => ViewMode::ThemeSelect,
            Screen::CacheManager { .. } => ViewMode::CacheManager,
            Screen::About => ViewMode::About,
        }
    }

    pub fn reader() -> Self {
        Screen::Reader(Overlay::None)
    }
}

/// Inclusive verse range; `start == 0` means nothing is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Highlight {
    pub start: u32,
    pub end: u32,
}

impl Highlight {
    pub const NONE: Highlight = Highlight { start: 0, end: 0 };

    pub fn verse(verse: u32) -> Self {
        Self {
            start: verse,
            end: verse,
        }
    }

    pub fn range(a: u32, b: u32) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn is_active(self) -> bool {
        self.start > 0
    }

    pub fn contains(self, verse: u32) -> bool {
        self.is_active() && self.start <= verse && verse <= self.end
    }
}

/// The chapter on screen. Replaced as a whole when a fetch lands.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub book_id: u32,
    pub book_name: String,
    pub chapter: u32,
    pub verses: Vec<Verse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    pub offset: usize,
}

/// A loaded comparison: one chapter in several translations.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub book_id: u32,
    pub chapter: u32,
    pub data: ParallelChapter,
}

pub struct App {
    pub screen: Screen,
    pub translation: String,
    pub theme: ThemeId,
    pub comparison_translations: Vec<String>,
    pub translations: Vec<Translation>,
    pub books: Vec<Book>,
    pub reading: Reading,
    pub highlight: Highlight,
    pub viewport: Viewport,
    pub pending: Option<ChapterRequest>,
    pub comparison: Option<Comparison>,
    pub pending_parallel: Option<ParallelRequest>,
    /// Translation codes present in the offline cache.
    pub cached: Vec<String>,
    pub cache_size: u64,
    pub downloading: Option<String>,
    pub error: Option<String>,
    pub status_message: String,
    next_token: u64,
}

impl App {
    pub fn new(translation: String, theme: ThemeId, comparison_translations: Vec<String>) -> Self {
        Self {
            screen: Screen::reader(),
            translation,
            theme,
            comparison_translations,
            translations: Vec::new(),
            books: Vec::new(),
            reading: Reading {
                book_id: 1,
                book_name: "Genesis".to_string(),
                chapter: 1,
                verses: Vec::new(),
            },
            highlight: Highlight::NONE,
            viewport: Viewport::default(),
            pending: None,
            comparison: None,
            pending_parallel: None,
            cached: Vec::new(),
            cache_size: 0,
            downloading: None,
            error: None,
            status_message: String::new(),
            next_token: 0,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut app = Self::new(
            config.translation.clone(),
            config.theme,
            config.comparison_translations.clone(),
        );
        app.reading.book_id = config.book_id;
        app.reading.chapter = config.chapter;
        if config.book_id != 1 {
            app.reading.book_name = format!("Book {}", config.book_id);
        }
        app
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some() || self.pending_parallel.is_some()
    }

    pub fn book(&self, id: u32) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Where navigation is heading: the in-flight chapter if any, else the loaded one.
    pub fn target(&self) -> (u32, u32) {
        match &self.pending {
            Some(request) => (request.book_id, request.chapter),
            None => (self.reading.book_id, self.reading.chapter),
        }
    }

    pub fn is_cached(&self, translation: &str) -> bool {
        self.cached.iter().any(|c| c.eq_ignore_ascii_case(translation))
    }

    pub fn verse_map(&self) -> VerseMap {
        VerseMap::build(&self.reading.verses, self.viewport.width)
    }

    pub fn comparison_lines(&self) -> Vec<RenderedLine> {
        self.comparison
            .as_ref()
            .map(|c| render_parallel(&c.data, self.viewport.width))
            .unwrap_or_default()
    }

    /// Issues a chapter fetch, superseding any fetch still in flight.
    pub fn request_chapter(
        &mut self,
        book_id: u32,
        chapter: u32,
        highlight: Option<Highlight>,
    ) -> ChapterRequest {
        let request = ChapterRequest {
            token: self.next_token(),
            translation: self.translation.clone(),
            book_id,
            chapter,
            highlight,
        };
        self.pending = Some(request.clone());
        request
    }

    /// Issues a comparison fetch for the chapter on screen.
    pub fn request_parallel(&mut self, verses: Vec<u32>) -> ParallelRequest {
        let request = ParallelRequest {
            token: self.next_token(),
            translations: self.comparison_translations.clone(),
            book_id: self.reading.book_id,
            chapter: self.reading.chapter,
            verses,
        };
        self.pending_parallel = Some(request.clone());
        request
    }

    fn next_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    pub fn settings(&self) -> Settings {
        let (book, chapter) = (self.reading.book_id, self.reading.chapter);
        Settings {
            translation: Some(self.translation.clone()),
            book: Some(book),
            chapter: Some(chapter),
            theme: Some(self.theme.name().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{loaded_app, test_app};

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.screen, Screen::reader());
        assert_eq!((app.reading.book_id, app.reading.chapter), (1, 1));
        assert!(!app.highlight.is_active());
        assert!(!app.is_loading());
        assert!(app.error.is_none());
    }

    #[test]
    fn test_highlight_range_ordering() {
        let h = Highlight::range(7, 3);
        assert_eq!((h.start, h.end), (3, 7));
        assert!(h.contains(3) && h.contains(7) && !h.contains(8));
        assert!(!Highlight::NONE.contains(0));
    }

    #[test]
    fn test_tokens_are_monotonic() {
        let mut app = test_app();
        let first = app.request_chapter(1, 2, None).token;
        let second = app.request_chapter(1, 3, None).token;
        assert!(second > first);
        assert_eq!(app.pending.as_ref().map(|p| p.token), Some(second));
        assert_eq!(app.target(), (1, 3));
    }

    #[test]
    fn test_settings_snapshot() {
        let app = loaded_app();
        let settings = app.settings();
        assert_eq!(settings.translation.as_deref(), Some("NLT"));
        assert_eq!((settings.book, settings.chapter), (Some(1), Some(1)));
        assert_eq!(settings.theme.as_deref(), Some("Catppuccin Mocha"));
    }

    #[test]
    fn test_screen_modes() {
        assert_eq!(Screen::About.mode(), ViewMode::About);
        assert_eq!(
            Screen::Reader(Overlay::Sidebar { selected: 0 }).mode(),
            ViewMode::Reader
        );
    }
}
