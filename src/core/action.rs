//! # Actions
//!
//! Everything that can happen in Lectern becomes an `Action`.
//! User presses `n`? That's `Action::Key(Key::Char('n'))`.
//! A chapter arrives? That's `Action::ChapterLoaded { token, verses }`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns the side effects as plain data. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Vec<Effect>
//! ```
//!
//! This makes everything testable without mocking a network or a terminal:
//! feed actions in, assert on state and on the effects that came out.

use log::{debug, info, warn};

use crate::bible::{Book, ParallelChapter, Translation, Verse};
use crate::core::miller::{Column, MillerState};
use crate::core::reference::parse_reference;
use crate::core::state::{App, Comparison, Highlight, Overlay, Reading, Screen, ViewMode};
use crate::core::text::strip_markup;
use crate::core::theme::ThemeId;

/// Lines moved per mouse wheel notch.
pub const WHEEL_LINES: i32 = 3;

/// Verses asked for in a comparison when the chapter length isn't known yet.
const MIN_COMPARISON_VERSES: u32 = 31;

/// Keys the core reacts to, independent of the terminal library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    CtrlC,
    CtrlD,
    CtrlU,
}

/// A chapter fetch in flight. Only the request whose token matches
/// `App::pending` may land.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterRequest {
    pub token: u64,
    pub translation: String,
    pub book_id: u32,
    pub chapter: u32,
    /// Verse range to highlight and scroll to once loaded.
    pub highlight: Option<Highlight>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParallelRequest {
    pub token: u64,
    pub translations: Vec<String>,
    pub book_id: u32,
    pub chapter: u32,
    pub verses: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Init,
    Key(Key),
    /// Mouse wheel, in lines. Negative scrolls up.
    Scroll(i32),
    /// The reading area changed size.
    Resize { width: u16, height: u16 },
    TranslationsLoaded(Vec<Translation>),
    BooksLoaded { translation: String, books: Vec<Book> },
    ChapterLoaded { token: u64, verses: Vec<Verse> },
    ChapterFailed { token: u64, message: String },
    ParallelLoaded { token: u64, chapter: ParallelChapter },
    ParallelFailed { token: u64, message: String },
    CacheListed { translations: Vec<String>, size_bytes: u64 },
    DownloadFinished { translation: String, error: Option<String> },
    /// A catalogue fetch (translations, books) failed.
    RequestFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Quit,
    FetchTranslations,
    FetchBooks { translation: String },
    FetchChapter(ChapterRequest),
    FetchParallel(ParallelRequest),
    CopyToClipboard(String),
    ListCached,
    DownloadTranslation(String),
    RemoveTranslation(String),
    SaveSettings,
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::Init => {
            let (book_id, chapter) = (app.reading.book_id, app.reading.chapter);
            info!("Starting on {} {}:{}", app.translation, book_id, chapter);
            let request = app.request_chapter(book_id, chapter, None);
            vec![
                Effect::FetchTranslations,
                Effect::FetchBooks {
                    translation: app.translation.clone(),
                },
                Effect::FetchChapter(request),
                Effect::ListCached,
            ]
        }
        Action::Key(key) => handle_key(app, key),
        Action::Scroll(lines) => {
            match app.screen {
                Screen::Reader(Overlay::None) => scroll_reader(app, lines),
                Screen::Comparison { .. } => scroll_comparison(app, lines),
                _ => {}
            }
            Vec::new()
        }
        Action::Resize { width, height } => {
            resize(app, width, height);
            Vec::new()
        }
        Action::TranslationsLoaded(translations) => {
            debug!("Loaded {} translations", translations.len());
            app.translations = translations;
            let last = app.translations.len().saturating_sub(1);
            if let Screen::TranslationSelect { selected } | Screen::CacheManager { selected } =
                &mut app.screen
            {
                *selected = (*selected).min(last);
            }
            Vec::new()
        }
        Action::BooksLoaded { translation, books } => {
            books_loaded(app, translation, books);
            Vec::new()
        }
        Action::ChapterLoaded { token, verses } => {
            chapter_loaded(app, token, verses);
            Vec::new()
        }
        Action::ChapterFailed { token, message } => {
            if app.pending.take_if(|p| p.token == token).is_some() {
                warn!("Chapter fetch failed: {}", message);
                app.error = Some(message);
            } else {
                debug!("Ignoring failure of superseded chapter request {}", token);
            }
            Vec::new()
        }
        Action::ParallelLoaded { token, chapter } => {
            match app.pending_parallel.take_if(|p| p.token == token) {
                Some(request) => {
                    info!(
                        "Loaded comparison of {} translations for {}:{}",
                        chapter.columns.len(),
                        request.book_id,
                        request.chapter
                    );
                    app.comparison = Some(Comparison {
                        book_id: request.book_id,
                        chapter: request.chapter,
                        data: chapter,
                    });
                    app.error = None;
                    clamp_comparison_offset(app);
                }
                None => debug!("Ignoring superseded comparison {}", token),
            }
            Vec::new()
        }
        Action::ParallelFailed { token, message } => {
            if app.pending_parallel.take_if(|p| p.token == token).is_some() {
                warn!("Comparison fetch failed: {}", message);
                app.error = Some(message);
            }
            Vec::new()
        }
        Action::CacheListed {
            translations,
            size_bytes,
        } => {
            app.cached = translations;
            app.cache_size = size_bytes;
            Vec::new()
        }
        Action::DownloadFinished { translation, error } => {
            app.downloading = None;
            match error {
                Some(e) => {
                    warn!("Download of {} failed: {}", translation, e);
                    app.error = Some(format!("Download of {translation} failed: {e}"));
                    Vec::new()
                }
                None => {
                    info!("Downloaded {}", translation);
                    app.status_message = format!("Downloaded {translation}");
                    vec![Effect::ListCached]
                }
            }
        }
        Action::RequestFailed(message) => {
            warn!("Request failed: {}", message);
            app.error = Some(message);
            Vec::new()
        }
    }
}

// ============================================================================
// Results
// ============================================================================

fn books_loaded(app: &mut App, translation: String, books: Vec<Book>) {
    if !translation.eq_ignore_ascii_case(&app.translation) {
        debug!("Discarding books for {} (now reading {})", translation, app.translation);
        return;
    }
    debug!("Loaded {} books for {}", books.len(), translation);
    app.books = books;
    if let Some(name) = app.book(app.reading.book_id).map(|b| b.name.clone()) {
        app.reading.book_name = name;
    }
    let last = app.books.len().saturating_sub(1);
    match &mut app.screen {
        Screen::Reader(Overlay::Sidebar { selected }) => *selected = (*selected).min(last),
        Screen::Reader(Overlay::Miller(miller)) => {
            if !miller.filter.is_empty() && miller.filter_column == Column::Books {
                let verses = miller_verses(&app.books, &app.reading, miller);
                miller.recompute(&app.books, verses);
            }
        }
        _ => {}
    }
}

fn chapter_loaded(app: &mut App, token: u64, verses: Vec<Verse>) {
    let Some(request) = app.pending.take_if(|p| p.token == token) else {
        debug!("Discarding stale chapter response {}", token);
        return;
    };
    let book_name = app
        .book(request.book_id)
        .map(|b| b.name.clone())
        .unwrap_or_else(|| format!("Book {}", request.book_id));
    info!(
        "Loaded {} {} {} ({} verses)",
        request.translation,
        book_name,
        request.chapter,
        verses.len()
    );
    app.reading = Reading {
        book_id: request.book_id,
        book_name,
        chapter: request.chapter,
        verses,
    };
    app.error = None;
    apply_highlight(app, request.highlight);

    if let Screen::Reader(Overlay::Miller(miller)) = &mut app.screen {
        let verses = miller_verses(&app.books, &app.reading, miller);
        miller.on_verses_replaced(verses);
    }
}

/// Highlights `highlight` and scrolls to it, or falls back to the first
/// verse at the top of the chapter.
fn apply_highlight(app: &mut App, highlight: Option<Highlight>) {
    match highlight.filter(|h| h.is_active()) {
        Some(h) => {
            app.highlight = h;
            app.viewport.offset = app
                .verse_map()
                .offset_for_verse(h.start, app.viewport.height as usize);
        }
        None => {
            let first = app.reading.verses.first().map_or(1, |v| v.number);
            app.highlight = Highlight::verse(first);
            app.viewport.offset = 0;
        }
    }
}

// ============================================================================
// Keys
// ============================================================================

fn handle_key(app: &mut App, key: Key) -> Vec<Effect> {
    app.status_message.clear();

    if key == Key::CtrlC {
        return quit();
    }
    let typing = match &app.screen {
        Screen::Search { .. } => true,
        Screen::Reader(Overlay::Miller(miller)) => miller.filtering,
        _ => false,
    };
    if key == Key::Char('q') && !typing {
        return quit();
    }

    match app.screen.mode() {
        ViewMode::Reader => match app.screen {
            Screen::Reader(Overlay::Miller(_)) => miller_key(app, key),
            Screen::Reader(Overlay::Sidebar { .. }) => sidebar_key(app, key),
            _ => reader_key(app, key),
        },
        ViewMode::Search => search_key(app, key),
        ViewMode::Comparison => comparison_key(app, key),
        ViewMode::TranslationSelect => translation_key(app, key),
        ViewMode::ThemeSelect => theme_key(app, key),
        ViewMode::CacheManager => cache_key(app, key),
        ViewMode::About => {
            if matches!(key, Key::Esc | Key::Char('r') | Key::Char('?')) {
                app.screen = Screen::reader();
            }
            Vec::new()
        }
    }
}

fn quit() -> Vec<Effect> {
    info!("Quit requested");
    vec![Effect::SaveSettings, Effect::Quit]
}

/// Reader with no overlay.
fn reader_key(app: &mut App, key: Key) -> Vec<Effect> {
    match key {
        Key::Char('[') => {
            let (book_id, _) = app.target();
            let selected = app.books.iter().position(|b| b.id == book_id).unwrap_or(0);
            app.screen = Screen::Reader(Overlay::Sidebar { selected });
        }
        Key::Char('v') => {
            let (book_id, chapter) = app.target();
            app.screen = Screen::Reader(Overlay::Miller(MillerState::open(
                &app.books, book_id, chapter,
            )));
        }
        Key::Char('/') => open_search(app),
        Key::Char('j') | Key::Down => select_adjacent_verse(app, 1),
        Key::Char('k') | Key::Up => select_adjacent_verse(app, -1),
        Key::Char('n') | Key::PageDown => return change_chapter(app, 1),
        Key::Char('p') | Key::PageUp => return change_chapter(app, -1),
        Key::CtrlD => scroll_reader(app, half_page(app)),
        Key::CtrlU => scroll_reader(app, -half_page(app)),
        Key::Char('c') => return open_comparison(app),
        Key::Char('t') => {
            app.screen = Screen::TranslationSelect {
                selected: current_translation_index(app),
            };
            if app.translations.is_empty() {
                return vec![Effect::FetchTranslations];
            }
        }
        Key::Char('T') => {
            app.screen = Screen::ThemeSelect {
                selected: app.theme.index(),
            }
        }
        Key::Char('d') => {
            app.screen = Screen::CacheManager {
                selected: current_translation_index(app),
            };
            let mut effects = vec![Effect::ListCached];
            if app.translations.is_empty() {
                effects.push(Effect::FetchTranslations);
            }
            return effects;
        }
        Key::Char('?') => app.screen = Screen::About,
        Key::Char('y') => return yank(app, true),
        Key::Char('Y') => return yank(app, false),
        _ => {}
    }
    Vec::new()
}

fn open_search(app: &mut App) {
    app.screen = Screen::Search {
        input: String::new(),
    };
}

fn current_translation_index(app: &App) -> usize {
    app.translations
        .iter()
        .position(|t| t.short_name.eq_ignore_ascii_case(&app.translation))
        .unwrap_or(0)
}

fn sidebar_key(app: &mut App, key: Key) -> Vec<Effect> {
    let selected = match app.screen {
        Screen::Reader(Overlay::Sidebar { selected }) => selected,
        _ => return Vec::new(),
    };
    let last = app.books.len().saturating_sub(1);
    match key {
        Key::Char('[') | Key::Esc => app.screen = Screen::reader(),
        Key::Char('/') => open_search(app),
        Key::Char('k') | Key::Up => {
            app.screen = Screen::Reader(Overlay::Sidebar {
                selected: selected.saturating_sub(1),
            })
        }
        Key::Char('j') | Key::Down => {
            app.screen = Screen::Reader(Overlay::Sidebar {
                selected: (selected + 1).min(last),
            })
        }
        Key::Enter => {
            if let Some(book_id) = app.books.get(selected).map(|b| b.id) {
                app.screen = Screen::reader();
                return go_to(app, book_id, 1, None);
            }
        }
        _ => {}
    }
    Vec::new()
}

fn search_key(app: &mut App, key: Key) -> Vec<Effect> {
    let Screen::Search { input } = &mut app.screen else {
        return Vec::new();
    };
    match key {
        Key::Char(c) => input.push(c),
        Key::Backspace => {
            input.pop();
        }
        Key::Esc => app.screen = Screen::reader(),
        Key::Enter => {
            let query = input.clone();
            return submit_search(app, &query);
        }
        _ => {}
    }
    Vec::new()
}

fn submit_search(app: &mut App, query: &str) -> Vec<Effect> {
    match parse_reference(query, &app.books) {
        Ok(reference) => {
            info!("Search {:?} resolved to {:?}", query, reference);
            app.screen = Screen::reader();
            let highlight = (reference.verse_start > 0)
                .then(|| Highlight::range(reference.verse_start, reference.verse_end));
            go_to(app, reference.book_id, reference.chapter, highlight)
        }
        Err(e) => {
            debug!("Rejected reference {:?}: {}", query, e);
            Vec::new()
        }
    }
}

/// Shows `book_id`/`chapter`, fetching only when it isn't already on screen.
fn go_to(
    app: &mut App,
    book_id: u32,
    chapter: u32,
    highlight: Option<Highlight>,
) -> Vec<Effect> {
    let on_screen = app.pending.is_none()
        && app.reading.book_id == book_id
        && app.reading.chapter == chapter
        && !app.reading.verses.is_empty();
    if on_screen {
        apply_highlight(app, highlight);
        return Vec::new();
    }
    let request = app.request_chapter(book_id, chapter, highlight);
    vec![Effect::FetchChapter(request)]
}

fn change_chapter(app: &mut App, step: i32) -> Vec<Effect> {
    let (book_id, chapter) = app.target();
    let Some(count) = app.book(book_id).map(|b| b.chapter_count) else {
        return Vec::new();
    };
    let Some(next) = chapter
        .checked_add_signed(step)
        .filter(|c| (1..=count).contains(c))
    else {
        debug!("No chapter {:+} from {}:{}", step, book_id, chapter);
        return Vec::new();
    };
    let request = app.request_chapter(book_id, next, None);
    vec![Effect::FetchChapter(request)]
}

/// Moves the highlight by list position and scrolls it into place.
fn select_adjacent_verse(app: &mut App, step: isize) {
    let verses = &app.reading.verses;
    if verses.is_empty() {
        return;
    }
    let map = app.verse_map();
    let anchor = if app.highlight.is_active() {
        Some(app.highlight.start)
    } else {
        map.verse_at_offset(app.viewport.offset)
    };
    let current = anchor
        .and_then(|n| verses.iter().position(|v| v.number == n))
        .unwrap_or(0);
    let index = current.saturating_add_signed(step).min(verses.len() - 1);
    let number = verses[index].number;
    app.highlight = Highlight::verse(number);
    app.viewport.offset = map.offset_for_verse(number, app.viewport.height as usize);
}

fn half_page(app: &App) -> i32 {
    i32::from((app.viewport.height / 2).max(1))
}

fn scroll_reader(app: &mut App, lines: i32) {
    let map = app.verse_map();
    let max = map.max_offset(app.viewport.height as usize);
    let offset = app
        .viewport
        .offset
        .saturating_add_signed(lines as isize)
        .min(max);
    if offset == app.viewport.offset {
        return;
    }
    app.viewport.offset = offset;
    if let Some(verse) = map.verse_at_offset(offset) {
        app.highlight = Highlight::verse(verse);
    }
}

fn resize(app: &mut App, width: u16, height: u16) {
    app.viewport.width = width;
    app.viewport.height = height;
    let map = app.verse_map();
    let height = height as usize;
    app.viewport.offset = if app.highlight.is_active() {
        map.offset_for_verse(app.highlight.start, height)
    } else {
        app.viewport.offset.min(map.max_offset(height))
    };
    clamp_comparison_offset(app);
}

// ============================================================================
// Yank
// ============================================================================

fn yank(app: &mut App, highlighted_only: bool) -> Vec<Effect> {
    if app.reading.verses.is_empty() {
        return Vec::new();
    }
    let range = Some(app.highlight).filter(|h| highlighted_only && h.is_active());
    let (header, text) = yank_text(&app.translation, &app.reading, range);
    debug!("Yanked {} ({} bytes)", header, text.len());
    app.status_message = format!("Copied {header}");
    vec![Effect::CopyToClipboard(text)]
}

/// Labels and serializes `range` (or the whole chapter) for the clipboard.
/// Returns `(header, text)`.
pub fn yank_text(translation: &str, reading: &Reading, range: Option<Highlight>) -> (String, String) {
    let chapter_label = format!("{} {} {}", translation, reading.book_name, reading.chapter);
    let in_range: Vec<&Verse> = match range {
        Some(h) => reading.verses.iter().filter(|v| h.contains(v.number)).collect(),
        None => Vec::new(),
    };
    let (header, verses) = match range {
        Some(h) if !in_range.is_empty() => {
            let header = if h.start == h.end {
                format!("{chapter_label}:{}", h.start)
            } else {
                format!("{chapter_label}:{}-{}", h.start, h.end)
            };
            (header, in_range)
        }
        _ => (chapter_label, reading.verses.iter().collect()),
    };
    let body = verses
        .iter()
        .map(|v| format!("{}. {}", v.number, strip_markup(&v.text)))
        .collect::<Vec<_>>()
        .join("\n\n");
    let text = format!("{header}\n\n{body}");
    (header, text)
}

// ============================================================================
// Miller overlay
// ============================================================================

/// Verses behind the miller verse column: the loaded chapter when the
/// selection points at it, nothing otherwise.
pub fn miller_verses<'a>(books: &[Book], reading: &'a Reading, miller: &MillerState) -> &'a [Verse] {
    let book_id = miller.selected_book(books).map(|b| b.id);
    let chapter = miller.selected_chapter(books);
    if book_id == Some(reading.book_id) && chapter == Some(reading.chapter) {
        &reading.verses
    } else {
        &[]
    }
}

fn miller_key(app: &mut App, key: Key) -> Vec<Effect> {
    let Screen::Reader(Overlay::Miller(mut miller)) =
        std::mem::replace(&mut app.screen, Screen::reader())
    else {
        return Vec::new();
    };
    let mut effects = Vec::new();
    let mut keep_open = true;

    if miller.filtering {
        let verses = miller_verses(&app.books, &app.reading, &miller);
        match key {
            Key::Esc | Key::Enter | Key::Char('/') => miller.toggle_filter(&app.books, verses),
            Key::Backspace => miller.pop_char(&app.books, verses),
            Key::Char(c) => miller.push_char(c, &app.books, verses),
            _ => {}
        }
    } else {
        match key {
            Key::Esc | Key::Char('v') => keep_open = false,
            Key::Char('/') => {
                let verses = miller_verses(&app.books, &app.reading, &miller);
                miller.toggle_filter(&app.books, verses);
            }
            Key::Char('h') | Key::Left => miller.move_left(),
            Key::Char('l') | Key::Right => {
                if let Some((book_id, chapter)) = miller.move_right(&app.books)
                    && app.target() != (book_id, chapter)
                {
                    let request = app.request_chapter(book_id, chapter, None);
                    effects.push(Effect::FetchChapter(request));
                }
            }
            Key::Char('k') | Key::Up => miller.move_up(),
            Key::Char('j') | Key::Down => {
                let verses = miller_verses(&app.books, &app.reading, &miller);
                miller.move_down(&app.books, verses);
            }
            Key::Enter => {
                if let Some(committed) = commit_miller(app, &miller) {
                    effects = committed;
                    keep_open = false;
                }
            }
            _ => {}
        }
    }

    if keep_open {
        app.screen = Screen::Reader(Overlay::Miller(miller));
    }
    effects
}

/// `None` when nothing is selected (e.g. a filter that matches nothing).
fn commit_miller(app: &mut App, miller: &MillerState) -> Option<Vec<Effect>> {
    let book_id = miller.selected_book(&app.books)?.id;
    let chapter = miller.selected_chapter(&app.books)?;
    let verse = match miller.column {
        Column::Verses => {
            miller.selected_verse(miller_verses(&app.books, &app.reading, miller))
        }
        _ => None,
    };
    info!("Picked {}:{} verse {:?}", book_id, chapter, verse);
    Some(go_to(app, book_id, chapter, verse.map(Highlight::verse)))
}

// ============================================================================
// Other screens
// ============================================================================

fn open_comparison(app: &mut App) -> Vec<Effect> {
    if let Some(pending) = &app.pending {
        debug!(
            "Not comparing while {}:{} is loading",
            pending.book_id, pending.chapter
        );
        return Vec::new();
    }
    let last = app
        .reading
        .verses
        .iter()
        .map(|v| v.number)
        .max()
        .unwrap_or(0)
        .max(MIN_COMPARISON_VERSES);
    let (book_id, chapter) = (app.reading.book_id, app.reading.chapter);
    if app
        .comparison
        .as_ref()
        .is_some_and(|c| (c.book_id, c.chapter) != (book_id, chapter))
    {
        app.comparison = None;
    }
    app.screen = Screen::Comparison { offset: 0 };
    let request = app.request_parallel((1..=last).collect());
    vec![Effect::FetchParallel(request)]
}

fn comparison_key(app: &mut App, key: Key) -> Vec<Effect> {
    match key {
        Key::Esc | Key::Char('r') => app.screen = Screen::reader(),
        Key::Char('j') | Key::Down => scroll_comparison(app, 1),
        Key::Char('k') | Key::Up => scroll_comparison(app, -1),
        Key::CtrlD | Key::PageDown => scroll_comparison(app, half_page(app)),
        Key::CtrlU | Key::PageUp => scroll_comparison(app, -half_page(app)),
        _ => {}
    }
    Vec::new()
}

fn scroll_comparison(app: &mut App, lines: i32) {
    let max = app
        .comparison_lines()
        .len()
        .saturating_sub(app.viewport.height as usize);
    if let Screen::Comparison { offset } = &mut app.screen {
        *offset = offset.saturating_add_signed(lines as isize).min(max);
    }
}

fn clamp_comparison_offset(app: &mut App) {
    scroll_comparison(app, 0);
}

/// Up/down within a list of `len` rows. Returns the new index.
fn step_selection(selected: usize, len: usize, key: Key) -> usize {
    match key {
        Key::Char('k') | Key::Up => selected.saturating_sub(1),
        Key::Char('j') | Key::Down => (selected + 1).min(len.saturating_sub(1)),
        _ => selected,
    }
}

fn translation_key(app: &mut App, key: Key) -> Vec<Effect> {
    let Screen::TranslationSelect { selected } = app.screen else {
        return Vec::new();
    };
    match key {
        Key::Esc | Key::Char('r') => app.screen = Screen::reader(),
        Key::Enter => {
            if let Some(code) = app.translations.get(selected).map(|t| t.short_name.clone()) {
                app.screen = Screen::reader();
                return switch_translation(app, code);
            }
        }
        _ => {
            app.screen = Screen::TranslationSelect {
                selected: step_selection(selected, app.translations.len(), key),
            }
        }
    }
    Vec::new()
}

fn switch_translation(app: &mut App, code: String) -> Vec<Effect> {
    if code.eq_ignore_ascii_case(&app.translation) {
        return Vec::new();
    }
    info!("Switching translation {} -> {}", app.translation, code);
    app.translation = code.clone();
    app.status_message = format!("Translation: {code}");
    let (book_id, chapter) = app.target();
    let highlight = Some(app.highlight).filter(|h| h.is_active());
    let request = app.request_chapter(book_id, chapter, highlight);
    vec![
        Effect::FetchBooks { translation: code },
        Effect::FetchChapter(request),
        Effect::SaveSettings,
    ]
}

fn theme_key(app: &mut App, key: Key) -> Vec<Effect> {
    let Screen::ThemeSelect { selected } = app.screen else {
        return Vec::new();
    };
    match key {
        Key::Esc | Key::Char('r') => app.screen = Screen::reader(),
        Key::Enter => {
            if let Some(theme) = ThemeId::ALL.get(selected).copied() {
                info!("Theme set to {}", theme.name());
                app.theme = theme;
                app.status_message = format!("Theme: {}", theme.name());
                app.screen = Screen::reader();
                return vec![Effect::SaveSettings];
            }
        }
        _ => {
            app.screen = Screen::ThemeSelect {
                selected: step_selection(selected, ThemeId::ALL.len(), key),
            }
        }
    }
    Vec::new()
}

fn cache_key(app: &mut App, key: Key) -> Vec<Effect> {
    let Screen::CacheManager { selected } = app.screen else {
        return Vec::new();
    };
    let code = app.translations.get(selected).map(|t| t.short_name.clone());
    match (key, code) {
        (Key::Esc | Key::Char('r'), _) => app.screen = Screen::reader(),
        (Key::Enter, Some(code)) => {
            if app.is_cached(&code) || app.downloading.is_some() {
                return Vec::new();
            }
            info!("Downloading {}", code);
            app.status_message = format!("Downloading {code}...");
            app.downloading = Some(code.clone());
            return vec![Effect::DownloadTranslation(code)];
        }
        (Key::Char('x'), Some(code)) => {
            if app.is_cached(&code) && app.downloading.as_deref() != Some(code.as_str()) {
                info!("Removing {} from cache", code);
                app.status_message = format!("Removed {code}");
                return vec![Effect::RemoveTranslation(code)];
            }
        }
        _ => {
            app.screen = Screen::CacheManager {
                selected: step_selection(selected, app.translations.len(), key),
            }
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{loaded_app, sample_verses, test_app};

    fn press(app: &mut App, keys: &str) -> Vec<Effect> {
        keys.chars()
            .flat_map(|c| update(app, Action::Key(Key::Char(c))))
            .collect()
    }

    fn key(app: &mut App, key: Key) -> Vec<Effect> {
        update(app, Action::Key(key))
    }

    fn search(app: &mut App, query: &str) -> Vec<Effect> {
        press(app, "/");
        press(app, query);
        key(app, Key::Enter)
    }

    fn only_chapter_request(effects: &[Effect]) -> ChapterRequest {
        match effects {
            [Effect::FetchChapter(request)] => request.clone(),
            other => panic!("expected a single chapter fetch, got {other:?}"),
        }
    }

    fn translation(code: &str) -> Translation {
        Translation {
            short_name: code.to_string(),
            full_name: format!("{code} Bible"),
            updated: None,
            dir: None,
        }
    }

    #[test]
    fn test_init_requests_catalogues_and_chapter() {
        let mut app = test_app();
        let effects = update(&mut app, Action::Init);
        assert_eq!(effects.len(), 4);
        assert_eq!(effects[0], Effect::FetchTranslations);
        assert_eq!(
            effects[1],
            Effect::FetchBooks {
                translation: "NLT".into()
            }
        );
        let Effect::FetchChapter(request) = &effects[2] else {
            panic!("expected chapter fetch");
        };
        assert_eq!((request.book_id, request.chapter), (1, 1));
        assert_eq!(request.highlight, None);
        assert_eq!(effects[3], Effect::ListCached);
        assert!(app.is_loading());
    }

    #[test]
    fn test_chapter_loaded_highlights_first_verse() {
        let mut app = test_app();
        update(&mut app, Action::Init);
        let token = app.pending.as_ref().map(|p| p.token).unwrap();
        update(
            &mut app,
            Action::ChapterLoaded {
                token,
                verses: sample_verses(1, 1, 5),
            },
        );
        assert_eq!((app.reading.book_id, app.reading.chapter), (1, 1));
        assert_eq!(app.highlight, Highlight::verse(1));
        assert_eq!(app.viewport.offset, 0);
        assert!(!app.is_loading());
    }

    #[test]
    fn test_search_scrolls_to_requested_verse() {
        let mut app = loaded_app();
        let request = only_chapter_request(&search(&mut app, "43 3:16"));
        assert_eq!((request.book_id, request.chapter), (43, 3));
        assert_eq!(request.highlight, Some(Highlight::verse(16)));
        assert_eq!(app.screen, Screen::reader());

        update(
            &mut app,
            Action::ChapterLoaded {
                token: request.token,
                verses: sample_verses(43, 3, 36),
            },
        );
        assert_eq!(app.reading.book_name, "John");
        assert_eq!(app.highlight, Highlight::verse(16));
        let expected = app.verse_map().offset_for_verse(16, 20);
        assert!(expected > 0);
        assert_eq!(app.viewport.offset, expected);
    }

    #[test]
    fn test_search_within_loaded_chapter_needs_no_fetch() {
        let mut app = loaded_app();
        let effects = search(&mut app, "Gen 1:12-10");
        assert!(effects.is_empty());
        assert_eq!(app.highlight, Highlight::range(10, 12));
        assert_eq!(
            app.viewport.offset,
            app.verse_map().offset_for_verse(10, 20)
        );
    }

    #[test]
    fn test_unparseable_search_stays_in_search() {
        let mut app = loaded_app();
        let effects = search(&mut app, "Nowhere 1:1");
        assert!(effects.is_empty());
        assert!(matches!(app.screen, Screen::Search { .. }));
        assert!(app.error.is_none());

        key(&mut app, Key::Esc);
        assert_eq!(app.screen, Screen::reader());
    }

    #[test]
    fn test_q_is_text_in_search() {
        let mut app = loaded_app();
        press(&mut app, "/");
        assert!(press(&mut app, "q").is_empty());
        key(&mut app, Key::Backspace);
        press(&mut app, "ps");
        assert_eq!(
            app.screen,
            Screen::Search {
                input: "ps".into()
            }
        );
        assert_eq!(
            key(&mut app, Key::CtrlC),
            vec![Effect::SaveSettings, Effect::Quit]
        );
    }

    #[test]
    fn test_quit_saves_settings() {
        let mut app = loaded_app();
        assert_eq!(press(&mut app, "q"), vec![Effect::SaveSettings, Effect::Quit]);
    }

    #[test]
    fn test_next_chapter_at_last_is_noop() {
        let mut app = loaded_app();
        let request = only_chapter_request(&search(&mut app, "Jude 1"));
        update(
            &mut app,
            Action::ChapterLoaded {
                token: request.token,
                verses: sample_verses(65, 1, 25),
            },
        );
        assert!(press(&mut app, "n").is_empty());
        assert!(key(&mut app, Key::PageUp).is_empty());
        assert_eq!((app.reading.book_id, app.reading.chapter), (65, 1));
        assert!(app.pending.is_none());
    }

    #[test]
    fn test_rapid_paging_discards_stale_response() {
        let mut app = loaded_app();
        press(&mut app, "j");
        let second = only_chapter_request(&press(&mut app, "n"));
        assert_eq!(second.chapter, 2);
        // The old chapter keeps its highlight until the new one arrives.
        assert_eq!(app.highlight, Highlight::verse(2));

        let third = only_chapter_request(&press(&mut app, "n"));
        assert_eq!(third.chapter, 3);
        assert!(third.token > second.token);

        // The slow chapter 2 response must not overwrite the newer navigation.
        update(
            &mut app,
            Action::ChapterLoaded {
                token: second.token,
                verses: sample_verses(1, 2, 10),
            },
        );
        assert_eq!(app.reading.chapter, 1);
        assert_eq!(app.target(), (1, 3));

        update(
            &mut app,
            Action::ChapterLoaded {
                token: third.token,
                verses: sample_verses(1, 3, 20),
            },
        );
        assert_eq!(app.reading.chapter, 3);
        assert_eq!(app.reading.verses.len(), 20);
        assert_eq!(app.highlight, Highlight::verse(1));
    }

    #[test]
    fn test_chapter_failure_sets_banner_without_moving() {
        let mut app = loaded_app();
        press(&mut app, "jj");
        assert_eq!(app.highlight, Highlight::verse(3));
        let offset = app.viewport.offset;
        let request = only_chapter_request(&press(&mut app, "n"));
        update(
            &mut app,
            Action::ChapterFailed {
                token: request.token + 100,
                message: "stale".into(),
            },
        );
        assert!(app.error.is_none());

        update(
            &mut app,
            Action::ChapterFailed {
                token: request.token,
                message: "network error: timed out".into(),
            },
        );
        assert_eq!(app.error.as_deref(), Some("network error: timed out"));
        assert_eq!(app.reading.chapter, 1);
        assert_eq!(app.highlight, Highlight::verse(3));
        assert_eq!(app.viewport.offset, offset);
        assert!(app.pending.is_none());

        // Next successful load clears the banner.
        let retry = only_chapter_request(&press(&mut app, "n"));
        update(
            &mut app,
            Action::ChapterLoaded {
                token: retry.token,
                verses: sample_verses(1, 2, 10),
            },
        );
        assert!(app.error.is_none());
    }

    #[test]
    fn test_up_down_select_adjacent_verse() {
        let mut app = loaded_app();
        press(&mut app, "jjj");
        assert_eq!(app.highlight, Highlight::verse(4));
        assert_eq!(app.viewport.offset, app.verse_map().offset_for_verse(4, 20));
        key(&mut app, Key::Up);
        assert_eq!(app.highlight, Highlight::verse(3));
        press(&mut app, "kkkk");
        assert_eq!(app.highlight, Highlight::verse(1));
        assert_eq!(app.viewport.offset, 0);
    }

    #[test]
    fn test_scroll_retargets_highlight_only_on_change() {
        let mut app = loaded_app();
        // Each sample verse renders as a 3-line block at width 80.
        update(&mut app, Action::Scroll(WHEEL_LINES));
        assert_eq!(app.viewport.offset, 3);
        assert_eq!(app.highlight, Highlight::verse(2));

        update(&mut app, Action::Scroll(-10));
        assert_eq!(app.viewport.offset, 0);
        assert_eq!(app.highlight, Highlight::verse(1));

        app.highlight = Highlight::verse(5);
        update(&mut app, Action::Scroll(-WHEEL_LINES));
        assert_eq!(app.highlight, Highlight::verse(5));

        update(&mut app, Action::Scroll(10_000));
        assert_eq!(app.viewport.offset, app.verse_map().max_offset(20));
    }

    #[test]
    fn test_half_page_scroll_clamps_and_retargets() {
        let mut app = loaded_app();
        let half = 10;
        key(&mut app, Key::CtrlD);
        assert_eq!(app.viewport.offset, half);
        let expected = app.verse_map().verse_at_offset(half).unwrap();
        assert_eq!(app.highlight, Highlight::verse(expected));

        key(&mut app, Key::CtrlU);
        assert_eq!(app.viewport.offset, 0);
        assert_eq!(app.highlight, Highlight::verse(1));

        // Already at the top: nothing moves.
        app.highlight = Highlight::verse(2);
        key(&mut app, Key::CtrlU);
        assert_eq!(app.viewport.offset, 0);
        assert_eq!(app.highlight, Highlight::verse(2));

        let max = app.verse_map().max_offset(20);
        for _ in 0..50 {
            key(&mut app, Key::CtrlD);
        }
        assert_eq!(app.viewport.offset, max);
        let last_visible = app.verse_map().verse_at_offset(max).unwrap();
        assert_eq!(app.highlight, Highlight::verse(last_visible));
    }

    #[test]
    fn test_esc_precedence() {
        let mut app = loaded_app();
        press(&mut app, "v/");
        assert!(matches!(&app.screen, Screen::Reader(Overlay::Miller(m)) if m.filtering));

        key(&mut app, Key::Esc);
        assert!(matches!(&app.screen, Screen::Reader(Overlay::Miller(m)) if !m.filtering));
        key(&mut app, Key::Esc);
        assert_eq!(app.screen, Screen::reader());

        press(&mut app, "[");
        press(&mut app, "v");
        assert!(matches!(app.screen, Screen::Reader(Overlay::Sidebar { .. })));
        key(&mut app, Key::Esc);
        assert_eq!(app.screen, Screen::reader());
    }

    #[test]
    fn test_overlays_block_reader_keys() {
        let mut app = loaded_app();
        press(&mut app, "[");
        assert!(press(&mut app, "c").is_empty());
        assert!(press(&mut app, "n").is_empty());
        assert!(matches!(app.screen, Screen::Reader(Overlay::Sidebar { .. })));

        // Search from the sidebar closes it.
        press(&mut app, "/");
        assert!(matches!(app.screen, Screen::Search { .. }));
    }

    #[test]
    fn test_sidebar_blocks_screen_switches() {
        let mut app = loaded_app();
        press(&mut app, "[");
        for c in ["t", "T", "d", "?"] {
            assert!(press(&mut app, c).is_empty(), "{c} should be ignored");
            assert!(matches!(app.screen, Screen::Reader(Overlay::Sidebar { .. })));
        }
    }

    #[test]
    fn test_bracket_ignored_in_miller() {
        let mut app = loaded_app();
        press(&mut app, "v");
        let before = app.screen.clone();
        assert!(press(&mut app, "[").is_empty());
        assert_eq!(app.screen, before);
    }

    #[test]
    fn test_sidebar_seeded_on_current_book() {
        let mut app = loaded_app();
        let request = only_chapter_request(&search(&mut app, "John 3:16"));
        update(
            &mut app,
            Action::ChapterLoaded {
                token: request.token,
                verses: sample_verses(43, 3, 36),
            },
        );
        press(&mut app, "[");
        assert_eq!(app.screen, Screen::Reader(Overlay::Sidebar { selected: 6 }));
        press(&mut app, "j");
        let request = only_chapter_request(&key(&mut app, Key::Enter));
        assert_eq!((request.book_id, request.chapter), (62, 1));
        assert_eq!(app.screen, Screen::reader());
    }

    #[test]
    fn test_miller_filter_matching_nothing() {
        let mut app = loaded_app();
        press(&mut app, "v/zzz");
        let Screen::Reader(Overlay::Miller(miller)) = &app.screen else {
            panic!("miller should be open");
        };
        assert_eq!(miller.filtered_books, Some(vec![]));

        key(&mut app, Key::Enter); // leave filter mode
        press(&mut app, "jkl");
        assert!(key(&mut app, Key::Enter).is_empty());
        assert!(matches!(app.screen, Screen::Reader(Overlay::Miller(_))));
    }

    #[test]
    fn test_miller_commit_verse_in_loaded_chapter() {
        let mut app = loaded_app();
        press(&mut app, "v");
        assert!(press(&mut app, "ll").is_empty());
        press(&mut app, "jj");
        assert!(key(&mut app, Key::Enter).is_empty());
        assert_eq!(app.screen, Screen::reader());
        assert_eq!(app.highlight, Highlight::verse(3));
        assert_eq!(app.viewport.offset, app.verse_map().offset_for_verse(3, 20));
    }

    #[test]
    fn test_miller_verse_column_fetches_other_chapter() {
        let mut app = loaded_app();
        press(&mut app, "vlj");
        let request = only_chapter_request(&press(&mut app, "l"));
        assert_eq!((request.book_id, request.chapter), (1, 2));

        update(
            &mut app,
            Action::ChapterLoaded {
                token: request.token,
                verses: sample_verses(1, 2, 25),
            },
        );
        assert!(matches!(app.screen, Screen::Reader(Overlay::Miller(_))));
        press(&mut app, "j");
        assert!(key(&mut app, Key::Enter).is_empty());
        assert_eq!((app.reading.book_id, app.reading.chapter), (1, 2));
        assert_eq!(app.highlight, Highlight::verse(2));
    }

    #[test]
    fn test_miller_commit_other_book_from_first_column() {
        let mut app = loaded_app();
        press(&mut app, "v/exo");
        key(&mut app, Key::Esc);
        let request = only_chapter_request(&key(&mut app, Key::Enter));
        assert_eq!((request.book_id, request.chapter, request.highlight), (2, 1, None));
        assert_eq!(app.screen, Screen::reader());
    }

    #[test]
    fn test_yank_highlighted_and_whole_chapter() {
        let mut app = loaded_app();
        press(&mut app, "j");
        assert_eq!(
            press(&mut app, "y"),
            vec![Effect::CopyToClipboard(
                "NLT Genesis 1:2\n\n2. Verse 2 of chapter 1 says something worth reading.".into()
            )]
        );
        assert_eq!(app.status_message, "Copied NLT Genesis 1:2");

        app.highlight = Highlight::range(2, 3);
        app.reading.verses[2].text = "Then <i>God</i> said &ldquo;Let there be light&rdquo;".into();
        let (header, text) = yank_text("NLT", &app.reading, Some(app.highlight));
        assert_eq!(header, "NLT Genesis 1:2-3");
        assert!(text.ends_with("\n\n3. Then God said \u{201c}Let there be light\u{201d}"));

        let effects = press(&mut app, "Y");
        let [Effect::CopyToClipboard(whole)] = effects.as_slice() else {
            panic!("expected clipboard write");
        };
        assert!(whole.starts_with("NLT Genesis 1\n\n1. "));
        assert_eq!(whole.matches("\n\n").count(), 31);
    }

    #[test]
    fn test_comparison_fetch_and_stale_guard() {
        let mut app = loaded_app();
        let effects = press(&mut app, "c");
        let [Effect::FetchParallel(request)] = effects.as_slice() else {
            panic!("expected parallel fetch");
        };
        assert_eq!(app.screen, Screen::Comparison { offset: 0 });
        assert_eq!(request.translations, vec!["NLT", "KJV"]);
        assert_eq!(request.verses, (1..=31).collect::<Vec<_>>());

        let data = ParallelChapter {
            columns: vec![
                ("NLT".into(), sample_verses(1, 1, 31)),
                ("KJV".into(), sample_verses(1, 1, 31)),
            ],
        };
        update(
            &mut app,
            Action::ParallelLoaded {
                token: request.token + 1,
                chapter: data.clone(),
            },
        );
        assert!(app.comparison.is_none());
        update(
            &mut app,
            Action::ParallelLoaded {
                token: request.token,
                chapter: data,
            },
        );
        assert!(app.comparison.is_some());
        assert!(app.comparison_lines().len() > 20);

        press(&mut app, "jj");
        assert_eq!(app.screen, Screen::Comparison { offset: 2 });
        update(&mut app, Action::Scroll(-WHEEL_LINES));
        assert_eq!(app.screen, Screen::Comparison { offset: 0 });
        press(&mut app, "r");
        assert_eq!(app.screen, Screen::reader());
    }

    #[test]
    fn test_comparison_failure_and_loading_guard() {
        let mut app = loaded_app();
        let effects = press(&mut app, "c");
        let [Effect::FetchParallel(request)] = effects.as_slice() else {
            panic!("expected parallel fetch");
        };
        update(
            &mut app,
            Action::ParallelFailed {
                token: request.token + 1,
                message: "stale".into(),
            },
        );
        assert!(app.error.is_none());
        assert!(app.pending_parallel.is_some());

        update(
            &mut app,
            Action::ParallelFailed {
                token: request.token,
                message: "API error (502): bad gateway".into(),
            },
        );
        assert_eq!(app.error.as_deref(), Some("API error (502): bad gateway"));
        assert!(app.pending_parallel.is_none());

        // No comparison of the old chapter while the next one is loading.
        press(&mut app, "r");
        only_chapter_request(&press(&mut app, "n"));
        assert!(press(&mut app, "c").is_empty());
        assert_eq!(app.screen, Screen::reader());
        assert!(app.pending_parallel.is_none());
    }

    #[test]
    fn test_request_failed_sets_banner() {
        let mut app = loaded_app();
        update(&mut app, Action::RequestFailed("network error: offline".into()));
        assert_eq!(app.error.as_deref(), Some("network error: offline"));
        assert_eq!(app.reading.chapter, 1);
        assert_eq!(app.screen, Screen::reader());
    }

    #[test]
    fn test_translation_switch() {
        let mut app = loaded_app();
        update(
            &mut app,
            Action::TranslationsLoaded(vec![translation("NLT"), translation("KJV")]),
        );
        press(&mut app, "t");
        assert_eq!(app.screen, Screen::TranslationSelect { selected: 0 });
        press(&mut app, "j");
        let effects = key(&mut app, Key::Enter);
        assert_eq!(app.translation, "KJV");
        assert_eq!(
            effects[0],
            Effect::FetchBooks {
                translation: "KJV".into()
            }
        );
        assert!(matches!(&effects[1], Effect::FetchChapter(r) if r.translation == "KJV" && r.chapter == 1));
        assert_eq!(effects[2], Effect::SaveSettings);

        // A late book list for the old translation is dropped.
        update(
            &mut app,
            Action::BooksLoaded {
                translation: "NLT".into(),
                books: Vec::new(),
            },
        );
        assert_eq!(app.books.len(), 10);
    }

    #[test]
    fn test_theme_select() {
        let mut app = loaded_app();
        press(&mut app, "T");
        assert_eq!(app.screen, Screen::ThemeSelect { selected: 0 });
        press(&mut app, "jj");
        assert_eq!(key(&mut app, Key::Enter), vec![Effect::SaveSettings]);
        assert_eq!(app.theme, ThemeId::Dracula);
        assert_eq!(app.screen, Screen::reader());
    }

    #[test]
    fn test_cache_manager_download_and_remove() {
        let mut app = loaded_app();
        update(
            &mut app,
            Action::TranslationsLoaded(vec![translation("NLT"), translation("KJV")]),
        );
        assert_eq!(press(&mut app, "d"), vec![Effect::ListCached]);
        assert_eq!(
            key(&mut app, Key::Enter),
            vec![Effect::DownloadTranslation("NLT".into())]
        );
        assert_eq!(app.downloading.as_deref(), Some("NLT"));
        press(&mut app, "j");
        assert!(key(&mut app, Key::Enter).is_empty());

        let effects = update(
            &mut app,
            Action::DownloadFinished {
                translation: "NLT".into(),
                error: None,
            },
        );
        assert_eq!(effects, vec![Effect::ListCached]);
        update(
            &mut app,
            Action::CacheListed {
                translations: vec!["NLT".into()],
                size_bytes: 4096,
            },
        );
        assert!(app.is_cached("nlt"));

        press(&mut app, "k");
        assert_eq!(press(&mut app, "x"), vec![Effect::RemoveTranslation("NLT".into())]);
        press(&mut app, "j");
        assert!(press(&mut app, "x").is_empty());

        update(
            &mut app,
            Action::DownloadFinished {
                translation: "KJV".into(),
                error: Some("404".into()),
            },
        );
        assert_eq!(app.error.as_deref(), Some("Download of KJV failed: 404"));
    }

    #[test]
    fn test_resize_keeps_highlight_in_view() {
        let mut app = loaded_app();
        search(&mut app, "Gen 1:20");
        update(&mut app, Action::Resize { width: 40, height: 10 });
        assert_eq!(app.viewport.offset, app.verse_map().offset_for_verse(20, 10));
        assert!(app.viewport.offset > 0);
    }

    #[test]
    fn test_about_and_return() {
        let mut app = loaded_app();
        press(&mut app, "?");
        assert_eq!(app.screen, Screen::About);
        key(&mut app, Key::Esc);
        assert_eq!(app.screen, Screen::reader());
    }
}
