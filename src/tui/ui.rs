use crate::core::action::miller_verses;
use crate::core::layout::render_chapter;
use crate::core::state::{App, Overlay, Screen};
use crate::core::theme::ThemeId;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::status_bar::{STATUS_BAR_HEIGHT, help_text};
use crate::tui::components::{
    About, ListPicker, MillerView, PickerRow, ScriptureView, SearchBox, Sidebar, StatusBar,
    TitleBar,
};
use crate::tui::theme::{Palette, palette};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

const HEADER_HEIGHT: u16 = 2;

/// Splits the terminal into header, body and status bar.
pub fn layout(area: Rect) -> [Rect; 3] {
    use Constraint::{Length, Min};
    Layout::vertical([Length(HEADER_HEIGHT), Min(0), Length(STATUS_BAR_HEIGHT)]).areas(area)
}

/// Text area the core lays verses out in for a terminal of this size. One
/// column is kept for the scrollbar.
pub fn viewport_size(width: u16, height: u16) -> (u16, u16) {
    let [_, body, _] = layout(Rect::new(0, 0, width, height));
    (body.width.saturating_sub(1), body.height)
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let p = palette(app.theme);
    let [header_area, body_area, status_area] = layout(frame.area());

    TitleBar::from_app(app, p).render(frame, header_area);

    match &app.screen {
        Screen::Comparison { offset } => {
            let lines = app.comparison_lines();
            let placeholder = if app.pending_parallel.is_some() {
                "Loading comparison…"
            } else {
                "No verses to compare"
            };
            ScriptureView {
                lines: &lines,
                offset: *offset,
                state: &mut tui.comparison_scroll,
                placeholder,
                palette: p,
            }
            .render(frame, body_area);
        }
        Screen::About => About { palette: p }.render(frame, body_area),
        screen => {
            draw_reader(frame, body_area, app, tui, p);
            draw_overlay(frame, body_area, app, screen, p);
        }
    }

    StatusBar {
        help: help_text(&app.screen),
        status: &app.status_message,
        error: app.error.as_deref(),
        palette: p,
    }
    .render(frame, status_area);
}

fn draw_reader(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState, p: Palette) {
    let lines = render_chapter(&app.reading.verses, app.viewport.width, app.highlight);
    let placeholder = if app.pending.is_some() {
        "Loading…"
    } else {
        "Nothing to show"
    };
    ScriptureView {
        lines: &lines,
        offset: app.viewport.offset,
        state: &mut tui.reader_scroll,
        placeholder,
        palette: p,
    }
    .render(frame, area);
}

/// Whatever sits on top of the reader for this screen.
fn draw_overlay(frame: &mut Frame, area: Rect, app: &App, screen: &Screen, p: Palette) {
    match screen {
        Screen::Reader(Overlay::None) | Screen::Comparison { .. } | Screen::About => {}
        Screen::Reader(Overlay::Sidebar { selected }) => Sidebar {
            books: &app.books,
            selected: *selected,
            current_book: app.reading.book_id,
            palette: p,
        }
        .render(frame, area),
        Screen::Reader(Overlay::Miller(state)) => MillerView {
            state,
            books: &app.books,
            verses: miller_verses(&app.books, &app.reading, state),
            loading: app.pending.is_some(),
            palette: p,
        }
        .render(frame, area),
        Screen::Search { input } => SearchBox { input, palette: p }.render(frame, area),
        Screen::TranslationSelect { selected } => ListPicker {
            title: "Translations",
            rows: translation_rows(app),
            selected: *selected,
            help: "j/k move  enter select  esc back",
            empty_message: "Loading translations…",
            palette: p,
        }
        .render(frame, area),
        Screen::ThemeSelect { selected } => ListPicker {
            title: "Themes",
            rows: theme_rows(app.theme, p),
            selected: *selected,
            help: "j/k move  enter select  esc back",
            empty_message: "",
            palette: p,
        }
        .render(frame, area),
        Screen::CacheManager { selected } => {
            let title = format!("Offline cache · {}", format_size(app.cache_size));
            ListPicker {
                title: &title,
                rows: cache_rows(app, p),
                selected: *selected,
                help: "enter download  x remove  esc back",
                empty_message: "Loading translations…",
                palette: p,
            }
            .render(frame, area)
        }
    }
}

fn translation_rows(app: &App) -> Vec<PickerRow> {
    let p = palette(app.theme);
    app.translations
        .iter()
        .map(|t| {
            let mut detail = t.full_name.clone();
            if let Some(date) = t
                .updated
                .and_then(chrono::DateTime::from_timestamp_millis)
            {
                detail.push_str(&format!("  ({})", date.format("%Y-%m-%d")));
            }
            let current = t.short_name.eq_ignore_ascii_case(&app.translation);
            PickerRow::new(format!("{:<8}", t.short_name))
                .detail(detail)
                .marker(if current { "*" } else { " " }, p.accent)
        })
        .collect()
}

fn theme_rows(current: ThemeId, p: Palette) -> Vec<PickerRow> {
    ThemeId::ALL
        .iter()
        .map(|theme| {
            PickerRow::new(theme.name()).marker(if *theme == current { "*" } else { " " }, p.accent)
        })
        .collect()
}

fn cache_rows(app: &App, p: Palette) -> Vec<PickerRow> {
    app.translations
        .iter()
        .map(|t| {
            let (marker, color) = if app.downloading.as_deref() == Some(t.short_name.as_str()) {
                ("[Downloading...]", p.warning)
            } else if app.is_cached(&t.short_name) {
                ("[✓]", p.success)
            } else {
                ("[ ]", p.muted)
            };
            PickerRow::new(format!("{:<8}", t.short_name))
                .detail(t.full_name.clone())
                .marker(marker, color)
        })
        .collect()
}

fn format_size(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bible::Translation;
    use crate::core::action::{Action, Key, update};
    use crate::test_support::loaded_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen_text(app: &App, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut tui = TuiState::default();
        terminal.draw(|f| draw_ui(f, app, &mut tui)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol().to_string()).collect())
            .collect()
    }

    fn translations() -> Vec<Translation> {
        vec![
            Translation {
                short_name: "KJV".into(),
                full_name: "King James Version".into(),
                updated: Some(1_680_307_200_000),
                dir: None,
            },
            Translation {
                short_name: "NLT".into(),
                full_name: "New Living Translation".into(),
                updated: None,
                dir: None,
            },
        ]
    }

    #[test]
    fn test_viewport_size_leaves_room_for_chrome() {
        assert_eq!(viewport_size(80, 25), (79, 20));
        assert_eq!(viewport_size(40, 10), (39, 5));
    }

    #[test]
    fn test_reader_frame() {
        let app = loaded_app();
        let rows = screen_text(&app, 80, 25);
        assert!(rows[0].contains("Genesis 1:1"));
        assert!(rows.iter().any(|r| r.contains("Verse 1 of chapter 1")));
        assert!(rows[22].contains("j/k verse"));
        assert!(rows[23].contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_error_line_shown() {
        let mut app = loaded_app();
        app.error = Some("network error: offline".into());
        let rows = screen_text(&app, 80, 25);
        assert!(rows[24].contains("✗ network error: offline"));
    }

    #[test]
    fn test_sidebar_overlay() {
        let mut app = loaded_app();
        update(&mut app, Action::Key(Key::Char('[')));
        let text = screen_text(&app, 80, 25).join("\n");
        assert!(text.contains("Books"));
        assert!(text.contains("OLD TESTAMENT"));
    }

    #[test]
    fn test_translation_picker_rows() {
        let mut app = loaded_app();
        app.translations = translations();
        let rows = translation_rows(&app);
        assert_eq!(rows[0].detail.as_deref(), Some("King James Version  (2023-04-01)"));
        assert_eq!(rows[1].marker.as_ref().map(|m| m.0.as_str()), Some("*"));

        update(&mut app, Action::Key(Key::Char('t')));
        let text = screen_text(&app, 100, 30).join("\n");
        assert!(text.contains("Translations"));
        assert!(text.contains("New Living Translation"));
    }

    #[test]
    fn test_cache_rows_show_status() {
        let mut app = loaded_app();
        app.translations = translations();
        app.cached = vec!["KJV".into()];
        app.downloading = Some("NLT".into());
        let rows = cache_rows(&app, palette(app.theme));
        assert_eq!(rows[0].marker.as_ref().map(|m| m.0.as_str()), Some("[✓]"));
        assert_eq!(rows[1].marker.as_ref().map(|m| m.0.as_str()), Some("[Downloading...]"));
        assert_eq!(format_size(3 * 1024 * 1024 / 2), "1.5 MB");
    }

    #[test]
    fn test_about_screen() {
        let mut app = loaded_app();
        update(&mut app, Action::Key(Key::Char('?')));
        let text = screen_text(&app, 80, 30).join("\n");
        assert!(text.contains("bolls.life"));
        assert!(text.contains("r/esc back"));
    }
}
