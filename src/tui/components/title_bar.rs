//! # TitleBar Component
//!
//! Two-line header: where you are, and what the app is doing.
//!
//! ```text
//!  Lectern │ NLT │ John 3:16 │ [Offline] │ Loading…
//! ────────────────────────────────────────────────────
//! ```
//!
//! Stateless: all props are borrowed from `App` for one frame.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::{App, Highlight, Screen};
use crate::tui::component::Component;
use crate::tui::theme::Palette;

pub struct TitleBar<'a> {
    pub translation: &'a str,
    pub book_name: &'a str,
    pub chapter: u32,
    pub highlight: Highlight,
    /// The active translation is in the offline cache.
    pub offline: bool,
    pub loading: bool,
    /// Extra label for non-reader screens, e.g. "Compare NLT · KJV".
    pub context: Option<String>,
    pub palette: Palette,
}

impl<'a> TitleBar<'a> {
    pub fn from_app(app: &'a App, palette: Palette) -> Self {
        let context = match app.screen {
            Screen::Comparison { .. } => {
                Some(format!("Compare {}", app.comparison_translations.join(" · ")))
            }
            _ => None,
        };
        Self {
            translation: &app.translation,
            book_name: &app.reading.book_name,
            chapter: app.reading.chapter,
            highlight: app.highlight,
            offline: app.is_cached(&app.translation),
            loading: app.is_loading(),
            context,
            palette,
        }
    }

    /// "John 3", "John 3:16" or "John 3:16-18".
    pub fn reference(&self) -> String {
        let h = self.highlight;
        match (h.is_active(), h.start == h.end) {
            (false, _) => format!("{} {}", self.book_name, self.chapter),
            (true, true) => format!("{} {}:{}", self.book_name, self.chapter, h.start),
            (true, false) => format!("{} {}:{}-{}", self.book_name, self.chapter, h.start, h.end),
        }
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [title_area, rule_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);
        let p = self.palette;
        let sep = Span::styled(" │ ", p.dim());

        let mut spans = vec![
            Span::styled(" Lectern", p.text().fg(p.accent).add_modifier(Modifier::BOLD)),
            sep.clone(),
            Span::styled(self.translation.to_string(), p.text().fg(p.border_active)),
            sep.clone(),
            Span::styled(self.reference(), p.text().add_modifier(Modifier::BOLD)),
        ];
        if let Some(context) = &self.context {
            spans.push(sep.clone());
            spans.push(Span::styled(context.clone(), p.text().fg(p.secondary)));
        }
        if self.offline {
            spans.push(sep.clone());
            spans.push(Span::styled("[Offline]", p.text().fg(p.success)));
        }
        if self.loading {
            spans.push(sep);
            spans.push(Span::styled("Loading…", p.text().fg(p.warning)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), title_area);

        let rule = "─".repeat(rule_area.width as usize);
        frame.render_widget(Paragraph::new(rule).style(p.border(false)), rule_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::ThemeId;
    use crate::test_support::loaded_app;
    use crate::tui::components::test_helpers::render_rows;
    use crate::tui::theme::palette;

    #[test]
    fn test_reference_formats() {
        let app = loaded_app();
        let mut bar = TitleBar::from_app(&app, palette(ThemeId::default()));
        assert_eq!(bar.reference(), "Genesis 1:1");
        bar.highlight = Highlight::range(3, 5);
        assert_eq!(bar.reference(), "Genesis 1:3-5");
        bar.highlight = Highlight::NONE;
        assert_eq!(bar.reference(), "Genesis 1");
    }

    #[test]
    fn test_badges() {
        let mut app = loaded_app();
        app.cached = vec!["NLT".into()];
        let rows = render_rows(80, 2, |f| {
            TitleBar::from_app(&app, palette(ThemeId::default())).render(f, f.area())
        });
        assert!(rows[0].contains("Lectern"));
        assert!(rows[0].contains("NLT"));
        assert!(rows[0].contains("[Offline]"));
        assert!(!rows[0].contains("Loading"));
        assert!(rows[1].starts_with("────"));

        app.request_chapter(1, 2, None);
        let rows = render_rows(80, 2, |f| {
            TitleBar::from_app(&app, palette(ThemeId::default())).render(f, f.area())
        });
        assert!(rows[0].contains("Loading…"));
    }
}
