//! Miller-column picker overlay: books, chapters of the selected book, and
//! verses of the selected chapter, side by side.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::bible::{Book, Verse};
use crate::core::miller::{Column, MillerState};
use crate::core::text::strip_markup;
use crate::core::window::visible_window;
use crate::tui::component::Component;
use crate::tui::components::{more_indicators, truncate_str};
use crate::tui::theme::Palette;

const BOOKS_WIDTH: u16 = 24;
const CHAPTERS_WIDTH: u16 = 12;

pub struct MillerView<'a> {
    pub state: &'a MillerState,
    pub books: &'a [Book],
    /// Verses of the selected chapter, empty while they are not loaded.
    pub verses: &'a [Verse],
    pub loading: bool,
    pub palette: Palette,
}

impl MillerView<'_> {
    fn title(&self, name: &str, column: Column) -> String {
        let s = self.state;
        if s.filter_column == column && (s.filtering || !s.filter.is_empty()) {
            let cursor = if s.filtering { "█" } else { "" };
            format!(" {name} /{}{cursor} ", s.filter)
        } else {
            format!(" {name} ")
        }
    }

    fn render_column(
        &self,
        frame: &mut Frame,
        area: Rect,
        column: Column,
        labels: &[String],
        selected: usize,
    ) {
        let p = self.palette;
        let active = self.state.column == column;
        let name = match column {
            Column::Books => "Books",
            Column::Chapters => "Chapters",
            Column::Verses => "Verses",
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(p.border(active))
            .title(Span::styled(self.title(name, column), p.border(active)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if labels.is_empty() {
            if column == Column::Verses && self.loading {
                frame.render_widget(Paragraph::new(" Loading…").style(p.dim()), inner);
            }
            return;
        }

        let window_size = (inner.height as usize).saturating_sub(2);
        let (visible, start, end) = visible_window(labels, selected, window_size);
        let (above, below) = more_indicators(start, end, labels.len());
        let width = inner.width as usize;

        let mut lines = vec![Line::from(Span::styled(above.unwrap_or_default(), p.dim()))];
        lines.extend(visible.iter().enumerate().map(|(i, label)| {
            let style = if start + i == selected {
                if active { p.selected() } else { p.text().fg(p.accent) }
            } else {
                p.text()
            };
            Line::from(Span::styled(truncate_str(label, width), style))
        }));
        lines.push(Line::from(Span::styled(below.unwrap_or_default(), p.dim())));
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for MillerView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);
        let [books_area, chapters_area, verses_area] = Layout::horizontal([
            Constraint::Length(BOOKS_WIDTH),
            Constraint::Length(CHAPTERS_WIDTH),
            Constraint::Fill(1),
        ])
        .areas(area);

        let books: Vec<String> = self
            .state
            .visible_books(self.books)
            .into_iter()
            .map(|b| format!(" {}", b.name))
            .collect();
        let chapters: Vec<String> = self
            .state
            .visible_chapters(self.books)
            .into_iter()
            .map(|n| format!(" {n}"))
            .collect();
        let verses: Vec<String> = self
            .state
            .visible_verses(self.verses)
            .into_iter()
            .map(|v| format!("{:>3} {}", v.number, strip_markup(&v.text)))
            .collect();

        let s = self.state;
        self.render_column(frame, books_area, Column::Books, &books, s.book_index);
        self.render_column(frame, chapters_area, Column::Chapters, &chapters, s.chapter_index);
        self.render_column(frame, verses_area, Column::Verses, &verses, s.verse_index);
    }
}
