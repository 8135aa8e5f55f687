//! Book list overlay on the left edge of the reader, split into the two
//! testaments and windowed around the selection.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::bible::{Book, Division};
use crate::core::window::visible_window;
use crate::tui::component::Component;
use crate::tui::components::{more_indicators, truncate_str};
use crate::tui::theme::Palette;

const SIDEBAR_WIDTH: u16 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Header(Division),
    Book(usize),
}

pub struct Sidebar<'a> {
    pub books: &'a [Book],
    pub selected: usize,
    pub current_book: u32,
    pub palette: Palette,
}

impl Sidebar<'_> {
    fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.books.len() + 2);
        let mut division = None;
        for (i, book) in self.books.iter().enumerate() {
            if division != Some(book.division()) {
                division = Some(book.division());
                rows.push(Row::Header(book.division()));
            }
            rows.push(Row::Book(i));
        }
        rows
    }
}

impl Component for Sidebar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = Rect::new(area.x, area.y, SIDEBAR_WIDTH.min(area.width), area.height);
        frame.render_widget(Clear, overlay);
        let p = self.palette;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(p.border(true))
            .title(" Books ")
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        if self.books.is_empty() {
            frame.render_widget(Paragraph::new("Loading…").style(p.dim()), inner);
            return;
        }

        let rows = self.rows();
        let selected_row = rows
            .iter()
            .position(|r| *r == Row::Book(self.selected))
            .unwrap_or(0);
        // Top and bottom lines are reserved for the "more" indicators.
        let window_size = (inner.height as usize).saturating_sub(2);
        let (visible, start, end) = visible_window(&rows, selected_row, window_size);
        let (above, below) = more_indicators(start, end, rows.len());
        let name_width = inner.width as usize;

        let mut lines = vec![Line::from(Span::styled(above.unwrap_or_default(), p.dim()))];
        for row in visible {
            lines.push(match *row {
                Row::Header(division) => Line::from(Span::styled(
                    division.label(),
                    p.text().fg(p.secondary).add_modifier(Modifier::BOLD),
                )),
                Row::Book(i) => {
                    let book = &self.books[i];
                    let name = truncate_str(&format!(" {}", book.name), name_width);
                    let style = if i == self.selected {
                        p.selected()
                    } else if book.id == self.current_book {
                        p.text().fg(p.border_active)
                    } else {
                        p.text()
                    };
                    Line::from(Span::styled(name, style))
                }
            });
        }
        lines.push(Line::from(Span::styled(below.unwrap_or_default(), p.dim())));
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
