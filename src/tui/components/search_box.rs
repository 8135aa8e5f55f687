use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::component::Component;
use crate::tui::theme::Palette;

pub const SEARCH_BOX_HEIGHT: u16 = 3;

/// Reference input drawn across the top of the body.
pub struct SearchBox<'a> {
    pub input: &'a str,
    pub palette: Palette,
}

impl Component for SearchBox<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let p = self.palette;
        let area = Rect {
            height: SEARCH_BOX_HEIGHT.min(area.height),
            ..area
        };
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(p.border(true))
            .title(" Go to ")
            .title_bottom(Line::from(Span::styled(" e.g. John 3:16, Gen 1:1-5, 43 3 ", p.dim())));
        let line = Line::from(vec![
            Span::styled(format!(" {}", self.input), p.text()),
            Span::styled("█", p.text().fg(p.accent)),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}
