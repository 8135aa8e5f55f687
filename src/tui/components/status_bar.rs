//! Bottom bar: key help, the last status message, and the error line.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::{Overlay, Screen};
use crate::tui::component::Component;
use crate::tui::theme::Palette;

pub const STATUS_BAR_HEIGHT: u16 = 3;

/// Key help for whatever currently has focus.
pub fn help_text(screen: &Screen) -> &'static str {
    match screen {
        Screen::Reader(Overlay::None) => {
            "j/k verse  n/p chapter  / search  v picker  [ books  c compare  y yank  t translation  T theme  d cache  ? about  q quit"
        }
        Screen::Reader(Overlay::Sidebar { .. }) => "j/k move  enter open  / search  [/esc close",
        Screen::Reader(Overlay::Miller(m)) if m.filtering => {
            "type to filter  backspace delete  enter/esc done"
        }
        Screen::Reader(Overlay::Miller(_)) => "h/l column  j/k move  / filter  enter go  v/esc close",
        Screen::Search { .. } => "enter go  esc cancel",
        Screen::Comparison { .. } => "j/k scroll  ctrl+d/u half page  r/esc back",
        Screen::TranslationSelect { .. } | Screen::ThemeSelect { .. } => {
            "j/k move  enter select  r/esc back"
        }
        Screen::CacheManager { .. } => "j/k move  enter download  x remove  r/esc back",
        Screen::About => "r/esc back",
    }
}

pub struct StatusBar<'a> {
    pub help: &'a str,
    pub status: &'a str,
    pub error: Option<&'a str>,
    pub palette: Palette,
}

impl Component for StatusBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [help_area, status_area, error_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);
        let p = self.palette;

        frame.render_widget(
            Paragraph::new(format!(" {}", self.help)).style(p.dim()),
            help_area,
        );

        let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
        let [message_area, version_area] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(version.len() as u16),
        ])
        .areas(status_area);
        frame.render_widget(
            Paragraph::new(format!(" {}", self.status)).style(p.text().fg(p.secondary)),
            message_area,
        );
        frame.render_widget(Paragraph::new(version).style(p.dim()), version_area);

        if let Some(error) = self.error {
            let line = Line::from(vec![
                Span::styled(" ✗ ", p.text().fg(p.error)),
                Span::styled(error.to_string(), p.text().fg(p.error)),
            ]);
            frame.render_widget(Paragraph::new(line), error_area);
        }
    }
}
