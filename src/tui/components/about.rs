//! # About Screen
//!
//! Name, version, data source and the full key reference, centred in the body.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::theme::Palette;

const SHORTCUTS: &[(&str, &str)] = &[
    ("j / k", "next / previous verse"),
    ("n / p", "next / previous chapter"),
    ("^d / ^u", "half page down / up"),
    ("/", "go to a reference"),
    ("v", "book, chapter and verse picker"),
    ("[", "book list"),
    ("c", "compare translations"),
    ("y / Y", "copy verse / chapter"),
    ("t", "translations"),
    ("T", "themes"),
    ("d", "offline downloads"),
    ("x", "remove a download"),
    ("?", "this screen"),
    ("r / esc", "back to the reader"),
    ("q", "quit"),
];

pub struct About {
    pub palette: Palette,
}

impl Component for About {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let p = self.palette;
        let mut lines = vec![
            Line::from(Span::styled(
                "Lectern",
                p.text().fg(p.accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format!("v{}", env!("CARGO_PKG_VERSION")), p.dim())),
            Line::from(Span::styled("Scripture text from bolls.life", p.dim())),
            Line::default(),
        ];
        lines.extend(SHORTCUTS.iter().map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{keys:>8}  "), p.text().fg(p.border_active)),
                Span::styled(format!("{what:<32}"), p.text()),
            ])
        }));

        let [centered] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), centered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::ThemeId;
    use crate::tui::components::test_helpers::render_rows;
    use crate::tui::theme::palette;

    #[test]
    fn test_about_lists_version_and_keys() {
        let rows = render_rows(70, 24, |f| {
            About {
                palette: palette(ThemeId::default()),
            }
            .render(f, f.area())
        });
        let text = rows.join("\n");
        assert!(text.contains("Lectern"));
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
        assert!(text.contains("bolls.life"));
        assert!(text.contains("compare translations"));
    }
}
