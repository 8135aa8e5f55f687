//! # Scripture View
//!
//! Scrollable text area for both the chapter reader and the comparison view.
//! The core already laid the text out into [`RenderedLine`]s; this component
//! only styles them by kind and hands them to a `tui_scrollview::ScrollView`.
//!
//! The scroll offset is owned by the core (`Viewport::offset` or the
//! comparison offset) and copied into the `ScrollViewState` every frame, so
//! the highlight/scroll bookkeeping never drifts from what is on screen.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::layout::{LineKind, RenderedLine};
use crate::tui::component::Component;
use crate::tui::theme::Palette;

/// Marker drawn in the gutter of highlighted verses.
const HIGHLIGHT_BAR: char = '▌';

pub struct ScriptureView<'a> {
    pub lines: &'a [RenderedLine],
    pub offset: usize,
    pub state: &'a mut ScrollViewState,
    /// Shown centred when there are no lines.
    pub placeholder: &'a str,
    pub palette: Palette,
}

impl ScriptureView<'_> {
    fn styled_line(&self, line: &RenderedLine) -> Line<'static> {
        let p = self.palette;
        match line.kind {
            LineKind::VerseNumber { highlighted, .. } => {
                if highlighted {
                    Line::from(Span::styled(
                        with_bar(&line.text),
                        Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::styled(line.text.clone(), Style::default().fg(p.secondary)))
                }
            }
            LineKind::Body { highlighted, .. } => {
                if highlighted {
                    Line::from(vec![
                        Span::styled(HIGHLIGHT_BAR.to_string(), Style::default().fg(p.accent)),
                        Span::styled(
                            line.text.chars().skip(1).collect::<String>(),
                            Style::default().fg(p.primary).bg(p.highlight),
                        ),
                    ])
                } else {
                    Line::from(Span::styled(line.text.clone(), p.text()))
                }
            }
            LineKind::Heading => Line::from(Span::styled(
                line.text.clone(),
                Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
            )),
            LineKind::Rule => Line::from(Span::styled(line.text.clone(), p.border(false))),
            LineKind::Labeled { label_len } => {
                let (label, rest) = line.text.split_at(label_len.min(line.text.len()));
                Line::from(vec![
                    Span::styled(
                        label.to_string(),
                        Style::default().fg(p.border_active).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(rest.to_string(), p.text()),
                ])
            }
            LineKind::Continuation => Line::from(Span::styled(line.text.clone(), p.text())),
            LineKind::Separator => Line::default(),
        }
    }
}

/// Swaps the first (blank) column for the highlight bar.
fn with_bar(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 3);
    out.push(HIGHLIGHT_BAR);
    out.extend(text.chars().skip(1));
    out
}

impl Component for ScriptureView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.lines.is_empty() {
            let y = area.y + area.height / 2;
            let row = Rect::new(area.x, y.min(area.bottom().saturating_sub(1)), area.width, 1);
            frame.render_widget(
                Paragraph::new(self.placeholder)
                    .style(self.palette.dim())
                    .alignment(Alignment::Center),
                row,
            );
            return;
        }

        // One column goes to the scrollbar; the core lays out at this width too.
        let content_width = area.width.saturating_sub(1);
        let height = u16::try_from(self.lines.len()).unwrap_or(u16::MAX);
        let styled: Vec<Line> = self.lines.iter().map(|l| self.styled_line(l)).collect();

        let mut scroll_view = ScrollView::new(Size::new(content_width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(Paragraph::new(styled), Rect::new(0, 0, content_width, height));

        let y = u16::try_from(self.offset).unwrap_or(u16::MAX);
        self.state.set_offset(Position { x: 0, y });
        frame.render_stateful_widget(scroll_view, area, self.state);
    }
}
