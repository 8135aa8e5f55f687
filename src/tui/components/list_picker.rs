//! # List Picker Component
//!
//! Centred overlay for the translation, theme and cache-manager screens. The
//! caller turns its data into [`PickerRow`]s; the picker only windows and
//! styles them.
//!
//! ```text
//! ┌ Translations ───────────────────────────┐
//! │ ↑ 4 more                                │
//! │ KJV   King James Version  2023-04-01    │
//! │ NLT   New Living Translation  *         │
//! │ ↓ 12 more                               │
//! └──────── j/k move  enter select ─────────┘
//! ```

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Color;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph};

use crate::core::window::visible_window;
use crate::tui::component::Component;
use crate::tui::components::{centered_rect, more_indicators, truncate_str};
use crate::tui::theme::Palette;

#[derive(Debug, Clone, PartialEq)]
pub struct PickerRow {
    pub label: String,
    pub detail: Option<String>,
    /// Short coloured tag drawn before the label, e.g. a cache status.
    pub marker: Option<(String, Color)>,
}

impl PickerRow {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: None,
            marker: None,
        }
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn marker(mut self, marker: impl Into<String>, color: Color) -> Self {
        self.marker = Some((marker.into(), color));
        self
    }
}

pub struct ListPicker<'a> {
    pub title: &'a str,
    pub rows: Vec<PickerRow>,
    pub selected: usize,
    pub help: &'a str,
    pub empty_message: &'a str,
    pub palette: Palette,
}

impl ListPicker<'_> {
    fn item(&self, row: &PickerRow, is_selected: bool, width: usize) -> ListItem<'static> {
        let p = self.palette;
        let style = if is_selected { p.selected() } else { p.text() };
        let mut spans = Vec::new();
        let mut used = 0;
        if let Some((marker, color)) = &row.marker {
            let marker = format!("{marker} ");
            used += marker.chars().count();
            let marker_style = if is_selected { style } else { p.text().fg(*color) };
            spans.push(Span::styled(marker, marker_style));
        }
        let label = truncate_str(&row.label, width.saturating_sub(used));
        used += label.chars().count();
        spans.push(Span::styled(label, style));
        if let Some(detail) = &row.detail {
            let detail = truncate_str(&format!("  {detail}"), width.saturating_sub(used));
            spans.push(Span::styled(detail, if is_selected { style } else { p.dim() }));
        }
        ListItem::new(Line::from(spans))
    }
}

impl Component for ListPicker<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let p = self.palette;
        let overlay = centered_rect(70, 70, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(p.border(true))
            .title(Span::styled(format!(" {} ", self.title), p.text().fg(p.accent)))
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(Span::styled(format!(" {} ", self.help), p.dim())).centered())
            .padding(Padding::horizontal(1));

        if self.rows.is_empty() {
            let empty = Paragraph::new(self.empty_message)
                .style(p.dim())
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, overlay);
            return;
        }

        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let window_size = (inner.height as usize).saturating_sub(2);
        let (visible, start, end) = visible_window(&self.rows, self.selected, window_size);
        let (above, below) = more_indicators(start, end, self.rows.len());
        let width = inner.width as usize;

        let mut items = vec![ListItem::new(Span::styled(above.unwrap_or_default(), p.dim()))];
        items.extend(
            visible
                .iter()
                .enumerate()
                .map(|(i, row)| self.item(row, start + i == self.selected, width)),
        );
        items.push(ListItem::new(Span::styled(below.unwrap_or_default(), p.dim())));
        frame.render_widget(List::new(items), inner);
    }
}
