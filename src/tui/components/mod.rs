//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components are stateless and props-based: they borrow what they show from
//! `App` for one frame, render, and are dropped. Presentation state that must
//! survive between frames (scroll view state) lives in `TuiState`.
//!
//! ```rust,ignore
//! // Dependencies are explicit
//! TitleBar::from_app(&app, palette).render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file + shared helpers)
//! ├── title_bar.rs     (translation, position, offline/loading badges)
//! ├── status_bar.rs    (key help, status message, error line)
//! ├── reader.rs        (scrollable chapter and comparison text)
//! ├── sidebar.rs       (book list overlay)
//! ├── miller.rs        (book → chapter → verse picker overlay)
//! ├── search_box.rs    (reference input)
//! ├── list_picker.rs   (translations, themes, cache manager)
//! └── about.rs
//! ```

pub mod about;
pub mod list_picker;
pub mod miller;
pub mod reader;
pub mod search_box;
pub mod sidebar;
pub mod status_bar;
pub mod title_bar;

pub use about::About;
pub use list_picker::{ListPicker, PickerRow};
pub use miller::MillerView;
pub use reader::ScriptureView;
pub use search_box::SearchBox;
pub use sidebar::Sidebar;
pub use status_bar::StatusBar;
pub use title_bar::TitleBar;

use ratatui::layout::{Constraint, Layout, Rect};
use unicode_width::UnicodeWidthChar;

/// Truncate a string to fit within `max_width` columns, adding "…" if needed.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().filter_map(UnicodeWidthChar::width).sum();
    if width <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

/// "↑ N more" / "↓ N more" labels for a window `[start, end)` over `len` rows.
pub fn more_indicators(start: usize, end: usize, len: usize) -> (Option<String>, Option<String>) {
    let above = (start > 0).then(|| format!("↑ {start} more"));
    let below = (end < len).then(|| format!("↓ {} more", len - end));
    (above, below)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("Genesis", 10), "Genesis");
        assert_eq!(truncate_str("Song of Solomon", 8), "Song of…");
        assert_eq!(truncate_str("abc", 0), "");
    }

    #[test]
    fn test_more_indicators() {
        assert_eq!(more_indicators(0, 5, 5), (None, None));
        assert_eq!(
            more_indicators(3, 8, 10),
            (Some("↑ 3 more".into()), Some("↓ 2 more".into()))
        );
    }
}
