use ratatui::Frame;
use ratatui::layout::Rect;

/// A reusable UI component.
///
/// Components follow a props pattern:
/// - They borrow what they show from `App` through struct fields.
/// - Presentation state that must outlive a frame (scroll view state) is
///   passed in as `&mut` and owned by `TuiState`.
/// - They render to a `Frame` within a given `Rect`.
///
/// `render` takes `&mut self` so stateful widgets can update that state
/// during the render pass, mirroring Ratatui's `StatefulWidget`.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}
