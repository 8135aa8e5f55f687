//! Windowed ("virtual scroll") slices of long lists.
//!
//! Shared by the miller columns, the book sidebar and the list pickers: only a
//! fixed number of rows is drawn, centred on the selection and clamped to the
//! list bounds.

/// Returns the visible slice plus its `[start, end)` bounds in `items`.
///
/// The window is centred on `selected` where possible; near either end it is
/// pinned so it always holds `min(size, items.len())` rows.
pub fn visible_window<T>(items: &[T], selected: usize, size: usize) -> (&[T], usize, usize) {
    let len = items.len();
    if size == 0 || len == 0 {
        return (&items[..0], 0, 0);
    }
    if len <= size {
        return (items, 0, len);
    }
    let selected = selected.min(len - 1);
    let start = selected.saturating_sub(size / 2).min(len - size);
    let end = start + size;
    (&items[start..end], start, end)
}
