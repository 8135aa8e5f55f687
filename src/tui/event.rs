use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::core::action::{Key, WHEEL_LINES};

/// TUI-specific input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiEvent {
    Key(Key),
    /// Wheel motion in lines; negative scrolls up.
    Wheel(i32),
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    if !event::poll(timeout).ok()? {
        return None;
    }
    match event::read().ok()? {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
            map_key(key_event).map(TuiEvent::Key)
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::Wheel(-WHEEL_LINES)),
            MouseEventKind::ScrollDown => Some(TuiEvent::Wheel(WHEEL_LINES)),
            _ => None,
        },
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

pub fn map_key(key_event: KeyEvent) -> Option<Key> {
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Key::CtrlC),
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => Some(Key::CtrlD),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => Some(Key::CtrlU),
        (m, KeyCode::Char(_)) if m.contains(KeyModifiers::CONTROL) || m.contains(KeyModifiers::ALT) => {
            None
        }
        (_, KeyCode::Char(c)) => Some(Key::Char(c)),
        (_, KeyCode::Enter) => Some(Key::Enter),
        (_, KeyCode::Esc) => Some(Key::Esc),
        (_, KeyCode::Backspace) => Some(Key::Backspace),
        (_, KeyCode::Up) => Some(Key::Up),
        (_, KeyCode::Down) => Some(Key::Down),
        (_, KeyCode::Left) => Some(Key::Left),
        (_, KeyCode::Right) => Some(Key::Right),
        (_, KeyCode::PageUp) => Some(Key::PageUp),
        (_, KeyCode::PageDown) => Some(Key::PageDown),
        _ => None,
    }
}
