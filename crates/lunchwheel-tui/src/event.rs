use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Application events produced by the event loop.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
}

/// Poll for the next event, waiting at most `timeout`.
/// Key releases and unhandled events yield `None`.
pub fn poll_event(timeout: Duration) -> Option<AppEvent> {
    if !event::poll(timeout).ok()? {
        return Some(AppEvent::Tick);
    }
    match event::read().ok()? {
        CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Some(AppEvent::Key(key)),
        CrosstermEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}
