use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

use crate::action::Action;

/// Trait for all UI components (screens, dialogs, popups).
pub trait Component {
    /// Handle a key event. Return an Action to dispatch.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Action {
        Action::None
    }

    /// Render the component into the given area.
    fn render(&self, frame: &mut Frame, area: Rect, focused: bool);
}
