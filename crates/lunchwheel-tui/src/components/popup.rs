use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::widgets::{Block, Borders, Clear};
use ratatui::Frame;

use crate::theme::Theme;

/// Frame shared by the dialogs and popups: a centered, cleared, bordered box.
pub struct Popup {
    pub title: String,
    theme: Theme,
    width_percent: u16,
    height_percent: u16,
    min_size: (u16, u16),
}

impl Popup {
    pub fn new(title: impl Into<String>, theme: Theme) -> Self {
        Self {
            title: title.into(),
            theme,
            width_percent: 50,
            height_percent: 40,
            min_size: (0, 0),
        }
    }

    pub fn with_size(mut self, width_percent: u16, height_percent: u16) -> Self {
        self.width_percent = width_percent;
        self.height_percent = height_percent;
        self
    }

    /// Never shrink below `width` x `height` cells unless the screen is smaller.
    pub fn with_min_size(mut self, width: u16, height: u16) -> Self {
        self.min_size = (width, height);
        self
    }

    /// Calculate the centered popup area within the given full area.
    pub fn centered_area(&self, full: Rect) -> Rect {
        let popup_width = ((full.width as u32 * self.width_percent as u32 / 100) as u16)
            .max(self.min_size.0)
            .min(full.width);
        let popup_height = ((full.height as u32 * self.height_percent as u32 / 100) as u16)
            .max(self.min_size.1)
            .min(full.height);

        let horizontal = Layout::horizontal([Constraint::Length(popup_width)])
            .flex(Flex::Center)
            .split(full);

        let vertical = Layout::vertical([Constraint::Length(popup_height)])
            .flex(Flex::Center)
            .split(horizontal[0]);

        vertical[0]
    }

    /// Render the popup frame (border + title + clear background).
    /// Returns the inner area for the caller to render content into.
    pub fn render_frame(&self, frame: &mut Frame, full: Rect) -> Rect {
        self.render_frame_titled(frame, full, &self.title)
    }

    /// Like `render_frame` with a title computed at draw time.
    pub fn render_frame_titled(&self, frame: &mut Frame, full: Rect, title: &str) -> Rect {
        let area = self.centered_area(full);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(self.theme.popup_border)
            .title_style(self.theme.popup_title);

        let inner = block.inner(area);
        frame.render_widget(block, area);
        inner
    }
}
