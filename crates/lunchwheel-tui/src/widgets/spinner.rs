use std::time::Duration;

use ratatui::style::Style;
use ratatui::text::Span;

/// Braille-based spinner frames.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Time each frame stays on screen.
const FRAME_TIME: Duration = Duration::from_millis(80);

/// Status bar spinner shown while the wheel turns. Advanced by elapsed time
/// so it keeps the same speed at any redraw rate.
pub struct Spinner {
    elapsed: Duration,
    style: Style,
}

impl Spinner {
    pub fn new(style: Style) -> Self {
        Self {
            elapsed: Duration::ZERO,
            style,
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        let cycle = (FRAME_TIME * SPINNER_FRAMES.len() as u32).as_nanos();
        let nanos = (self.elapsed + dt).as_nanos() % cycle;
        self.elapsed = Duration::from_nanos(nanos as u64);
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn index(&self) -> usize {
        (self.elapsed.as_millis() / FRAME_TIME.as_millis()) as usize % SPINNER_FRAMES.len()
    }

    /// Current frame as a styled Span.
    pub fn span(&self) -> Span<'static> {
        Span::styled(SPINNER_FRAMES[self.index()], self.style)
    }

    pub fn frame(&self) -> &'static str {
        SPINNER_FRAMES[self.index()]
    }
}
