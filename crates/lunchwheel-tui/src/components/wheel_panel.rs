use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::Canvas;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use lunchwheel_core::food::FoodOption;
use lunchwheel_core::wheel::WheelState;

use crate::action::Action;
use crate::theme::Theme;
use crate::widgets::wheel_face::{canvas_bounds, WheelFace};

/// Above this many segments only icons are printed on the wheel.
const FULL_LABEL_LIMIT: usize = 8;
const MAX_LABEL_WIDTH: usize = 10;

/// The wheel screen: a braille wheel with labels and a fixed pointer at 12 o'clock.
pub struct WheelPanel {
    theme: Theme,
}

impl WheelPanel {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Enter spins in addition to the configured spin binding.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter => Action::Spin,
            _ => Action::None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, wheel: &WheelState, title: &str) {
        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(if wheel.is_spinning() {
                self.theme.border_focused
            } else {
                self.theme.border
            })
            .title_style(self.theme.header);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Layout: canvas | pointer readout (1)
        let layout = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(inner);
        self.render_canvas(frame, layout[0], wheel);

        let readout = match wheel.option_under_pointer() {
            Some(option) => Line::from(vec![
                Span::styled("\u{25bc} ", self.theme.pointer),
                Span::styled(option.display_name(), self.theme.normal),
            ]),
            None => Line::from(""),
        };
        frame.render_widget(
            Paragraph::new(readout).alignment(Alignment::Center),
            layout[1],
        );
    }

    fn render_canvas(&self, frame: &mut Frame, area: Rect, wheel: &WheelState) {
        let (x_bounds, y_bounds, step) = canvas_bounds(area);
        let face = WheelFace {
            colors: wheel
                .options()
                .iter()
                .map(|o| self.theme.segment_color(o.color))
                .collect(),
            rotation: wheel.display_rotation(),
            radius: 1.0,
            rim: self.theme.wheel_rim,
            step,
        };

        let show_names = wheel.segment_count() <= FULL_LABEL_LIMIT;
        // Canvas units per terminal cell, for centering text on a point
        let cell_width = (x_bounds[1] - x_bounds[0]) / f64::from(area.width.max(1));
        let cell_height = (y_bounds[1] - y_bounds[0]) / f64::from(area.height.max(1));
        let labels: Vec<(f64, f64, Line<'static>)> = wheel
            .options()
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let (x, y) = face.label_anchor(i);
                let text = segment_label(option, show_names);
                let line = Line::from(Span::styled(text, self.theme.normal));
                let half_width = line.width() as f64 * cell_width / 2.0;
                (x - half_width, y, line)
            })
            .collect();

        let pointer_style = self.theme.pointer;
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(move |ctx| {
                ctx.draw(&face);
                ctx.layer();
                for (x, y, line) in &labels {
                    ctx.print(*x, *y, line.clone());
                }
                ctx.print(
                    -cell_width / 2.0,
                    face.radius + cell_height,
                    Line::from(Span::styled("\u{25bc}", pointer_style)),
                );
            });
        frame.render_widget(canvas, area);
    }
}

/// Text printed on a segment: icon plus a shortened label, or just the icon
/// (or initials when there is no icon) on crowded wheels.
fn segment_label(option: &FoodOption, show_names: bool) -> String {
    let short: String = if option.label.chars().count() > MAX_LABEL_WIDTH {
        let mut s: String = option.label.chars().take(MAX_LABEL_WIDTH - 1).collect();
        s.push('\u{2026}');
        s
    } else {
        option.label.clone()
    };
    match (show_names, option.icon.is_empty()) {
        (true, true) => short,
        (true, false) => format!("{} {}", option.icon, short),
        (false, false) => option.icon.clone(),
        (false, true) => option.label.chars().take(2).collect(),
    }
}

/// Style a segment color as a foreground, for legends outside the canvas.
pub fn segment_style(theme: &Theme, option: &FoodOption) -> Style {
    Style::default().fg(theme.segment_color(option.color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use lunchwheel_core::catalog::Catalog;
    use lunchwheel_core::food::SegmentColor;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_segment_label() {
        let pizza = FoodOption::new("Pizza", "🍕", SegmentColor::Red).unwrap();
        assert_eq!(segment_label(&pizza, true), "🍕 Pizza");
        assert_eq!(segment_label(&pizza, false), "🍕");

        let long = FoodOption::new("Spaghetti Carbonara", "", SegmentColor::Red).unwrap();
        assert_eq!(segment_label(&long, true), "Spaghetti\u{2026}");
        assert_eq!(segment_label(&long, false), "Sp");
    }

    #[test]
    fn test_enter_spins() {
        let mut panel = WheelPanel::new(Theme::default());
        assert!(matches!(
            panel.handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            Action::Spin
        ));
        assert!(matches!(
            panel.handle_key_event(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)),
            Action::None
        ));
    }

    #[test]
    fn test_renders_pointer_and_readout() {
        let options = Catalog::builtin().options()[..4].to_vec();
        let wheel = WheelState::new(options).unwrap();
        let panel = WheelPanel::new(Theme::default());

        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                panel.render(frame, area, &wheel, "Spin the wheel");
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains('\u{25bc}'));
        // Rotation 0 on four segments puts option 1 under the pointer
        let under = wheel.option_under_pointer().unwrap();
        assert_eq!(under.label, "Burger");
        assert!(text.contains("Burger"));
    }
}
