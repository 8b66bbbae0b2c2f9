use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use lunchwheel_core::wheel::SpinOutcome;

use crate::action::Action;
use crate::components::wheel_panel::segment_style;
use crate::theme::Theme;

/// The result screen's text side: the winner and where you are.
pub struct ResultPanel {
    theme: Theme,
}

impl ResultPanel {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('r') | KeyCode::Enter => Action::SpinAgain,
            _ => Action::None,
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        outcome: &SpinOutcome,
        city: Option<&str>,
        spins: usize,
    ) {
        let block = Block::default()
            .title(" Result ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_focused)
            .title_style(self.theme.header);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = result_lines(&self.theme, outcome, city, spins);
        let height = lines.len() as u16;
        let [content] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(inner);
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            content,
        );
    }
}

fn result_lines(
    theme: &Theme,
    outcome: &SpinOutcome,
    city: Option<&str>,
    spins: usize,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled("The wheel has spoken:", theme.dimmed)),
        Line::from(""),
        Line::from(vec![
            Span::styled("\u{25a0} ", segment_style(theme, &outcome.option)),
            Span::styled(outcome.option.display_name(), theme.winner),
        ]),
        Line::from(""),
    ];
    if let Some(city) = city {
        lines.push(Line::from(Span::styled(
            format!("\u{1f4cd} {}", city),
            theme.normal,
        )));
    }
    if outcome.quick_stopped {
        lines.push(Line::from(Span::styled("(quick stop)", theme.dimmed)));
    }
    if spins > 1 {
        lines.push(Line::from(Span::styled(
            format!("spin #{} this session", spins),
            theme.dimmed,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "r: spin again   Esc: change options",
        theme.dimmed,
    )));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use lunchwheel_core::food::{FoodOption, SegmentColor};

    fn outcome(quick_stopped: bool) -> SpinOutcome {
        SpinOutcome {
            index: 0,
            option: FoodOption::new("Ramen", "🍜", SegmentColor::Yellow).unwrap(),
            final_rotation: 3725.0,
            quick_stopped,
        }
    }

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_result_with_city() {
        let lines = result_lines(&Theme::default(), &outcome(false), Some("Lisbon"), 1);
        let text = text(&lines);
        assert!(text.contains("🍜 Ramen"));
        assert!(text.contains("\u{1f4cd} Lisbon"));
        assert!(!text.contains("quick stop"));
        assert!(!text.contains("spin #"));
    }

    #[test]
    fn test_result_without_city() {
        let lines = result_lines(&Theme::default(), &outcome(true), None, 3);
        let text = text(&lines);
        assert!(!text.contains('\u{1f4cd}'));
        assert!(text.contains("(quick stop)"));
        assert!(text.contains("spin #3"));
    }

    #[test]
    fn test_keys() {
        let mut panel = ResultPanel::new(Theme::default());
        assert!(matches!(
            panel.handle_key_event(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE)),
            Action::SpinAgain
        ));
        assert!(matches!(
            panel.handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            Action::None
        ));
    }
}
