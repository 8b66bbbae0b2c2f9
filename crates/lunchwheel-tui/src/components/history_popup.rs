use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use lunchwheel_core::session::SpinRecord;

use crate::action::Action;
use crate::components::popup::Popup;
use crate::theme::Theme;

/// Past spin results, newest first.
pub struct HistoryPopup {
    pub visible: bool,
    popup: Popup,
    theme: Theme,
    entries: Vec<SpinRecord>,
    scroll_offset: usize,
}

impl HistoryPopup {
    pub fn new(theme: Theme) -> Self {
        Self {
            visible: false,
            popup: Popup::new("History", theme.clone())
                .with_size(60, 60)
                .with_min_size(40, 8),
            theme,
            entries: Vec::new(),
            scroll_offset: 0,
        }
    }

    /// Show or hide; showing takes a fresh copy of `history` (oldest first).
    pub fn toggle(&mut self, history: &[SpinRecord]) {
        self.visible = !self.visible;
        if self.visible {
            self.entries = history.iter().rev().cloned().collect();
            self.scroll_offset = 0;
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') => {
                self.hide();
                Action::ClosePopup
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.scroll_offset + 1 < self.entries.len() {
                    self.scroll_offset += 1;
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    pub fn render(&self, frame: &mut Frame, full: Rect) {
        if !self.visible {
            return;
        }

        let title = format!("History ({})", self.entries.len());
        let inner = self.popup.render_frame_titled(frame, full, &title);
        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        if self.entries.is_empty() {
            frame.render_widget(
                Paragraph::new("No spins yet. Pick some options and give it a whirl.")
                    .style(self.theme.dimmed),
                layout[0],
            );
        } else {
            let today = Local::now().date_naive();
            let lines: Vec<Line> = self
                .entries
                .iter()
                .skip(self.scroll_offset)
                .take(layout[0].height as usize)
                .map(|record| {
                    let mut spans = vec![
                        Span::styled(
                            format!("{}  ", format_time(&record.at, today)),
                            self.theme.dimmed,
                        ),
                        Span::styled(record.option.display_name(), self.theme.normal),
                    ];
                    if record.quick_stopped {
                        spans.push(Span::styled("  (quick stop)", self.theme.dimmed));
                    }
                    Line::from(spans)
                })
                .collect();
            frame.render_widget(Paragraph::new(lines), layout[0]);
        }

        let hints = Line::from(Span::styled("j/k:scroll  q:close", self.theme.dimmed));
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }
}

/// Time only for today's spins, date and time otherwise.
fn format_time(at: &DateTime<Local>, today: chrono::NaiveDate) -> String {
    if at.date_naive() == today {
        at.format("%H:%M:%S").to_string()
    } else {
        at.format("%Y-%m-%d %H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lunchwheel_core::catalog::Catalog;

    fn record(label: &str, at: DateTime<Local>) -> SpinRecord {
        let catalog = Catalog::builtin();
        let index = catalog.find(label).unwrap();
        SpinRecord {
            option: catalog.options()[index].clone(),
            at,
            quick_stopped: false,
        }
    }

    #[test]
    fn test_toggle_shows_newest_first() {
        let now = Local::now();
        let history = vec![record("Pizza", now), record("Sushi", now)];
        let mut popup = HistoryPopup::new(Theme::default());
        popup.toggle(&history);
        assert!(popup.visible);
        assert_eq!(popup.entries[0].option.label, "Sushi");
        popup.toggle(&history);
        assert!(!popup.visible);
    }

    #[test]
    fn test_format_time() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 12, 30, 5).unwrap();
        assert_eq!(format_time(&at, at.date_naive()), "12:30:05");
        let tomorrow = at.date_naive().succ_opt().unwrap();
        assert_eq!(format_time(&at, tomorrow), "2024-03-09 12:30");
    }
}
