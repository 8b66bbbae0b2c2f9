use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use lunchwheel_core::food::{FoodOption, SegmentColor};

use crate::action::Action;
use crate::components::popup::Popup;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Label,
    Icon,
    Color,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Label => Field::Icon,
            Field::Icon => Field::Color,
            Field::Color => Field::Label,
        }
    }

    fn prev(self) -> Self {
        match self {
            Field::Label => Field::Color,
            Field::Icon => Field::Label,
            Field::Color => Field::Icon,
        }
    }
}

/// Dialog for adding a custom option: label, emoji and segment color.
pub struct AddOptionDialog {
    pub visible: bool,
    popup: Popup,
    theme: Theme,
    active_field: Field,
    label: String,
    icon: String,
    color: SegmentColor,
}

impl AddOptionDialog {
    pub fn new(theme: Theme) -> Self {
        Self {
            visible: false,
            popup: Popup::new("New Option", theme.clone())
                .with_size(50, 40)
                .with_min_size(40, 11),
            theme,
            active_field: Field::Label,
            label: String::new(),
            icon: String::new(),
            color: SegmentColor::Red,
        }
    }

    /// Open with empty fields; `color` is the palette color the next option would get.
    pub fn show(&mut self, color: SegmentColor) {
        self.label.clear();
        self.icon.clear();
        self.color = color;
        self.active_field = Field::Label;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => {
                self.hide();
                Action::ClosePopup
            }
            KeyCode::Tab => {
                self.active_field = self.active_field.next();
                Action::None
            }
            KeyCode::BackTab => {
                self.active_field = self.active_field.prev();
                Action::None
            }
            KeyCode::F(2) => {
                self.color = self.color.next();
                Action::None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                if let Some(buffer) = self.active_buffer_mut() {
                    buffer.pop();
                }
                Action::None
            }
            KeyCode::Char(' ') | KeyCode::Right if self.active_field == Field::Color => {
                self.color = self.color.next();
                Action::None
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = self.active_buffer_mut() {
                    buffer.push(c);
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn submit(&mut self) -> Action {
        match FoodOption::new(self.label.clone(), self.icon.clone(), self.color) {
            Ok(option) => {
                self.hide();
                Action::AddCustomOption(option)
            }
            Err(e) => Action::ErrorMessage(e.to_string()),
        }
    }

    fn active_buffer_mut(&mut self) -> Option<&mut String> {
        match self.active_field {
            Field::Label => Some(&mut self.label),
            Field::Icon => Some(&mut self.icon),
            Field::Color => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, full: Rect) {
        if !self.visible {
            return;
        }

        let inner = self.popup.render_frame(frame, full);

        // Layout: label(2) | icon(2) | color(2) | preview(2) | hints
        let layout = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(inner);

        self.render_field(frame, layout[0], "Label", &self.label, Field::Label);
        self.render_field(frame, layout[1], "Emoji", &self.icon, Field::Icon);

        let color_active = self.active_field == Field::Color;
        let color_lines = vec![
            Line::from(Span::styled(
                "Color:",
                if color_active {
                    self.theme.header
                } else {
                    self.theme.dimmed
                },
            )),
            Line::from(vec![
                Span::styled(
                    "■■ ",
                    Style::default().fg(self.theme.segment_color(self.color)),
                ),
                Span::styled(self.color.to_string(), self.theme.normal),
                Span::styled("  (F2 to cycle)", self.theme.dimmed),
            ]),
        ];
        frame.render_widget(Paragraph::new(color_lines), layout[2]);

        let preview = if self.label.trim().is_empty() {
            Span::styled("Preview: (label required)", self.theme.dimmed)
        } else {
            let name = if self.icon.trim().is_empty() {
                self.label.trim().to_string()
            } else {
                format!("{} {}", self.icon.trim(), self.label.trim())
            };
            Span::styled(format!("Preview: {}", name), self.theme.success)
        };
        frame.render_widget(Paragraph::new(Line::from(preview)), layout[3]);

        let hints = Paragraph::new(Line::from(Span::styled(
            "Tab:next  Shift+Tab:prev  F2:color  Enter:add  Esc:cancel",
            self.theme.dimmed,
        )));
        frame.render_widget(hints, layout[4]);
    }

    fn render_field(&self, frame: &mut Frame, area: Rect, label: &str, value: &str, field: Field) {
        let is_active = self.active_field == field;
        let label_style = if is_active {
            self.theme.header
        } else {
            self.theme.dimmed
        };
        let value_style = if is_active {
            self.theme.normal
        } else {
            self.theme.dimmed
        };

        let lines = vec![
            Line::from(Span::styled(format!("{}:", label), label_style)),
            Line::from(vec![
                Span::styled(value.to_string(), value_style),
                if is_active {
                    Span::styled("_", self.theme.input_cursor)
                } else {
                    Span::raw("")
                },
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }
}
