use std::time::Duration;

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::action::ScreenKind;
use crate::component::Component;
use crate::keymap::Keymap;
use crate::theme::Theme;
use crate::widgets::spinner::Spinner;

/// How long a status or error message stays visible.
const MESSAGE_TTL: Duration = Duration::from_secs(4);

struct Message {
    text: String,
    is_error: bool,
    age: Duration,
}

/// Bottom status bar: screen name, option count, spinner while spinning,
/// the latest message and key hints.
pub struct StatusBar {
    screen: ScreenKind,
    option_count: usize,
    spinning: bool,
    spinner: Spinner,
    message: Option<Message>,
    theme: Theme,
    selection_hints: String,
    wheel_hints: String,
    result_hints: String,
}

impl StatusBar {
    pub fn new(theme: Theme, keymap: &Keymap) -> Self {
        let global = format!(
            "{}:help {}:history {}:quit",
            keymap.hint("show_help"),
            keymap.hint("toggle_history"),
            keymap.hint("quit"),
        );
        Self {
            screen: ScreenKind::Selection,
            option_count: 0,
            spinning: false,
            spinner: Spinner::new(theme.status_bar),
            message: None,
            selection_hints: format!(" | Space:toggle /:filter n:new Enter:spin {} ", global),
            wheel_hints: format!(
                " | {}:spin {}:back {} ",
                keymap.hint("spin"),
                keymap.hint("back"),
                global
            ),
            result_hints: format!(
                " | r:spin again {}:back {} ",
                keymap.hint("back"),
                global
            ),
            theme,
        }
    }

    pub fn set_screen(&mut self, screen: ScreenKind, option_count: usize) {
        self.screen = screen;
        self.option_count = option_count;
    }

    pub fn set_spinning(&mut self, spinning: bool) {
        if spinning && !self.spinning {
            self.spinner.reset();
        }
        self.spinning = spinning;
    }

    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            is_error: false,
            age: Duration::ZERO,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            is_error: true,
            age: Duration::ZERO,
        });
    }

    /// Advance the spinner and expire old messages.
    pub fn advance(&mut self, dt: Duration) {
        if self.spinning {
            self.spinner.advance(dt);
        }
        if let Some(message) = &mut self.message {
            message.age += dt;
        }
        if self.message.as_ref().is_some_and(|m| m.age >= MESSAGE_TTL) {
            self.message = None;
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }

    fn hints(&self) -> &str {
        match self.screen {
            ScreenKind::Selection => &self.selection_hints,
            ScreenKind::Wheel => &self.wheel_hints,
            ScreenKind::Result => &self.result_hints,
        }
    }
}

impl Component for StatusBar {
    fn render(&self, frame: &mut Frame, area: Rect, _focused: bool) {
        let mut spans = vec![
            Span::styled(" ", self.theme.status_bar),
            Span::styled(self.screen.title(), self.theme.status_bar),
            Span::styled(
                format!(" | {} options", self.option_count),
                self.theme.status_bar,
            ),
        ];

        if self.spinning {
            spans.push(Span::styled(" ", self.theme.status_bar));
            spans.push(self.spinner.span());
            spans.push(Span::styled(" spinning", self.theme.status_bar));
        }

        if let Some(message) = &self.message {
            let style = if message.is_error {
                self.theme.status_bar.patch(self.theme.error)
            } else {
                self.theme.status_bar
            };
            spans.push(Span::styled(" | ", self.theme.status_bar));
            spans.push(Span::styled(message.text.clone(), style));
        }

        spans.push(Span::styled(self.hints().to_string(), self.theme.status_bar));

        // Pad to fill width
        let content_len: usize = spans.iter().map(|s| s.width()).sum();
        let padding = " ".repeat((area.width as usize).saturating_sub(content_len));
        spans.push(Span::styled(padding, self.theme.status_bar));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
