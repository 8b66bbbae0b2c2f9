use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::action::Action;
use crate::components::popup::Popup;
use crate::keymap::Keymap;
use crate::theme::Theme;

struct HelpSection {
    title: &'static str,
    entries: Vec<(String, &'static str)>,
}

/// A scrollable popup listing the key bindings.
pub struct HelpPopup {
    pub visible: bool,
    popup: Popup,
    theme: Theme,
    sections: Vec<HelpSection>,
    scroll_offset: usize,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self {
            visible: false,
            popup: Popup::new("Help", theme.clone())
                .with_size(60, 80)
                .with_min_size(44, 12),
            theme,
            sections: Vec::new(),
            scroll_offset: 0,
        }
    }

    pub fn show(&mut self, keymap: &Keymap) {
        self.sections = build_sections(keymap);
        self.scroll_offset = 0;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    fn total_lines(&self) -> usize {
        self.sections
            .iter()
            .map(|s| 1 + s.entries.len() + 1)
            .sum::<usize>()
            .saturating_sub(1)
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.hide();
                Action::ClosePopup
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_offset = (self.scroll_offset + 1).min(self.total_lines());
                Action::None
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.scroll_offset = 0;
                Action::None
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.scroll_offset = self.total_lines();
                Action::None
            }
            _ => Action::None,
        }
    }

    pub fn render(&self, frame: &mut Frame, full: Rect) {
        if !self.visible {
            return;
        }

        let inner = self.popup.render_frame(frame, full);
        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        let mut lines: Vec<Line> = Vec::new();
        for (i, section) in self.sections.iter().enumerate() {
            lines.push(Line::from(Span::styled(section.title, self.theme.popup_title)));
            for (key, desc) in &section.entries {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<14}", key), self.theme.header),
                    Span::styled(*desc, self.theme.normal),
                ]));
            }
            if i + 1 < self.sections.len() {
                lines.push(Line::from(""));
            }
        }

        let visible_height = layout[0].height as usize;
        let max_scroll = lines.len().saturating_sub(visible_height);
        let offset = self.scroll_offset.min(max_scroll);
        let end = (offset + visible_height).min(lines.len());
        frame.render_widget(Paragraph::new(lines[offset..end].to_vec()), layout[0]);

        let hints = Line::from(Span::styled(
            "\u{2191}/\u{2193}:scroll  g/G:top/bottom  q:close",
            self.theme.dimmed,
        ));
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }
}

fn build_sections(keymap: &Keymap) -> Vec<HelpSection> {
    vec![
        HelpSection {
            title: "GLOBAL (configurable)",
            entries: vec![
                (keymap.hint("show_help"), "Help"),
                (keymap.hint("toggle_history"), "Spin history"),
                (keymap.hint("quit"), "Quit"),
                (keymap.hint("force_quit"), "Force quit"),
            ],
        },
        HelpSection {
            title: "PICK OPTIONS",
            entries: vec![
                ("j/k \u{2191}/\u{2193}".to_string(), "Move"),
                ("Space".to_string(), "Toggle option"),
                ("a".to_string(), "Select all"),
                ("c".to_string(), "Clear selection"),
                ("/".to_string(), "Filter options"),
                ("n".to_string(), "Add a custom option"),
                ("Enter".to_string(), "Confirm and go to the wheel"),
            ],
        },
        HelpSection {
            title: "WHEEL",
            entries: vec![
                (keymap.hint("spin"), "Spin"),
                ("Enter".to_string(), "Spin"),
                (
                    format!("{} (spinning)", keymap.hint("spin")),
                    "Quick stop",
                ),
                (keymap.hint("back"), "Back to options"),
            ],
        },
        HelpSection {
            title: "RESULT",
            entries: vec![
                ("r".to_string(), "Spin again"),
                (keymap.hint("back"), "Back to options"),
            ],
        },
        HelpSection {
            title: "NEW OPTION DIALOG",
            entries: vec![
                ("Tab/S-Tab".to_string(), "Next / previous field"),
                ("F2".to_string(), "Cycle color"),
                ("Enter".to_string(), "Add option"),
                ("Esc".to_string(), "Cancel"),
            ],
        },
    ]
}
