use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use lunchwheel_core::food::FoodOption;
use lunchwheel_core::selection::{Selection, MIN_OPTIONS};

use crate::action::Action;
use crate::component::Component;
use crate::theme::Theme;
use crate::widgets::fuzzy_input::FuzzyFilter;

/// Checkbox list of catalog options with an optional fuzzy filter.
pub struct SelectionPanel {
    theme: Theme,
    options: Vec<FoodOption>,
    picked: Vec<bool>,
    /// Catalog indices currently shown, in display order.
    visible: Vec<usize>,
    list_state: ListState,
    filter: FuzzyFilter,
    query: String,
    /// True while the filter input captures keystrokes.
    pub filter_active: bool,
}

impl SelectionPanel {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            options: Vec::new(),
            picked: Vec::new(),
            visible: Vec::new(),
            list_state: ListState::default(),
            filter: FuzzyFilter::new(),
            query: String::new(),
            filter_active: false,
        }
    }

    /// Refresh from the session's catalog and selection.
    pub fn sync(&mut self, options: &[FoodOption], selection: &Selection) {
        self.options = options.to_vec();
        self.picked = (0..options.len())
            .map(|i| selection.is_selected(i))
            .collect();
        self.refilter();
    }

    /// Put the cursor on catalog entry `index` if it is visible.
    pub fn focus_option(&mut self, index: usize) {
        if let Some(pos) = self.visible.iter().position(|&i| i == index) {
            self.list_state.select(Some(pos));
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Catalog index under the cursor.
    pub fn current(&self) -> Option<usize> {
        self.list_state
            .selected()
            .and_then(|pos| self.visible.get(pos).copied())
    }

    fn refilter(&mut self) {
        let keep = self.current();
        self.visible = self.filter.filter_options(&self.query, &self.options);
        let pos = keep
            .and_then(|index| self.visible.iter().position(|&i| i == index))
            .or(if self.visible.is_empty() { None } else { Some(0) });
        self.list_state.select(pos);
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let last = self.visible.len() as isize - 1;
        self.list_state
            .select(Some((current + delta).clamp(0, last) as usize));
    }

    fn clear_filter(&mut self) {
        self.query.clear();
        self.filter_active = false;
        self.refilter();
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => {
                self.clear_filter();
                Action::None
            }
            KeyCode::Enter => {
                self.filter_active = false;
                Action::None
            }
            KeyCode::Up => {
                self.move_cursor(-1);
                Action::None
            }
            KeyCode::Down => {
                self.move_cursor(1);
                Action::None
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.refilter();
                Action::None
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                self.refilter();
                Action::None
            }
            _ => Action::None,
        }
    }
}

impl Component for SelectionPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Action {
        if self.filter_active {
            return self.handle_filter_key(key);
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor(-1);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor(1);
                Action::None
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.list_state.select(if self.visible.is_empty() { None } else { Some(0) });
                Action::None
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.list_state.select(self.visible.len().checked_sub(1));
                Action::None
            }
            KeyCode::Char(' ') => match self.current() {
                Some(index) => Action::ToggleOption(index),
                None => Action::None,
            },
            KeyCode::Char('a') => Action::SelectAll,
            KeyCode::Char('c') => Action::ClearSelection,
            KeyCode::Char('n') => Action::ShowAddOption,
            KeyCode::Char('/') => {
                self.filter_active = true;
                Action::None
            }
            KeyCode::Esc if !self.query.is_empty() => {
                self.clear_filter();
                Action::None
            }
            KeyCode::Enter => Action::ConfirmSelection,
            _ => Action::None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let count = self.picked.iter().filter(|p| **p).count();
        let block = Block::default()
            .title(format!(
                " Pick your options ({}/{} selected) ",
                count,
                self.options.len()
            ))
            .borders(Borders::ALL)
            .border_style(if focused {
                self.theme.border_focused
            } else {
                self.theme.border
            })
            .title_style(self.theme.header);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Layout: filter (1) | list | footer (1)
        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

        let filter_line = if self.filter_active || !self.query.is_empty() {
            let mut spans = vec![
                Span::styled("/", self.theme.header),
                Span::styled(self.query.clone(), self.theme.normal),
            ];
            if self.filter_active {
                spans.push(Span::styled("_", self.theme.input_cursor));
            }
            spans.push(Span::styled(
                format!("  {} match", self.visible.len()),
                self.theme.dimmed,
            ));
            Line::from(spans)
        } else {
            Line::from(Span::styled("/ to filter", self.theme.dimmed))
        };
        frame.render_widget(Paragraph::new(filter_line), layout[0]);

        if self.visible.is_empty() {
            frame.render_widget(
                Paragraph::new("No options match the filter").style(self.theme.dimmed),
                layout[1],
            );
        } else {
            let items: Vec<ListItem> = self
                .visible
                .iter()
                .filter_map(|&i| self.options.get(i).map(|o| (i, o)))
                .map(|(i, option)| {
                    let picked = self.picked.get(i).copied().unwrap_or(false);
                    let (mark, mark_style) = if picked {
                        ("[x] ", self.theme.checkbox)
                    } else {
                        ("[ ] ", self.theme.dimmed)
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(mark, mark_style),
                        Span::styled(
                            "■ ",
                            Style::default().fg(self.theme.segment_color(option.color)),
                        ),
                        Span::styled(option.display_name(), self.theme.normal),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .highlight_style(self.theme.selected.add_modifier(Modifier::BOLD));
            frame.render_stateful_widget(list, layout[1], &mut self.list_state.clone());
        }

        let footer = if count < MIN_OPTIONS {
            Span::styled(
                format!("Select at least {} options to spin", MIN_OPTIONS),
                self.theme.warning,
            )
        } else {
            Span::styled("Enter: spin the wheel", self.theme.success)
        };
        frame.render_widget(Paragraph::new(Line::from(footer)), layout[2]);
    }
}
