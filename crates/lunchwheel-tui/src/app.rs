use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Layout};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use lunchwheel_core::catalog::Catalog;
use lunchwheel_core::error::CoreError;
use lunchwheel_core::food::{FoodOption, SegmentColor};
use lunchwheel_core::location::detect_city;
use lunchwheel_core::resolver::SpinResolver;
use lunchwheel_core::session::{Screen, Session};
use lunchwheel_core::wheel::{SpinOutcome, SpinRequest};

use crate::action::{Action, ScreenKind};
use crate::component::Component;
use crate::components::add_option_dialog::AddOptionDialog;
use crate::components::help_popup::HelpPopup;
use crate::components::history_popup::HistoryPopup;
use crate::components::result_panel::ResultPanel;
use crate::components::selection_panel::SelectionPanel;
use crate::components::status_bar::StatusBar;
use crate::components::wheel_panel::WheelPanel;
use crate::config::{AppConfig, OptionConfig};
use crate::event::{self, AppEvent};
use crate::keymap::Keymap;
use crate::theme::Theme;
use crate::tui;

/// The main application.
pub struct App {
    config: AppConfig,
    should_quit: bool,

    session: Session,
    rng: StdRng,

    keymap: Keymap,

    // UI components
    selection_panel: SelectionPanel,
    wheel_panel: WheelPanel,
    result_panel: ResultPanel,
    status_bar: StatusBar,

    // Popups
    add_option_dialog: AddOptionDialog,
    help_popup: HelpPopup,
    history_popup: HistoryPopup,

    /// City shown on the result screen, once known.
    city: Option<String>,
    last_frame: Instant,

    // Async communication
    action_tx: tokio::sync::mpsc::UnboundedSender<Action>,
    action_rx: tokio::sync::mpsc::UnboundedReceiver<Action>,
}

impl App {
    /// Build the app from config. `seed` makes spins reproducible; `preselect`
    /// lists option labels to check before the first screen is shown.
    pub fn new(config: AppConfig, seed: Option<u64>, preselect: Vec<String>) -> anyhow::Result<Self> {
        let builtin_count = Catalog::builtin().len();
        let catalog = Catalog::with_custom(config.custom_options(builtin_count)?)?;
        let resolver = SpinResolver::new(config.spin.to_settings())?;
        let mut session = Session::new(catalog, resolver);

        let unknown = session.select_labels(preselect.as_slice())?;
        for label in &unknown {
            warn!("Ignoring unknown option '{}'", label);
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let theme = Theme::load(&config.general.theme);
        let keymap = Keymap::from_config(&config.keybindings);
        let status_bar = StatusBar::new(theme.clone(), &keymap);
        let (action_tx, action_rx) = tokio::sync::mpsc::unbounded_channel();

        let mut app = Self {
            should_quit: false,
            session,
            rng,
            selection_panel: SelectionPanel::new(theme.clone()),
            wheel_panel: WheelPanel::new(theme.clone()),
            result_panel: ResultPanel::new(theme.clone()),
            status_bar,
            add_option_dialog: AddOptionDialog::new(theme.clone()),
            help_popup: HelpPopup::new(theme.clone()),
            history_popup: HistoryPopup::new(theme),
            keymap,
            city: None,
            last_frame: Instant::now(),
            action_tx,
            action_rx,
            config,
        };

        if !unknown.is_empty() {
            app.status_bar
                .set_error(format!("Unknown options: {}", unknown.join(", ")));
        }
        if app.config.first_launch {
            app.help_popup.show(&app.keymap);
        }
        app.sync_selection_panel();
        app.sync_status_bar();
        Ok(app)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Main event loop.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        tui::install_panic_hook();
        let mut terminal = tui::init()?;

        self.spawn_location_lookup();
        self.last_frame = Instant::now();

        loop {
            // Render
            terminal.draw(|frame| self.render(frame))?;

            // Redraw at frame rate only while the wheel moves
            let timeout = if self.session.is_spinning() {
                self.config.frame_interval()
            } else {
                self.config.tick_rate()
            };

            if let Some(app_event) = event::poll_event(timeout) {
                match app_event {
                    AppEvent::Key(key) => {
                        let action = self.handle_key(key);
                        let _ = self.action_tx.send(action);
                    }
                    AppEvent::Resize(w, h) => {
                        let _ = self.action_tx.send(Action::Resize(w, h));
                    }
                    AppEvent::Tick => {
                        let _ = self.action_tx.send(Action::Tick);
                    }
                }
            }

            // Drain action queue
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(action);
            }

            if self.should_quit {
                break;
            }
        }

        tui::restore()?;
        Ok(())
    }

    /// Route a key press: force quit, then popups, then the filter input,
    /// then the screen's panel, falling back to the keymap.
    fn handle_key(&mut self, key: KeyEvent) -> Action {
        let screen = ScreenKind::from(self.session.screen());

        if self.keymap.is_force_quit(&key) {
            Action::Quit
        } else if self.add_option_dialog.visible {
            self.add_option_dialog.handle_key_event(key)
        } else if self.help_popup.visible {
            self.help_popup.handle_key_event(key)
        } else if self.history_popup.visible {
            self.history_popup.handle_key_event(key)
        } else if screen == ScreenKind::Selection && self.selection_panel.filter_active {
            // Filter input captures all keys
            self.selection_panel.handle_key_event(key)
        } else {
            let panel_action = match screen {
                ScreenKind::Selection => self.selection_panel.handle_key_event(key),
                ScreenKind::Wheel => self.wheel_panel.handle_key_event(key),
                ScreenKind::Result => self.result_panel.handle_key_event(key),
            };
            if matches!(panel_action, Action::None) {
                self.keymap.resolve(&key, screen)
            } else {
                panel_action
            }
        }
    }

    fn process_action(&mut self, action: Action) {
        let refresh_selection = changes_selection(&action);
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Tick => {
                let now = Instant::now();
                let dt = now.duration_since(self.last_frame);
                self.last_frame = now;
                self.advance(dt);
            }
            Action::Resize(_, _) | Action::None => {}

            // Selection
            Action::ToggleOption(index) => {
                let result = self.session.toggle_option(index).map(|_| ());
                self.report(result);
            }
            Action::SelectAll => {
                let result = self.session.select_all();
                self.report(result);
            }
            Action::ClearSelection => {
                let result = self.session.clear_selection();
                self.report(result);
            }
            Action::ConfirmSelection => {
                let result = self.session.confirm_selection().map(|_| ());
                self.report(result);
            }
            Action::ShowAddOption => {
                if matches!(self.session.screen(), Screen::Selection) {
                    let color = SegmentColor::for_index(self.session.catalog().len());
                    self.add_option_dialog.show(color);
                }
            }
            Action::AddCustomOption(option) => self.add_custom_option(option),

            // Wheel
            Action::Spin => match self.session.request_spin(&mut self.rng) {
                Ok(request) => self.on_spin_request(request),
                Err(e) => self.on_error(e),
            },
            Action::SpinAgain => match self.session.spin_again(&mut self.rng) {
                Ok(request) => self.on_spin_request(request),
                Err(e) => self.on_error(e),
            },
            Action::BackToSelection => {
                let result = self.session.back_to_selection();
                self.report(result);
            }

            // Popups
            Action::ShowHelp => {
                self.help_popup.show(&self.keymap);
            }
            Action::ToggleHistory => {
                self.history_popup.toggle(self.session.history());
            }
            Action::ClosePopup => {}

            Action::LocationResolved(city) => {
                debug!("Location resolved: {:?}", city);
                self.city = city;
            }

            Action::ErrorMessage(msg) => {
                self.status_bar.set_error(msg);
            }
        }

        if refresh_selection {
            self.sync_selection_panel();
        }
        self.sync_status_bar();
    }

    /// Move the animation and status bar forward by `dt`.
    fn advance(&mut self, dt: Duration) {
        match self.session.advance(dt) {
            Ok(Some(outcome)) => self.on_outcome(&outcome),
            Ok(None) => {}
            Err(e) => self.on_error(e),
        }
        self.status_bar.advance(dt);
        self.sync_status_bar();
    }

    fn on_spin_request(&mut self, request: SpinRequest) {
        match request {
            SpinRequest::Started { target } => {
                debug!("Spin started toward {:.1} degrees", target);
                // Idle time before the press must not count toward the animation
                self.last_frame = Instant::now();
            }
            SpinRequest::Retargeted { target } => {
                debug!("Quick stop at {:.1} degrees", target);
                self.status_bar.set_message("Quick stop!");
            }
            SpinRequest::Ignored => {}
        }
    }

    fn on_outcome(&mut self, outcome: &SpinOutcome) {
        info!(
            "Wheel stopped on '{}' at {:.1} degrees{}",
            outcome.option.label,
            outcome.final_rotation,
            if outcome.quick_stopped {
                " (quick stop)"
            } else {
                ""
            }
        );
        self.status_bar
            .set_message(format!("You're having {}!", outcome.option.display_name()));
    }

    fn add_custom_option(&mut self, option: FoodOption) {
        match self.session.add_option(option.clone()) {
            Ok(index) => {
                info!("Added custom option '{}'", option.label);
                self.selection_panel
                    .sync(self.session.catalog().options(), self.session.selection());
                self.selection_panel.focus_option(index);
                self.status_bar
                    .set_message(format!("Added {}", option.display_name()));
                self.remember_option(&option);
            }
            Err(e) => self.on_error(e),
        }
    }

    /// Save a custom option to the config file so it survives restarts.
    fn remember_option(&mut self, option: &FoodOption) {
        if !self.config.general.remember_custom_options {
            return;
        }
        let Some(path) = self.config.path.clone() else {
            return;
        };
        let entry = OptionConfig::from(option);
        match AppConfig::append_option(&path, &entry) {
            Ok(()) => {
                debug!("Saved '{}' to {:?}", option.label, path);
                self.config.options.push(entry);
            }
            Err(e) => {
                warn!("Failed to save option to {:?}: {:#}", path, e);
                self.status_bar
                    .set_error(format!("Could not save option: {}", e));
            }
        }
    }

    fn report(&mut self, result: Result<(), CoreError>) {
        if let Err(e) = result {
            self.on_error(e);
        }
    }

    fn on_error(&mut self, e: CoreError) {
        warn!("{}", e);
        let text = match e {
            CoreError::SpinInProgress => "Wait for the wheel to stop".to_string(),
            other => capitalize(&other.to_string()),
        };
        self.status_bar.set_error(text);
    }

    /// Refresh the selection panel's copy of the catalog and selection.
    fn sync_selection_panel(&mut self) {
        self.selection_panel
            .sync(self.session.catalog().options(), self.session.selection());
    }

    fn sync_status_bar(&mut self) {
        let screen = ScreenKind::from(self.session.screen());
        let count = match self.session.wheel() {
            Some(wheel) => wheel.segment_count(),
            None => self.session.selection().count(),
        };
        self.status_bar.set_screen(screen, count);
        self.status_bar.set_spinning(self.session.is_spinning());
    }

    /// Resolve the city for the result screen without blocking the UI.
    fn spawn_location_lookup(&self) {
        let tx = self.action_tx.clone();
        if let Some(city) = self.config.general.city.clone() {
            let _ = tx.send(Action::LocationResolved(Some(city)));
            return;
        }
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(Action::LocationResolved(detect_city()));
        });
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        let full = frame.area();

        // Vertical: content | status bar (1)
        let outer = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(full);
        let content_area = outer[0];
        let status_area = outer[1];

        match self.session.screen() {
            Screen::Selection => {
                self.selection_panel.render(frame, content_area, true);
            }
            Screen::Wheel(wheel) => {
                self.wheel_panel
                    .render(frame, content_area, wheel, ScreenKind::Wheel.title());
            }
            Screen::Result { wheel, outcome } => {
                // Horizontal: wheel | result
                let horizontal =
                    Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                        .split(content_area);
                self.wheel_panel
                    .render(frame, horizontal[0], wheel, ScreenKind::Wheel.title());
                self.result_panel.render(
                    frame,
                    horizontal[1],
                    outcome,
                    self.city.as_deref(),
                    self.session.history().len(),
                );
            }
        }

        self.status_bar.render(frame, status_area, false);

        // Popups on top (last rendered is on top)
        self.history_popup.render(frame, full);
        self.help_popup.render(frame, full);
        self.add_option_dialog.render(frame, full);
    }
}

/// Actions that can change the catalog or the selection.
fn changes_selection(action: &Action) -> bool {
    matches!(
        action,
        Action::ToggleOption(_)
            | Action::SelectAll
            | Action::ClearSelection
            | Action::AddCustomOption(_)
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
