use std::time::Duration;

use chrono::{DateTime, Local};
use rand::Rng;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::CoreError;
use crate::food::FoodOption;
use crate::resolver::SpinResolver;
use crate::selection::Selection;
use crate::wheel::{SpinOutcome, SpinRequest, WheelState};

/// Maximum number of past results kept in the history.
pub const HISTORY_LIMIT: usize = 100;

/// The screen the user is on, carrying the state that screen owns.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Selection,
    Wheel(WheelState),
    Result {
        wheel: WheelState,
        outcome: SpinOutcome,
    },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Selection => "selection",
            Screen::Wheel(_) => "wheel",
            Screen::Result { .. } => "result",
        }
    }
}

/// One past spin result.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinRecord {
    pub option: FoodOption,
    pub at: DateTime<Local>,
    pub quick_stopped: bool,
}

/// Owns the catalog, the current selection, the active screen and the history.
/// All screen changes go through the transition methods here.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Catalog,
    selection: Selection,
    screen: Screen,
    resolver: SpinResolver,
    history: Vec<SpinRecord>,
}

impl Session {
    pub fn new(catalog: Catalog, resolver: SpinResolver) -> Self {
        Self {
            catalog,
            selection: Selection::new(),
            screen: Screen::Selection,
            resolver,
            history: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn history(&self) -> &[SpinRecord] {
        &self.history
    }

    pub fn resolver(&self) -> &SpinResolver {
        &self.resolver
    }

    /// The wheel on screen, if any.
    pub fn wheel(&self) -> Option<&WheelState> {
        match &self.screen {
            Screen::Selection => None,
            Screen::Wheel(wheel) | Screen::Result { wheel, .. } => Some(wheel),
        }
    }

    pub fn is_spinning(&self) -> bool {
        matches!(&self.screen, Screen::Wheel(wheel) if wheel.is_spinning())
    }

    fn invalid(&self, action: &'static str) -> CoreError {
        CoreError::InvalidTransition {
            screen: self.screen.name(),
            action,
        }
    }

    fn require_selection(&self, action: &'static str) -> Result<(), CoreError> {
        if matches!(self.screen, Screen::Selection) {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    pub fn toggle_option(&mut self, index: usize) -> Result<bool, CoreError> {
        self.require_selection("change the selection")?;
        if index >= self.catalog.len() {
            return Err(CoreError::InvalidOption(format!("no option at index {}", index)));
        }
        Ok(self.selection.toggle(index))
    }

    pub fn select_all(&mut self) -> Result<(), CoreError> {
        self.require_selection("change the selection")?;
        self.selection.select_all(&self.catalog);
        Ok(())
    }

    pub fn clear_selection(&mut self) -> Result<(), CoreError> {
        self.require_selection("change the selection")?;
        self.selection.clear();
        Ok(())
    }

    /// Preselect by label. Returns labels that are not in the catalog.
    pub fn select_labels<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<Vec<String>, CoreError> {
        self.require_selection("change the selection")?;
        Ok(self.selection.select_labels(&self.catalog, labels))
    }

    /// Add a user-defined option to the catalog and select it.
    pub fn add_option(&mut self, option: FoodOption) -> Result<usize, CoreError> {
        self.require_selection("add an option")?;
        let index = self.catalog.push(option)?;
        self.selection.toggle(index);
        Ok(index)
    }

    /// Selection -> Wheel.
    pub fn confirm_selection(&mut self) -> Result<&WheelState, CoreError> {
        self.require_selection("confirm the selection")?;
        let options = self.selection.confirm(&self.catalog)?;
        info!("Selection confirmed with {} options", options.len());
        self.screen = Screen::Wheel(WheelState::new(options)?);
        match &self.screen {
            Screen::Wheel(wheel) => Ok(wheel),
            _ => Err(self.invalid("confirm the selection")),
        }
    }

    /// Start a spin or quick-stop the running one.
    pub fn request_spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<SpinRequest, CoreError> {
        if let Screen::Wheel(wheel) = &mut self.screen {
            return wheel.request_spin(&self.resolver, rng);
        }
        Err(self.invalid("spin"))
    }

    /// Drive the animation. When the spin settles the session moves to the
    /// result screen and returns the outcome.
    pub fn advance(&mut self, dt: Duration) -> Result<Option<SpinOutcome>, CoreError> {
        let Screen::Wheel(wheel) = &mut self.screen else {
            return Ok(None);
        };
        let Some(outcome) = wheel.advance(dt)? else {
            return Ok(None);
        };

        self.history.push(SpinRecord {
            option: outcome.option.clone(),
            at: Local::now(),
            quick_stopped: outcome.quick_stopped,
        });
        if self.history.len() > HISTORY_LIMIT {
            self.history.drain(..self.history.len() - HISTORY_LIMIT);
        }

        let previous = std::mem::replace(&mut self.screen, Screen::Selection);
        if let Screen::Wheel(wheel) = previous {
            self.screen = Screen::Result {
                wheel,
                outcome: outcome.clone(),
            };
        }
        debug!("session: wheel -> result");
        Ok(Some(outcome))
    }

    /// Result -> Wheel, immediately spinning again with the same options.
    pub fn spin_again<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<SpinRequest, CoreError> {
        if !matches!(self.screen, Screen::Result { .. }) {
            return Err(self.invalid("spin again"));
        }
        let previous = std::mem::replace(&mut self.screen, Screen::Selection);
        if let Screen::Result { wheel, .. } = previous {
            self.screen = Screen::Wheel(wheel);
        }
        debug!("session: result -> wheel");
        self.request_spin(rng)
    }

    /// Wheel (idle) or Result -> Selection. The selection is kept.
    pub fn back_to_selection(&mut self) -> Result<(), CoreError> {
        match &self.screen {
            Screen::Selection => return Err(self.invalid("go back")),
            Screen::Wheel(wheel) if wheel.is_spinning() => return Err(CoreError::SpinInProgress),
            _ => {}
        }
        debug!("session: {} -> selection", self.screen.name());
        self.screen = Screen::Selection;
        Ok(())
    }
}
