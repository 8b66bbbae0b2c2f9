use lunchwheel_core::food::FoodOption;
use lunchwheel_core::session::Screen;

/// Which screen is showing, without the state it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Selection,
    Wheel,
    Result,
}

impl From<&Screen> for ScreenKind {
    fn from(screen: &Screen) -> Self {
        match screen {
            Screen::Selection => ScreenKind::Selection,
            Screen::Wheel(_) => ScreenKind::Wheel,
            Screen::Result { .. } => ScreenKind::Result,
        }
    }
}

impl ScreenKind {
    pub fn title(self) -> &'static str {
        match self {
            ScreenKind::Selection => "Pick your options",
            ScreenKind::Wheel => "Spin the wheel",
            ScreenKind::Result => "Result",
        }
    }
}

/// All actions that can flow through the application.
#[derive(Debug, Clone)]
pub enum Action {
    // System
    Tick,
    Quit,
    Resize(u16, u16),

    // Selection
    ToggleOption(usize), // catalog index
    SelectAll,
    ClearSelection,
    ConfirmSelection,
    ShowAddOption,
    AddCustomOption(FoodOption),

    // Wheel
    Spin, // also quick-stops a running spin
    SpinAgain,
    BackToSelection,

    // Popups
    ShowHelp,
    ToggleHistory,
    ClosePopup,

    // Background results
    LocationResolved(Option<String>),

    // Status
    ErrorMessage(String),

    // No-op
    None,
}
