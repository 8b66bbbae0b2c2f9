use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("segment count must be at least 1")]
    InvalidSegmentCount,

    #[error("rotation is not a finite number")]
    NonFiniteRotation,

    #[error("need at least {required} options to spin, found {found}")]
    NotEnoughOptions { found: usize, required: usize },

    #[error("a spin is already in progress")]
    SpinInProgress,

    #[error("cannot {action} from the {screen} screen")]
    InvalidTransition {
        screen: &'static str,
        action: &'static str,
    },

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("option already exists: {0}")]
    DuplicateOption(String),

    #[error("invalid spin settings: {0}")]
    InvalidSettings(String),
}
