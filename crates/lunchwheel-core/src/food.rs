use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::CoreError;

/// Color identifier for a wheel segment. Rendering layers map these to
/// concrete colors through their theme.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SegmentColor {
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
    Gray,
    LightGray,
    DarkGray,
    Black,
}

impl SegmentColor {
    /// Palette color for the segment at `index`, cycling through all variants.
    pub fn for_index(index: usize) -> Self {
        let palette: Vec<SegmentColor> = SegmentColor::iter().collect();
        palette[index % palette.len()]
    }

    /// The next color in palette order, wrapping around.
    pub fn next(self) -> Self {
        let palette: Vec<SegmentColor> = SegmentColor::iter().collect();
        let pos = palette.iter().position(|c| *c == self).unwrap_or(0);
        palette[(pos + 1) % palette.len()]
    }
}

/// One labeled choice on the wheel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodOption {
    pub label: String,
    pub icon: String,
    pub color: SegmentColor,
}

impl FoodOption {
    /// Create an option, trimming the label. Empty labels are rejected.
    pub fn new(
        label: impl Into<String>,
        icon: impl Into<String>,
        color: SegmentColor,
    ) -> Result<Self, CoreError> {
        let label = label.into().trim().to_string();
        if label.is_empty() {
            return Err(CoreError::InvalidOption("label must not be empty".to_string()));
        }
        Ok(Self {
            label,
            icon: icon.into().trim().to_string(),
            color,
        })
    }

    /// Label prefixed with the icon, e.g. "🍕 Pizza".
    pub fn display_name(&self) -> String {
        if self.icon.is_empty() {
            self.label.clone()
        } else {
            format!("{} {}", self.icon, self.label)
        }
    }

    pub fn same_label(&self, other: &str) -> bool {
        self.label.eq_ignore_ascii_case(other.trim())
    }
}
