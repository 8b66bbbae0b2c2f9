use tracing::debug;

use crate::error::CoreError;
use crate::food::{FoodOption, SegmentColor};

/// Built-in food options: (label, emoji).
const BUILTIN: &[(&str, &str)] = &[
    ("Pizza", "🍕"),
    ("Burger", "🍔"),
    ("Sushi", "🍣"),
    ("Tacos", "🌮"),
    ("Ramen", "🍜"),
    ("Salad", "🥗"),
    ("Curry", "🍛"),
    ("Pasta", "🍝"),
    ("Dumplings", "🥟"),
    ("Sandwich", "🥪"),
    ("Fried Chicken", "🍗"),
    ("Pho", "🍲"),
];

/// The ordered list of options a user can pick from.
#[derive(Debug, Clone)]
pub struct Catalog {
    options: Vec<FoodOption>,
}

impl Catalog {
    pub fn builtin() -> Self {
        let options = BUILTIN
            .iter()
            .enumerate()
            .map(|(i, (label, icon))| FoodOption {
                label: (*label).to_string(),
                icon: (*icon).to_string(),
                color: SegmentColor::for_index(i),
            })
            .collect();
        Self { options }
    }

    /// Built-in options followed by user-defined ones.
    pub fn with_custom(custom: Vec<FoodOption>) -> Result<Self, CoreError> {
        let mut catalog = Self::builtin();
        for option in custom {
            catalog.push(option)?;
        }
        Ok(catalog)
    }

    /// Append an option. Labels are unique ignoring ASCII case.
    pub fn push(&mut self, option: FoodOption) -> Result<usize, CoreError> {
        if option.label.trim().is_empty() {
            return Err(CoreError::InvalidOption("label must not be empty".to_string()));
        }
        if self.find(&option.label).is_some() {
            return Err(CoreError::DuplicateOption(option.label));
        }
        debug!("catalog: added '{}'", option.label);
        self.options.push(option);
        Ok(self.options.len() - 1)
    }

    /// Index of the option with this label (case-insensitive).
    pub fn find(&self, label: &str) -> Option<usize> {
        self.options.iter().position(|o| o.same_label(label))
    }

    pub fn get(&self, index: usize) -> Option<&FoodOption> {
        self.options.get(index)
    }

    pub fn options(&self) -> &[FoodOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
