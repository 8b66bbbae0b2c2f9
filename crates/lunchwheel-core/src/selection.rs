use std::collections::BTreeSet;

use crate::catalog::Catalog;
use crate::error::CoreError;
use crate::food::FoodOption;

/// Minimum number of options a wheel needs before it can spin.
pub const MIN_OPTIONS: usize = 2;

/// Which catalog entries the user has picked. Iteration follows catalog order,
/// which is also the order segments appear on the wheel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    picked: BTreeSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip an index in or out of the selection. Returns the new state.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.picked.remove(&index) {
            false
        } else {
            self.picked.insert(index);
            true
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.picked.contains(&index)
    }

    pub fn select_all(&mut self, catalog: &Catalog) {
        self.picked = (0..catalog.len()).collect();
    }

    pub fn clear(&mut self) {
        self.picked.clear();
    }

    pub fn count(&self) -> usize {
        self.picked.len()
    }

    /// Select options by label. Returns the labels that matched nothing.
    pub fn select_labels<S: AsRef<str>>(&mut self, catalog: &Catalog, labels: &[S]) -> Vec<String> {
        let mut unknown = Vec::new();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() {
                continue;
            }
            match catalog.find(label) {
                Some(i) => {
                    self.picked.insert(i);
                }
                None => unknown.push(label.to_string()),
            }
        }
        unknown
    }

    /// Resolve the selection into the ordered option list for a wheel.
    pub fn confirm(&self, catalog: &Catalog) -> Result<Vec<FoodOption>, CoreError> {
        let options: Vec<FoodOption> = self
            .picked
            .iter()
            .filter_map(|&i| catalog.get(i).cloned())
            .collect();
        if options.len() < MIN_OPTIONS {
            return Err(CoreError::NotEnoughOptions {
                found: options.len(),
                required: MIN_OPTIONS,
            });
        }
        Ok(options)
    }
}
