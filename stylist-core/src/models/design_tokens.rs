use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Output of a prediction: style classes plus pre-formatted style variables.
///
/// Variable keys always start with `--`; values are already clamped and
/// formatted (e.g. `"1.125rem"`), never raw floats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DesignTokenSet {
    /// Style classes, order preserved for display.
    pub css_classes: Vec<String>,
    /// Style variable name → formatted value.
    pub css_variables: BTreeMap<String, String>,
}

impl DesignTokenSet {
    pub fn new(css_classes: Vec<String>, css_variables: BTreeMap<String, String>) -> Self {
        Self {
            css_classes,
            css_variables,
        }
    }

    /// Add a class unless it is already present.
    pub fn push_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.css_classes.contains(&class) {
            self.css_classes.push(class);
        }
    }

    /// Insert a variable, prefixing the name with `--` if needed.
    pub fn set_variable(&mut self, name: &str, value: impl Into<String>) {
        self.css_variables.insert(variable_key(name), value.into());
    }

    /// Fill in variables from `other` that this set does not define.
    pub fn fill_missing_variables(&mut self, other: &DesignTokenSet) {
        for (k, v) in &other.css_variables {
            self.css_variables
                .entry(k.clone())
                .or_insert_with(|| v.clone());
        }
    }

    /// Structurally valid: at least one class, at least one variable,
    /// every variable key in `--name` form.
    pub fn is_valid(&self) -> bool {
        !self.css_classes.is_empty()
            && !self.css_variables.is_empty()
            && self.css_variables.keys().all(|k| is_variable_key(k))
    }

    /// Approximate heap footprint in bytes, used for cache accounting.
    pub fn approximate_size(&self) -> usize {
        let classes: usize = self
            .css_classes
            .iter()
            .map(|c| c.len() + std::mem::size_of::<String>())
            .sum();
        let variables: usize = self
            .css_variables
            .iter()
            .map(|(k, v)| k.len() + v.len() + 2 * std::mem::size_of::<String>())
            .sum();
        std::mem::size_of::<Self>() + classes + variables
    }
}

/// Normalize a variable name to the `--kebab-case` convention.
pub fn variable_key(name: &str) -> String {
    let trimmed = name.trim().trim_start_matches('-');
    format!("--{}", trimmed.replace('_', "-").to_ascii_lowercase())
}

fn is_variable_key(key: &str) -> bool {
    key.len() > 2 && key.starts_with("--")
}
