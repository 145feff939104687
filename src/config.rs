//! Options for a [`ColorProvider`](crate::provider::ColorProvider).

use std::ops::RangeInclusive;

use crate::library::{COLOR, PRESETS, SPACES};

/// Options for resolving and rewriting color expressions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    /// The library packages whose declarations count as colors.
    pub packages: Vec<String>,

    /// The smallest and largest number of fraction digits written for a
    /// component. Trailing zeros are trimmed down to the smallest.
    pub fraction_digits: RangeInclusive<usize>,

    /// The label edits are grouped under for undo.
    pub command_label: String,

    /// Keep `0xRRGGBB` when rewriting an opaque color whose hex argument was
    /// written as an integer.
    pub integer_hex: bool,
}

impl ProviderConfig {
    /// Create options with the default values.
    pub fn new() -> Self {
        Self {
            packages: [COLOR, PRESETS, SPACES].map(String::from).to_vec(),
            fraction_digits: 1..=3,
            command_label: "Change color".to_string(),
            integer_hex: true,
        }
    }

    /// Replace the enabled packages.
    pub fn with_packages<S: Into<String>>(mut self, packages: impl IntoIterator<Item = S>) -> Self {
        self.packages = packages.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the fraction digit range. An empty range is replaced by its
    /// end.
    pub fn with_fraction_digits(mut self, digits: RangeInclusive<usize>) -> Self {
        self.fraction_digits = if digits.is_empty() {
            *digits.end()..=*digits.end()
        } else {
            digits
        };
        self
    }

    /// Replace the undo label.
    pub fn with_command_label(mut self, label: impl Into<String>) -> Self {
        self.command_label = label.into();
        self
    }

    /// Turn keeping integer hex literals on or off.
    pub fn with_integer_hex(mut self, integer_hex: bool) -> Self {
        self.integer_hex = integer_hex;
        self
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.packages.len(), 3);
        assert_eq!(config.fraction_digits, 1..=3);
        assert_eq!(config.command_label, "Change color");
        assert!(config.integer_hex);
    }

    #[test]
    fn builders() {
        let config = ProviderConfig::new()
            .with_packages([COLOR])
            .with_fraction_digits(4..=2)
            .with_command_label("Pick")
            .with_integer_hex(false);
        assert_eq!(config.packages, ["org.openrndr.color"]);
        assert_eq!(config.fraction_digits, 2..=2);
        assert_eq!(config.command_label, "Pick");
        assert!(!config.integer_hex);
    }
}
