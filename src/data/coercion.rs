//! Text to numeric coercion.
//!
//! Cells go through two explicit steps:
//! 1. placeholder removal: empty cells and placeholder tokens become missing,
//!    stray characters are stripped;
//! 2. signed-numeric parse: commas are resolved per [`CommaPolicy`] and a
//!    leading sign is kept.
//!
//! Anything still unparseable is reported as [`DashboardError::ParseFailure`];
//! callers treat that as a missing value.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};

/// How commas inside a numeric cell are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommaPolicy {
    /// Every comma is a thousands separator.
    Thousands,
    /// A comma is the decimal point.
    Decimal,
    /// A lone comma is a decimal point unless it is followed by exactly
    /// three digits or the cell already has a `.`.
    #[default]
    Auto,
}

/// Rules for turning raw text cells into numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoercionRules {
    /// Whole-cell tokens meaning "no value".
    pub placeholders: Vec<String>,
    /// Characters removed anywhere in the cell before parsing.
    pub strip_chars: Vec<char>,
    pub comma: CommaPolicy,
    /// Delete every hyphen before parsing, the way the raw DOSM sheets were
    /// originally cleaned. This turns "-3" into 3.
    pub legacy_strip_hyphens: bool,
}

impl Default for CoercionRules {
    fn default() -> Self {
        Self {
            placeholders: ["-", "--", "—", "N/A", "NA"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            strip_chars: vec![' ', '\u{a0}'],
            comma: CommaPolicy::Auto,
            legacy_strip_hyphens: false,
        }
    }
}

impl CoercionRules {
    /// Step 1: returns `None` when the cell holds no value.
    pub fn remove_placeholders(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || self.placeholders.iter().any(|p| p == trimmed) {
            return None;
        }

        let cleaned: String = trimmed
            .chars()
            .filter(|c| !self.strip_chars.contains(c))
            .filter(|c| !(self.legacy_strip_hyphens && *c == '-'))
            .collect();

        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    }

    /// Step 2: parse a placeholder-free cell, keeping a leading sign.
    pub fn parse_signed(&self, text: &str) -> Result<f64> {
        let normalized = self.resolve_commas(text);
        let value: f64 = normalized
            .parse()
            .map_err(|_| DashboardError::ParseFailure {
                raw: text.to_string(),
            })?;

        if value.is_finite() {
            Ok(value)
        } else {
            Err(DashboardError::ParseFailure {
                raw: text.to_string(),
            })
        }
    }

    /// Run both steps. `Ok(None)` means the cell was a placeholder.
    pub fn parse_cell(&self, raw: &str) -> Result<Option<f64>> {
        match self.remove_placeholders(raw) {
            Some(text) => self.parse_signed(&text).map(Some),
            None => Ok(None),
        }
    }

    /// Parse a cell that must hold a whole number, such as a year.
    pub fn parse_integral(&self, raw: &str) -> Result<Option<i32>> {
        let Some(value) = self.parse_cell(raw)? else {
            return Ok(None);
        };

        if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
            Ok(Some(value as i32))
        } else {
            Err(DashboardError::ParseFailure {
                raw: raw.trim().to_string(),
            })
        }
    }

    fn resolve_commas(&self, text: &str) -> String {
        match self.comma {
            CommaPolicy::Thousands => text.replace(',', ""),
            CommaPolicy::Decimal => text.replace(',', "."),
            CommaPolicy::Auto => {
                if text.matches(',').count() == 1 && !text.contains('.') {
                    let after = text.split(',').nth(1).unwrap_or_default();
                    let is_group = after.len() == 3 && after.chars().all(|c| c.is_ascii_digit());
                    if !is_group {
                        return text.replace(',', ".");
                    }
                }
                text.replace(',', "")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_missing() {
        let rules = CoercionRules::default();
        assert_eq!(rules.parse_cell("").unwrap(), None);
        assert_eq!(rules.parse_cell("  -  ").unwrap(), None);
        assert_eq!(rules.parse_cell("N/A").unwrap(), None);
    }

    #[test]
    fn test_negative_sign_is_kept() {
        let rules = CoercionRules::default();
        assert_eq!(rules.parse_cell("-3.5").unwrap(), Some(-3.5));
        assert_eq!(rules.parse_cell("+2").unwrap(), Some(2.0));
    }

    #[test]
    fn test_legacy_hyphen_stripping() {
        let rules = CoercionRules {
            legacy_strip_hyphens: true,
            ..CoercionRules::default()
        };
        assert_eq!(rules.parse_cell("-3.5").unwrap(), Some(3.5));
    }

    #[test]
    fn test_comma_policies() {
        let auto = CoercionRules::default();
        assert_eq!(auto.parse_cell("150,5").unwrap(), Some(150.5));
        assert_eq!(auto.parse_cell("2,345").unwrap(), Some(2345.0));
        assert_eq!(auto.parse_cell("1,234,567").unwrap(), Some(1234567.0));
        assert_eq!(auto.parse_cell("1,234.5").unwrap(), Some(1234.5));

        let thousands = CoercionRules {
            comma: CommaPolicy::Thousands,
            ..CoercionRules::default()
        };
        assert_eq!(thousands.parse_cell("150,5").unwrap(), Some(1505.0));

        let decimal = CoercionRules {
            comma: CommaPolicy::Decimal,
            ..CoercionRules::default()
        };
        assert_eq!(decimal.parse_cell("2,345").unwrap(), Some(2.345));
    }

    #[test]
    fn test_stray_characters() {
        let rules = CoercionRules::default();
        assert_eq!(rules.parse_cell(" 1 200 ").unwrap(), Some(1200.0));
        assert!(matches!(
            rules.parse_cell("12mm"),
            Err(DashboardError::ParseFailure { .. })
        ));
        assert!(rules.parse_cell("NaN").is_err());
    }

    #[test]
    fn test_integral_years() {
        let rules = CoercionRules::default();
        assert_eq!(rules.parse_integral("2010").unwrap(), Some(2010));
        assert_eq!(rules.parse_integral("2010.0").unwrap(), Some(2010));
        assert!(rules.parse_integral("2010.5").is_err());
        assert_eq!(rules.parse_integral("").unwrap(), None);
    }
}
